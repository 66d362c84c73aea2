//! Properties that hold for every edit script, on both backing stores.
mod common;

use common::{arb_forward_steps, arb_step, blocks, Tracked};
use listdelta_core::{replay, BackingKind, DeltaConfig, EditAccumulator};
use proptest::prelude::*;

/// Compare every accumulator query against the model
fn assert_matches_model(tracked: &Tracked) -> Result<(), TestCaseError> {
    let acc = &tracked.acc;
    prop_assert_eq!(acc.current_size(), tracked.current.len());

    for (i, origin) in tracked.origins.iter().enumerate() {
        prop_assert_eq!(acc.current_to_snapshot(i).unwrap(), *origin);
        prop_assert_eq!(acc.current_updated(i).unwrap(), tracked.updated[i]);
    }
    for j in 0..tracked.snapshot.len() {
        let expected = tracked.origins.iter().position(|o| *o == Some(j));
        prop_assert_eq!(acc.snapshot_to_current(j).unwrap(), expected);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_identity_after_reset(size in 0usize..200) {
        let mut acc = EditAccumulator::new();
        acc.reset(size);
        for i in 0..size {
            prop_assert_eq!(acc.snapshot_to_current(i).unwrap(), Some(i));
            prop_assert_eq!(acc.current_to_snapshot(i).unwrap(), Some(i));
            prop_assert!(!acc.current_updated(i).unwrap());
        }
        prop_assert!(acc.is_empty());
    }

    #[test]
    fn prop_queries_match_model(
        size in 0usize..16,
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut tracked = Tracked::new(size, DeltaConfig::default());
        for step in steps {
            tracked.step(step);
            assert_matches_model(&tracked)?;
        }
    }

    #[test]
    fn prop_bidirectional_consistency(
        size in 0usize..16,
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut tracked = Tracked::new(size, DeltaConfig::default());
        for step in steps {
            tracked.step(step);
        }
        let acc = &tracked.acc;

        let mut previous = None;
        for j in 0..acc.snapshot_size() {
            if let Some(i) = acc.snapshot_to_current(j).unwrap() {
                prop_assert_eq!(acc.current_to_snapshot(i).unwrap(), Some(j));
                // survivors never change relative order
                prop_assert!(previous.map_or(true, |p| p < i));
                previous = Some(i);
            }
        }
        for i in 0..acc.current_size() {
            if let Some(j) = acc.current_to_snapshot(i).unwrap() {
                prop_assert_eq!(acc.snapshot_to_current(j).unwrap(), Some(i));
            }
        }
    }

    #[test]
    fn prop_compaction_fidelity(
        size in 0usize..16,
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut tracked = Tracked::new(size, DeltaConfig::default());
        for step in steps {
            tracked.step(step);
        }
        let rebuilt = replay(tracked.acc.iterator(), &tracked.snapshot, &tracked.current).unwrap();
        prop_assert_eq!(rebuilt, tracked.current);
    }

    #[test]
    fn prop_backings_are_indistinguishable(
        size in 0usize..16,
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut linear = Tracked::new(size, DeltaConfig::default());
        let mut tree = Tracked::new(size, DeltaConfig::tree_only());
        let mut capped = Tracked::new(size, DeltaConfig { linear_block_limit: 2, prefer_linear: true });
        for step in steps {
            linear.step(step);
            tree.step(step);
            capped.step(step);
            prop_assert_eq!(blocks(&linear.acc), blocks(&tree.acc));
            prop_assert_eq!(blocks(&capped.acc), blocks(&tree.acc));
        }
        prop_assert_eq!(tree.acc.backing(), BackingKind::IndexMap);
        prop_assert_eq!(linear.acc.is_empty(), tree.acc.is_empty());
    }

    #[test]
    fn prop_forward_edits_stay_linear(
        size in 0usize..16,
        steps in arb_forward_steps(),
    ) {
        let mut linear = Tracked::new(size, DeltaConfig::default());
        let mut tree = Tracked::new(size, DeltaConfig::tree_only());
        linear.walk_forward(&steps);
        tree.walk_forward(&steps);

        prop_assert_eq!(linear.acc.backing(), BackingKind::BlockSequence);
        assert_matches_model(&linear)?;
        prop_assert_eq!(blocks(&linear.acc), blocks(&tree.acc));

        let rebuilt = replay(linear.acc.iterator(), &linear.snapshot, &linear.current).unwrap();
        prop_assert_eq!(rebuilt, linear.current);
    }

    #[test]
    fn prop_blocks_ascend_without_overlap(
        size in 0usize..16,
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut tracked = Tracked::new(size, DeltaConfig::default());
        for step in steps {
            tracked.step(step);
        }
        let mut floor = 0;
        for block in tracked.acc.iterator() {
            prop_assert!(block.len > 0);
            prop_assert!(block.start >= floor);
            floor = block.current_end();
        }
    }
}
