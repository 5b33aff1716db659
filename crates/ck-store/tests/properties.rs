mod common;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ck_core::{CurvePoint, DisplayMode};
use ck_store::{CurveStore, SignalKind, StoreEvent};
use common::{events_of, points, record};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum SelectionOp {
    Select(BTreeSet<String>),
    ShowAll(bool),
    Begin,
    End,
}

fn selection_op() -> impl Strategy<Value = SelectionOp> {
    let name = prop::sample::select(vec!["A", "B", "C", "Ghost"]);
    prop_oneof![
        prop::collection::btree_set(name.prop_map(str::to_string), 0..4).prop_map(SelectionOp::Select),
        any::<bool>().prop_map(SelectionOp::ShowAll),
        Just(SelectionOp::Begin),
        Just(SelectionOp::End),
    ]
}

fn expected_mode(show_all: bool, selected: &BTreeSet<String>) -> DisplayMode {
    if show_all {
        DisplayMode::AllVisible
    } else if !selected.is_empty() {
        DisplayMode::Selected
    } else {
        DisplayMode::ActiveOnly
    }
}

proptest! {
    #[test]
    fn display_mode_tracks_inputs_inside_and_outside_batches(
        ops in prop::collection::vec(selection_op(), 1..40)
    ) {
        let store = CurveStore::new();
        for name in ["A", "B", "C"] {
            store.set_curve_data(name, points(&[1])).unwrap();
        }
        let mut selected = BTreeSet::new();
        let mut show_all = false;

        for op in ops {
            match op {
                SelectionOp::Select(names) => {
                    store.set_selected_curves(names.clone());
                    selected = names;
                }
                SelectionOp::ShowAll(flag) => {
                    store.set_show_all_curves(flag);
                    show_all = flag;
                }
                SelectionOp::Begin => {
                    store.begin_batch();
                }
                SelectionOp::End => {
                    store.end_batch();
                }
            }
            prop_assert_eq!(store.display_mode(), expected_mode(show_all, &selected));
            prop_assert_eq!(store.snapshot().display_mode(), expected_mode(show_all, &selected));
            prop_assert_eq!(store.get_selected_curves(), selected.clone());
        }
        store.end_batch();
    }

    #[test]
    fn one_curves_changed_per_batch_regardless_of_edit_count(
        moves in prop::collection::vec((-1.0e4_f64..1.0e4, -1.0e4_f64..1.0e4), 1..120)
    ) {
        let store = CurveStore::new();
        store.set_curve_data("A", points(&[1, 2, 3])).unwrap();
        let log = record(&store, &[SignalKind::CurvesChanged]);

        store.transaction(|s| {
            for (x, y) in &moves {
                s.set_point_position("A", 2, *x, *y).unwrap();
            }
        });

        let (x, y) = moves[moves.len() - 1];
        prop_assert_eq!(
            events_of(&log),
            vec![StoreEvent::CurvesChanged { curve: "A".to_string() }]
        );
        let last = store.get_curve_data("A")[2];
        prop_assert_eq!((last.x, last.y), (x, y));
    }

    #[test]
    fn returned_copies_are_isolated(
        frames in prop::collection::btree_set(-500_i32..500, 1..50),
        index in any::<prop::sample::Index>(),
    ) {
        let original: Vec<CurvePoint> = frames
            .iter()
            .map(|&f| CurvePoint::new(f, f as f64, 0.0))
            .collect();
        let store = CurveStore::new();
        store.set_curve_data("A", original.clone()).unwrap();

        let i = index.index(original.len());
        let mut copy = store.get_curve_data("A");
        copy[i].x += 1.0;
        copy.truncate(i);

        prop_assert_eq!(store.get_curve_data("A"), original);
    }
}

#[test]
fn batch_closes_with_one_notification_per_distinct_key() {
    let store = CurveStore::new();
    let count = Arc::new(AtomicUsize::new(0));
    {
        let count = Arc::clone(&count);
        store.subscribe_many(&SignalKind::ALL, move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });
    }

    store.transaction(|s| {
        for frame in 0..100 {
            s.set_current_frame(frame + 2);
            s.set_zoom(1.0 + frame as f64).unwrap();
        }
        s.set_curve_data("A", points(&[1])).unwrap();
        s.set_curve_data("B", points(&[1])).unwrap();
    });

    assert_eq!(count.load(Ordering::SeqCst), 4);
}
