mod common;

use common::{note, snapshot_of};
use livefetch_core::diff::render_human_summary;
use livefetch_core::{apply_edit_script, compute_edit_script, Change, ChangeDetector, IndexPath};

#[test]
fn test_scenario_replace_row_within_section() {
    // X:[b, a] Y:[c]  ->  X:[d, b] Y:[c]
    let previous = snapshot_of(
        vec![note("b", "X", 1), note("a", "X", 2), note("c", "Y", 1)],
        1,
    );
    let next = snapshot_of(
        vec![note("d", "X", 0), note("b", "X", 1), note("c", "Y", 1)],
        2,
    );

    let script = compute_edit_script(&previous, &next, &ChangeDetector::by_eq()).unwrap();

    assert_eq!(
        script.changes,
        vec![
            Change::Delete {
                id: "a".to_string(),
                from: IndexPath::new(0, 1),
            },
            Change::Insert {
                id: "d".to_string(),
                at: IndexPath::new(0, 0),
            },
        ]
    );
}

#[test]
fn test_scenario_consumer_mirrors_three_generations() {
    let g1 = snapshot_of(
        vec![note("a", "inbox", 1), note("b", "inbox", 2), note("c", "work", 1)],
        1,
    );
    let mut edited = note("a", "inbox", 1);
    edited.body = "edited".to_string();
    let g2 = snapshot_of(
        vec![edited, note("b", "archive", 2), note("c", "work", 1), note("e", "work", 0)],
        2,
    );
    let g3 = snapshot_of(vec![note("e", "work", 5), note("c", "work", 1)], 3);

    let mut mirror = g1.list_view();
    for (previous, next) in [(&g1, &g2), (&g2, &g3)] {
        let script = compute_edit_script(previous, next, &ChangeDetector::by_eq()).unwrap();
        mirror = apply_edit_script(&mirror, &script).unwrap();
        assert_eq!(mirror, next.list_view());
    }
    assert_eq!(mirror.sections.len(), 1);
    assert_eq!(mirror.sections[0].ids, vec!["c", "e"]);
}

#[test]
fn test_scenario_update_is_reported_at_final_coordinate() {
    let previous = snapshot_of(vec![note("a", "X", 1), note("b", "X", 2)], 1);
    let mut edited = note("b", "X", 2);
    edited.body = "new body".to_string();
    let next = snapshot_of(vec![note("z", "X", 0), note("a", "X", 1), edited], 2);

    let script = compute_edit_script(&previous, &next, &ChangeDetector::by_eq()).unwrap();

    assert_eq!(
        script.changes,
        vec![
            Change::Insert {
                id: "z".to_string(),
                at: IndexPath::new(0, 0),
            },
            Change::Update {
                id: "b".to_string(),
                at: IndexPath::new(0, 2),
            },
        ]
    );

    let summary = render_human_summary(&script);
    assert!(summary.contains("**update** `b` at 0/2"));
}
