use scorm_core::{
    snapshot_from_pairs, AttemptConfig, DataModelEngine, ElementJournal, NotificationBus,
};
use std::cell::RefCell;
use std::rc::Rc;

fn fixed_clock() -> i64 {
    1_700_000_000_500
}

fn journaled_engine(mode: &str) -> (DataModelEngine, Rc<RefCell<ElementJournal>>) {
    let journal = Rc::new(RefCell::new(ElementJournal::with_clock(fixed_clock)));
    let mut bus = NotificationBus::new();
    ElementJournal::attach(&journal, &mut bus);
    let engine = DataModelEngine::new(
        AttemptConfig::default(),
        snapshot_from_pairs([("cmi.mode", mode)]),
        bus,
    );
    (engine, journal)
}

#[test]
fn records_only_changed_writes_and_seals_on_commit() {
    let (mut engine, journal) = journaled_engine("normal");
    {
        let mut api = engine.api();
        assert!(api.Initialize(""));
        api.SetValue("cmi.location", "p1");
        api.SetValue("cmi.location", "p1");
        api.SetValue("cmi.score.raw", "90");
        assert!(api.Commit(""));
    }

    let journal = journal.borrow();
    assert!(journal.pending().is_empty());
    let batches: Vec<_> = journal.unacknowledged().collect();
    assert_eq!(batches.len(), 1);
    let keys: Vec<&str> = batches[0]
        .elements
        .iter()
        .map(|element| element.key())
        .collect();
    assert_eq!(keys, vec!["cmi.location", "cmi.score.raw"]);
}

#[test]
fn commit_without_changes_creates_no_batch() {
    let (mut engine, journal) = journaled_engine("normal");
    engine.commit("");
    assert_eq!(journal.borrow().unacknowledged().count(), 0);
}

#[test]
fn review_mode_records_nothing() {
    let (mut engine, journal) = journaled_engine("review");
    assert_eq!(engine.api().SetValue("cmi.location", "p1"), None);
    engine.commit("");
    assert!(journal.borrow().pending().is_empty());
    assert_eq!(journal.borrow().unacknowledged().count(), 0);
}

#[test]
fn batch_serializes_elements_in_wire_shape() {
    let (mut engine, journal) = journaled_engine("normal");
    engine.set_value("cmi.exit", "suspend");
    engine.commit("");

    let journal = journal.borrow();
    let batch = journal.unacknowledged().next().expect("sealed batch");
    let json = serde_json::to_value(batch).expect("batch should serialize");

    assert_eq!(json["id"], 1_700_000_000_500_u64);
    assert_eq!(
        json["elements"],
        serde_json::json!([
            {"key": "cmi.exit", "value": "suspend", "time": 1_700_000_000.5, "counter": 0}
        ])
    );
}
