use debtbook_core::{
    decode_records, encode_records, DebtStatus, JsonFileLedgerRepository, LedgerConfig,
    LedgerError, LedgerRepository, LedgerStore, RepoError, SettleTarget,
};
use std::path::Path;

fn open_at(path: &Path) -> LedgerStore<JsonFileLedgerRepository> {
    LedgerStore::open(JsonFileLedgerRepository::new(path)).unwrap()
}

#[test]
fn missing_file_opens_empty_and_is_created_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debts.json");

    let store = open_at(&path);
    assert!(store.is_empty());
    assert!(!path.exists());

    store.record_charge("Sarah", 500.0, "lunch").unwrap();
    assert!(path.exists());
}

#[test]
fn totals_survive_persist_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debts.json");

    let (total, records) = {
        let store = open_at(&path);
        store.record_charge("Sarah", 500.0, "lunch").unwrap();
        store.record_charge("John", 75.25, "").unwrap();
        store.record_payment("sarah", 20.0).unwrap();
        store.record_charge("Omar", 12.0, "").unwrap();
        store.settle(&SettleTarget::Id(2)).unwrap();
        (store.total_unpaid(), store.list_all())
    };

    let reopened = open_at(&path);
    assert_eq!(reopened.total_unpaid(), total);
    assert_eq!(reopened.total_unpaid(), 492.0);
    assert_eq!(reopened.list_all(), records);
    let john = reopened.get(2).unwrap();
    assert_eq!(john.status, DebtStatus::Paid);
    assert!(john.date_paid.is_some());
}

#[test]
fn persisted_file_uses_documented_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debts.json");
    let store = open_at(&path);
    store.record_charge("Sarah", 500.0, "lunch").unwrap();
    store.record_charge("John", 5.0, "").unwrap();
    store.settle(&SettleTarget::Id(1)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n  {"), "expected two-space pretty JSON");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);

    let mut paid_keys: Vec<_> = items[0].as_object().unwrap().keys().cloned().collect();
    paid_keys.sort();
    assert_eq!(
        paid_keys,
        vec![
            "amount",
            "date_added",
            "date_paid",
            "description",
            "id",
            "person",
            "status"
        ]
    );
    assert_eq!(items[0]["status"], "paid");
    assert!(items[1].get("date_paid").is_none());
    assert_eq!(items[1]["status"], "unpaid");
}

#[test]
fn loads_file_written_by_previous_tracker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debts.json");
    std::fs::write(
        &path,
        r#"[
  {
    "id": 1,
    "person": "Sarah",
    "amount": 480.0,
    "description": "lunch | Additional: $-20.0",
    "date_added": "2024-05-01T12:30:00.123456",
    "status": "paid",
    "date_paid": "2024-05-03T09:15:42.000001"
  },
  {
    "id": 2,
    "person": "John",
    "amount": 20,
    "description": "",
    "date_added": "2024-05-02T08:00:00",
    "status": "unpaid"
  }
]"#,
    )
    .unwrap();

    let store = open_at(&path);
    assert_eq!(store.len(), 2);
    assert_eq!(store.total_unpaid(), 20.0);
    assert_eq!(store.summary().total_paid, 480.0);

    let outcome = store.record_charge("john", 5.0, "").unwrap();
    assert_eq!(outcome.record_id, Some(2));
    assert_eq!(store.balance_of("JOHN"), 25.0);
}

#[test]
fn corrupt_file_is_a_fatal_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debts.json");
    std::fs::write(&path, "[{\"id\": 1, \"person\": ").unwrap();

    let err = LedgerStore::open(JsonFileLedgerRepository::new(&path))
        .err()
        .expect("corrupt file must not open");
    assert!(matches!(err, LedgerError::Load(RepoError::Codec(_))));
    assert!(err.to_string().contains("failed to load ledger"));

    let untouched = std::fs::read_to_string(&path).unwrap();
    assert_eq!(untouched, "[{\"id\": 1, \"person\": ");
}

#[test]
fn duplicate_ids_are_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debts.json");
    let record = r#"{"id": 3, "person": "Sarah", "amount": 1.0, "description": "", "date_added": "2024-05-01T12:30:00", "status": "unpaid"}"#;
    std::fs::write(&path, format!("[{record}, {record}]")).unwrap();

    let err = LedgerStore::open(JsonFileLedgerRepository::new(&path))
        .err()
        .expect("duplicate ids must not open");
    assert!(matches!(err, LedgerError::Load(RepoError::InvalidData(_))));
}

#[test]
fn write_failure_is_reported_and_not_committed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("debts.json");
    let store = open_at(&path);

    let err = store.record_charge("Sarah", 10.0, "").unwrap_err();

    assert!(matches!(err, LedgerError::Persist(RepoError::Io { .. })));
    assert!(store.is_empty());
    assert!(!path.exists());
}

#[test]
fn codec_round_trip_is_field_complete() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_at(&dir.path().join("debts.json"));
    store.record_charge("Sarah", 500.0, "lunch").unwrap();
    store.record_charge("John", 1.5, "bus").unwrap();
    store.settle(&SettleTarget::Person("john".to_string())).unwrap();
    let records = store.list_all();

    let decoded = decode_records(&encode_records(&records).unwrap()).unwrap();
    assert_eq!(decoded, records);
}

#[test]
fn amounts_reload_bit_for_bit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debts.json");
    let awkward = [220702.07533333334, 0.1 + 0.2, 1e-7 / 3.0, 123456789.98765432];

    {
        let store = open_at(&path);
        for (index, amount) in awkward.iter().enumerate() {
            store
                .record_charge(&format!("person-{index}"), *amount, "")
                .unwrap();
        }
    }

    let reopened = open_at(&path);
    for (index, amount) in awkward.iter().enumerate() {
        let record = reopened.get(index as u64 + 1).unwrap();
        assert_eq!(record.amount.to_bits(), amount.to_bits());
    }

    let records = reopened.list_all();
    let decoded = decode_records(&encode_records(&records).unwrap()).unwrap();
    assert_eq!(decoded, records);
}

#[test]
fn config_opens_store_at_resolved_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    let config = LedgerConfig::resolve_with(path.to_str(), None);

    let store = config.open_store().unwrap();
    store.record_charge("Sarah", 1.0, "").unwrap();

    let repo = JsonFileLedgerRepository::new(config.ledger_path());
    assert_eq!(repo.load().unwrap().len(), 1);
}
