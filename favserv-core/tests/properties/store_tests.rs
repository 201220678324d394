//! Property-based tests for favorites store CRUD semantics

use favserv_core::{FavoritesStore, RecordId, ServerRecord};
use proptest::prelude::*;
use tempfile::TempDir;

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Update(usize, String),
    Delete(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[A-Za-z ]{1,12}".prop_map(Op::Add),
        2 => (any::<usize>(), "[A-Za-z ]{1,12}").prop_map(|(i, n)| Op::Update(i, n)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(arb_op(), 1..20)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("FavoriteServers.json");
        let mut store = FavoritesStore::new(&path);
        let mut model: Vec<(RecordId, String)> = Vec::new();

        for op in ops {
            match op {
                Op::Add(name) => {
                    let id = store.add(ServerRecord::new(name.clone(), "host.example"));
                    prop_assert_eq!(&store.get(&id).unwrap().name, &name);
                    model.push((id, name));
                }
                Op::Update(index, name) if !model.is_empty() => {
                    let slot = index % model.len();
                    let mut record = store.get(&model[slot].0).unwrap().clone();
                    record.name = name.clone();
                    prop_assert!(store.update(record));
                    model[slot].1 = name;
                }
                Op::Delete(index) if !model.is_empty() => {
                    let (id, _) = model.remove(index % model.len());
                    prop_assert_eq!(store.delete(&id), 1);
                    prop_assert!(store.get(&id).is_none());
                }
                _ => {}
            }
        }

        let listed: Vec<(RecordId, String)> = store
            .list()
            .iter()
            .map(|r| (r.id.clone(), r.name.clone()))
            .collect();
        prop_assert_eq!(&listed, &model);

        // Every mutation was persisted synchronously.
        let reopened = FavoritesStore::open(&path);
        prop_assert_eq!(reopened.list(), store.list());
    }

    #[test]
    fn prop_ids_stay_unique(names in prop::collection::vec("[a-z]{1,8}", 1..15)) {
        let dir = TempDir::new().unwrap();
        let mut store = FavoritesStore::new(dir.path().join("FavoriteServers.json"));
        let shared = RecordId::from("same-id");
        for name in names {
            let mut record = ServerRecord::new(name, "host.example");
            record.id = shared.clone();
            store.add(record);
        }
        let mut ids: Vec<&RecordId> = store.list().iter().map(|r| &r.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }
}
