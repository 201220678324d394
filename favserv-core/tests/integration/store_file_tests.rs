//! Integration tests for the favorites file on disk

use std::fs;

use favserv_core::store::FILE_HEADER;
use favserv_core::{ChangeKind, FavoritesStore, RecordId, ServerRecord};
use tempfile::TempDir;

const WELL_FORMED: &str = "\
# favorites
id-1|Home|192.168.1.10|2456|hunter2|ragnar
id-2|Public|play.example.org|2457||

id-3|Pipe\\|Name|host.example|notaport|p\\|w|
";

#[test]
fn test_load_skips_malformed_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("FavoriteServers.json");
    fs::write(&path, format!("{WELL_FORMED}a|b\n")).unwrap();

    let mut store = FavoritesStore::new(&path);
    let report = store.load();

    assert_eq!(report.loaded, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.len(), 3);

    let pipe = store.get(&RecordId::from("id-3")).unwrap();
    assert_eq!(pipe.name, "Pipe|Name");
    assert_eq!(pipe.port, 2456);
    assert_eq!(pipe.password, "p|w");
}

#[test]
fn test_invalid_utf8_line_does_not_drop_others() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("FavoriteServers.json");
    let mut bytes = b"# favorites\nid-1|One|one.example|2456||\n".to_vec();
    bytes.extend_from_slice(b"id-2|Caf\xe9|cafe.example|2456||\n");
    bytes.extend_from_slice(b"id-3|Three|three.example|2456||\n");
    fs::write(&path, bytes).unwrap();

    let mut store = FavoritesStore::new(&path);
    let report = store.load();
    assert_eq!(report.loaded, 3);
    assert_eq!(report.skipped, 0);
    assert_eq!(store.get(&RecordId::from("id-2")).unwrap().name, "Caf\u{FFFD}");

    store.add(ServerRecord::new("New", "new.example"));

    let reopened = FavoritesStore::open(&path);
    assert_eq!(reopened.len(), 4);
    for id in ["id-1", "id-2", "id-3"] {
        assert!(reopened.get(&RecordId::from(id)).is_some(), "{id} was lost");
    }
    assert_eq!(reopened.get(&RecordId::from("id-3")).unwrap().name, "Three");
}

#[test]
fn test_load_windows_line_endings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("FavoriteServers.json");
    fs::write(&path, WELL_FORMED.replace('\n', "\r\n")).unwrap();

    let store = FavoritesStore::open(&path);
    assert_eq!(store.len(), 3);
    let home = store.get(&RecordId::from("id-1")).unwrap();
    assert_eq!(home.preferred_identity, "ragnar");
}

#[test]
fn test_duplicate_ids_keep_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("FavoriteServers.json");
    fs::write(&path, "dup|First|a.example|2456\ndup|Second|b.example|2456\n").unwrap();

    let mut store = FavoritesStore::new(&path);
    let report = store.load();
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.list()[0].name, "First");
}

#[test]
fn test_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = FavoritesStore::open(dir.path().join("nope").join("FavoriteServers.json"));
    assert!(store.is_empty());
    assert!(!store.is_dirty());
}

#[test]
fn test_mutations_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cfg").join("FavoriteServers.json");

    let mut store = FavoritesStore::open(&path);
    let home = store.add(ServerRecord::new("Home", "10.0.0.2").with_password("pw"));
    let away = store.add(ServerRecord::new("Away", "away.example").with_port(2460));

    let mut renamed = store.get(&home).unwrap().clone();
    renamed.name = "Home Base".to_string();
    assert!(store.update(renamed));
    assert_eq!(store.delete(&away), 1);
    assert!(!store.is_dirty());

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().next(), Some(FILE_HEADER));
    assert!(!dir.path().join("cfg").join("FavoriteServers.json.tmp").exists());

    let reopened = FavoritesStore::open(&path);
    assert_eq!(reopened.len(), 1);
    let record = reopened.get(&home).unwrap();
    assert_eq!(record.name, "Home Base");
    assert_eq!(record.password, "pw");
}

#[test]
fn test_save_failure_keeps_memory() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();

    let mut store = FavoritesStore::new(blocker.join("FavoriteServers.json"));
    let id = store.add(ServerRecord::new("Home", "10.0.0.2"));

    assert!(store.get(&id).is_some());
    assert!(store.is_dirty());
    assert!(store.save().is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_change_notifications() {
    let dir = TempDir::new().unwrap();
    let mut store = FavoritesStore::new(dir.path().join("FavoriteServers.json"));
    let mut rx = store.subscribe();
    assert_eq!(rx.borrow().revision, 0);

    let id = store.add(ServerRecord::new("Home", "10.0.0.2"));
    assert!(rx.has_changed().unwrap());
    {
        let change = rx.borrow_and_update();
        assert_eq!(change.revision, 1);
        assert_eq!(change.kind, Some(ChangeKind::Added(id.clone())));
    }

    // A missed update is a no-op and must not notify.
    assert!(!store.update(ServerRecord::new("Ghost", "ghost.example")));
    assert!(!rx.has_changed().unwrap());

    store.delete(&id);
    let change = rx.borrow_and_update();
    assert_eq!(change.revision, 2);
    assert_eq!(change.kind, Some(ChangeKind::Deleted(id)));
}

#[test]
fn test_find_by_reference() {
    let dir = TempDir::new().unwrap();
    let mut store = FavoritesStore::new(dir.path().join("FavoriteServers.json"));
    let valhalla = store.add(ServerRecord::new("Valhalla", "v.example"));
    store.add(ServerRecord::new("Valley", "w.example"));
    store.add(ServerRecord::new("Midgard", "m.example"));

    assert_eq!(store.find("Valhalla").unwrap().id, valhalla);
    assert_eq!(store.find(valhalla.as_str()).unwrap().name, "Valhalla");
    assert_eq!(store.find("midgard").unwrap().name, "Midgard");
    assert_eq!(store.find("mid").unwrap().name, "Midgard");
    assert!(store.find("val").is_err());
    assert!(store.find("asgard").is_err());
}
