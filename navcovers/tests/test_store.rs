use navcovers::CoverStore;
use tempfile::TempDir;

fn store_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("cover_cache.json")
}

#[test]
fn missing_file_gives_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = CoverStore::load(store_path(&dir));
    assert!(store.is_empty());
}

#[test]
fn save_then_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);

    let mut store = CoverStore::load(&path);
    store.insert("Abbey Road", "https://i.imgur.com/abbey.jpg");
    store.insert("Kind of Blue", "https://i.imgur.com/blue.jpg");
    store.save().unwrap();

    let reloaded = CoverStore::load(&path);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(
        reloaded.get("Abbey Road"),
        Some("https://i.imgur.com/abbey.jpg")
    );
    assert_eq!(reloaded.get("Unknown Album"), None);
}

#[test]
fn corrupt_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    std::fs::write(&path, "{not json at all").unwrap();

    let store = CoverStore::load(&path);
    assert!(store.is_empty());
}

#[test]
fn save_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cache.json");

    let mut store = CoverStore::load(&path);
    store.insert("Album", "https://example.com/a.jpg");
    store.save().unwrap();

    assert!(path.exists());
}

#[test]
fn insert_overwrites_existing_entry() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CoverStore::load(store_path(&dir));

    store.insert("Album", "https://example.com/old.jpg");
    store.insert("Album", "https://example.com/new.jpg");

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("Album"), Some("https://example.com/new.jpg"));
}
