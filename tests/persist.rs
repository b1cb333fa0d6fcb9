use std::fs;
use std::path::PathBuf;

use sel_terminal::persist::{load_location_from, save_location_to};

fn scratch_file(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("sel_terminal_test_{}_{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir.join("location.json")
}

#[test]
fn saved_location_loads_back() {
    let path = scratch_file("roundtrip");
    let location = "http://localhost:3000/sel?season=2023&search=vale";
    save_location_to(&path, location).unwrap();
    assert_eq!(load_location_from(&path).as_deref(), Some(location));
    assert!(!path.with_extension("json.tmp").exists());
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn missing_or_stale_files_are_ignored() {
    let path = scratch_file("stale");
    assert_eq!(load_location_from(&path), None);

    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"{"version":0,"location":"http://x/sel"}"#).unwrap();
    assert_eq!(load_location_from(&path), None);

    fs::write(&path, "not json").unwrap();
    assert_eq!(load_location_from(&path), None);
    let _ = fs::remove_dir_all(path.parent().unwrap());
}
