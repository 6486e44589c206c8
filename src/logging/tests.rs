use super::*;

#[test]
fn open_log_file_creates_missing_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("calmride").join("calmride.log");

    let file = open_log_file(&path);
    assert!(file.is_ok());
    assert!(path.exists());
}

#[test]
fn bad_level_falls_back_to_a_usable_filter() {
    // Must not panic on a malformed directive.
    let filter = env_filter("not a [valid directive");
    let _ = filter.to_string();
}
