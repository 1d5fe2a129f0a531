use super::*;

use std::collections::HashMap;

#[test]
fn defaults_point_at_local_data_file() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:3000");
    assert_eq!(settings.data_file, "data/inventario.json");
}

#[test]
fn file_overrides_replace_known_keys() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        "bind_addr = \"0.0.0.0:8080\"\ndata_file = \"/srv/inventory.json\"\n",
    );
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.data_file, "/srv/inventory.json");
}

#[test]
fn malformed_settings_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file_overrides(&mut settings, "bind_addr = [");
    assert_eq!(settings, Settings::default());
}

#[test]
fn prefixed_env_vars_win_over_plain_ones() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SERVER_BIND", "127.0.0.1:4000"),
        ("APP__BIND_ADDR", "127.0.0.1:5000"),
        ("DATA_FILE", "plain.json"),
    ]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_bind, "127.0.0.1:5000");
    assert_eq!(settings.data_file, "plain.json");
}

#[test]
fn blank_data_file_falls_back_to_default() {
    assert_eq!(
        normalize_data_file("   "),
        PathBuf::from("data/inventario.json")
    );
}

#[test]
fn prepare_creates_parent_directory() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let data_file = temp_root.path().join("nested").join("inventario.json");

    let prepared =
        prepare_data_file(data_file.to_string_lossy().as_ref()).expect("prepare data file");
    assert_eq!(prepared, data_file);
    assert!(temp_root.path().join("nested").is_dir());
    assert!(!data_file.exists());
}

#[test]
fn prepare_fails_when_parent_is_a_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let blocker = temp_root.path().join("blocker");
    fs::write(&blocker, b"file").expect("blocker");

    let err = prepare_data_file(blocker.join("inventario.json").to_string_lossy().as_ref())
        .expect_err("should fail");
    assert!(err.to_string().contains("failed to create parent directory"));
}
