use std::fs;

use retrowave::config::{load_app_config, resolve_app_config};

#[test]
fn strip_config_rejects_unknown_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        r#"
[grid]
width = 20
depth = 20
lookahead = 5.0
"#,
    )
    .expect("write config");

    let result = load_app_config(&path);
    assert!(result.is_err(), "unknown fields should error");
}

#[test]
fn strip_config_rejects_unknown_tables() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[particles]\nrate = 3\n").expect("write config");
    assert!(load_app_config(&path).is_err());
}

#[test]
fn zero_width_fails_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("zero.toml");
    fs::write(&path, "[grid]\nwidth = 0\n").expect("write config");

    let err = load_app_config(&path).expect_err("zero width");
    let chain = format!("{err:#}");
    assert!(chain.contains("width"), "{chain}");
}

#[test]
fn zero_batch_size_only_matters_when_visualizing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let hidden = dir.path().join("hidden.toml");
    fs::write(&hidden, "[wireframe]\nbatch_size = 0\n").expect("write config");
    assert!(load_app_config(&hidden).is_ok());

    let shown = dir.path().join("shown.toml");
    fs::write(
        &shown,
        "[wireframe]\nbatch_size = 0\nvisualize_lines = true\n",
    )
    .expect("write config");
    assert!(load_app_config(&shown).is_err());
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.toml");
    assert!(resolve_app_config(Some(&missing)).is_err());
}

#[test]
fn explicit_path_is_reported_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ok.toml");
    fs::write(&path, "[height]\nseed = 9\n").expect("write config");
    let (cfg, used) = resolve_app_config(Some(&path)).expect("loads");
    assert_eq!(cfg.height.seed, 9);
    assert_eq!(used.as_deref(), Some(path.as_path()));
}
