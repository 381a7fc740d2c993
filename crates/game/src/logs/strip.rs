use std::env;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use serde::Serialize;

const DEFAULT_DIR: &str = "logs/strip";
const DIR_ENV: &str = "RETROWAVE_LOG_DIR";

static LOGS_ENABLED: AtomicBool = AtomicBool::new(cfg!(feature = "strip_logs"));

pub fn set_enabled(enabled: bool) {
    LOGS_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn enabled() -> bool {
    LOGS_ENABLED.load(Ordering::Relaxed)
}

fn log_dir() -> PathBuf {
    env::var_os(DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR))
}

fn append_jsonl<T: Serialize>(file: &str, value: &T) -> anyhow::Result<()> {
    let dir = log_dir();
    create_dir_all(&dir).context("creating strip log directory")?;
    let path = dir.join(file);
    let mut handle = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let line = repro::canonical_json_bytes(value)?;
    handle.write_all(&line)?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ShiftLogData {
    pub frame: u32,
    pub appended_row: i32,
    pub evicted_row: i32,
    pub viewpoint_z: f32,
}

pub fn log_shift(data: &ShiftLogData) -> anyhow::Result<()> {
    if !enabled() {
        return Ok(());
    }
    append_jsonl("shifts.jsonl", data)
}

#[derive(Debug, Serialize)]
pub struct CombineLogData {
    pub frame: u32,
    pub built: usize,
    pub merged: usize,
}

pub fn log_combine(data: &CombineLogData) -> anyhow::Result<()> {
    if !enabled() {
        return Ok(());
    }
    append_jsonl("combines.jsonl", data)
}
