use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use bevy::app::App;
use bevy::log::LogPlugin;
use bevy::time::{Fixed, Time, TimeUpdateStrategy, Virtual};
use bevy::MinimalPlugins;
use repro::{Record, RecordMeta, ShiftEvent, SCHEMA};
use thiserror::Error;

use crate::cli::{CliOptions, Mode};
use crate::config::AppConfig;
use crate::logs;
use crate::systems::shift_queue::ShiftQueue;
use crate::systems::strip::{
    insert_strip_resources, StripPlugin, StripStats, TerrainStrip, UploadStats,
};

const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 600;

#[derive(Debug, Clone, Copy)]
pub struct HeadlessConfig {
    pub dt: f64,
    pub frames: u32,
    pub logs_enabled: bool,
    /// Install Bevy's log subscriber. Off for tests that build several apps.
    pub console_logs: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_FIXED_DT,
            frames: DEFAULT_FRAMES,
            logs_enabled: false,
            console_logs: false,
        }
    }
}

impl HeadlessConfig {
    pub fn from_cli(cli: &CliOptions) -> Self {
        Self {
            dt: cli.effective_fixed_dt(),
            frames: cli.ticks,
            logs_enabled: cli.debug_logs,
            console_logs: true,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ReplayError {
    #[error("record schema {found} is not supported (expected {SCHEMA})")]
    Schema { found: u32 },
    #[error("replay diverged at shift #{index}: expected {expected:?}, got {got:?}")]
    ShiftMismatch {
        index: usize,
        expected: Option<ShiftEvent>,
        got: Option<ShiftEvent>,
    },
    #[error("final window digest differs: expected {expected}, got {got}")]
    DigestMismatch { expected: String, got: String },
}

/// Outcome of one headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub shifts: Vec<ShiftEvent>,
    pub back_row: i32,
    pub front_row: i32,
    pub stats: StripStats,
    pub uploads: UploadStats,
    pub digest: String,
}

pub fn build_headless_app(cfg: &AppConfig, headless: &HeadlessConfig) -> Result<App> {
    if !(headless.dt.is_finite() && headless.dt > 0.0) {
        return Err(anyhow!("fixed dt must be positive, got {}", headless.dt));
    }
    if headless.logs_enabled {
        logs::strip::set_enabled(true);
    }
    let step = Duration::from_secs_f64(headless.dt);
    let mut app = App::new();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(step));
    app.insert_resource(Time::<Fixed>::from_duration(step));

    #[cfg(feature = "deterministic")]
    {
        use bevy::app::{PluginGroup, TaskPoolPlugin};
        use bevy::prelude::TaskPoolOptions;

        app.add_plugins(MinimalPlugins.set(TaskPoolPlugin {
            task_pool_options: TaskPoolOptions::with_num_threads(1),
        }));
    }
    #[cfg(not(feature = "deterministic"))]
    {
        app.add_plugins(MinimalPlugins);
    }
    // One fixed step per update, even for steps longer than the default clamp.
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .set_max_delta(step);
    if headless.console_logs {
        app.add_plugins(LogPlugin::default());
    }

    insert_strip_resources(&mut app, cfg).context("building terrain strip")?;
    app.add_plugins(StripPlugin);
    Ok(app)
}

/// Updates `app` until the strip has taken `frames` fixed steps, handing each
/// update's shifts to `handler`. The first update only starts the clock.
fn run_headless_loop(
    app: &mut App,
    frames: u32,
    mut handler: impl FnMut(Vec<ShiftEvent>) -> Result<()>,
) -> Result<()> {
    let max_updates = frames.saturating_add(2);
    let mut updates = 0u32;
    while app.world().resource::<StripStats>().frame < frames {
        if updates >= max_updates {
            return Err(anyhow!("headless run did not reach {frames} steps"));
        }
        app.update();
        updates += 1;
        let shifts = {
            let world = app.world_mut();
            let mut queue = world.resource_mut::<ShiftQueue>();
            queue.drain().collect::<Vec<_>>()
        };
        handler(shifts)?;
    }
    Ok(())
}

fn summarize(app: &App, shifts: Vec<ShiftEvent>) -> RunSummary {
    let world = app.world();
    let stats = *world.resource::<StripStats>();
    let uploads = *world.resource::<UploadStats>();
    let generator = world.resource::<TerrainStrip>().0.generator();
    let window = generator.window();
    let vertices: Vec<[f32; 3]> = window.vertices().map(|v| v.to_array()).collect();
    RunSummary {
        frames: stats.frame,
        shifts,
        back_row: generator.back_row(),
        front_row: generator.front_row(),
        stats,
        uploads,
        digest: repro::window_digest(&vertices, window.triangles()),
    }
}

pub fn run_headless(cfg: &AppConfig, headless: &HeadlessConfig) -> Result<RunSummary> {
    let mut app = build_headless_app(cfg, headless)?;
    let mut shifts = Vec::new();
    run_headless_loop(&mut app, headless.frames, |frame_shifts| {
        shifts.extend(frame_shifts);
        Ok(())
    })?;
    Ok(summarize(&app, shifts))
}

pub fn record_run(cfg: &AppConfig, headless: &HeadlessConfig) -> Result<Record> {
    let summary = run_headless(cfg, headless)?;
    let meta = RecordMeta {
        schema: SCHEMA,
        config: serde_json::to_value(cfg).context("encoding strip config")?,
        fixed_dt: headless.dt,
        frames: headless.frames,
    };
    let mut record = Record::new(meta);
    for shift in &summary.shifts {
        record.push_shift(shift.frame, shift.back_row, shift.front_row);
    }
    record.final_digest = summary.digest;
    Ok(record)
}

/// Re-runs a record and fails at the first divergence. Timing comes from the
/// record; only the logging switches of `base` are used.
pub fn replay_run(record: &Record, base: &HeadlessConfig) -> Result<RunSummary> {
    if record.meta.schema != SCHEMA {
        return Err(ReplayError::Schema {
            found: record.meta.schema,
        }
        .into());
    }
    let cfg: AppConfig = serde_json::from_value(record.meta.config.clone())
        .context("decoding recorded strip config")?;
    let headless = HeadlessConfig {
        dt: record.meta.fixed_dt,
        frames: record.meta.frames,
        logs_enabled: base.logs_enabled,
        console_logs: base.console_logs,
    };
    let mut app = build_headless_app(&cfg, &headless)?;
    let mut seen = Vec::with_capacity(record.shifts.len());
    run_headless_loop(&mut app, headless.frames, |frame_shifts| {
        for got in frame_shifts {
            let index = seen.len();
            let expected = record.shifts.get(index).copied();
            if expected != Some(got) {
                return Err(ReplayError::ShiftMismatch {
                    index,
                    expected,
                    got: Some(got),
                }
                .into());
            }
            seen.push(got);
        }
        Ok(())
    })?;

    if let Some(&missing) = record.shifts.get(seen.len()) {
        return Err(ReplayError::ShiftMismatch {
            index: seen.len(),
            expected: Some(missing),
            got: None,
        }
        .into());
    }
    let summary = summarize(&app, seen);
    if !record.final_digest.is_empty() && record.final_digest != summary.digest {
        return Err(ReplayError::DigestMismatch {
            expected: record.final_digest.clone(),
            got: summary.digest,
        }
        .into());
    }
    Ok(summary)
}

/// Entry point for every mode that runs without a window.
pub fn run_cli(cli: &CliOptions, cfg: AppConfig) -> Result<()> {
    let headless = HeadlessConfig::from_cli(cli);
    match cli.mode() {
        Mode::Play => {
            let summary = run_headless(&cfg, &headless)?;
            println!(
                "ran {} frames: {} shifts, rows {}..{}, {} uploads, digest {}",
                summary.frames,
                summary.stats.shifts,
                summary.back_row,
                summary.front_row,
                summary.uploads.uploads,
                summary.digest
            );
        }
        Mode::Record => {
            let path = cli
                .io
                .as_deref()
                .ok_or_else(|| anyhow!("--io <path> is required in record mode"))?;
            let record = record_run(&cfg, &headless)?;
            write_record(path, &record)?;
            println!(
                "recorded {} shifts over {} frames to {}",
                record.shifts.len(),
                record.meta.frames,
                path.display()
            );
        }
        Mode::Replay => {
            let path = cli
                .io
                .as_deref()
                .ok_or_else(|| anyhow!("--io <path> is required in replay mode"))?;
            let record = read_record(path)?;
            let summary = replay_run(&record, &headless)?;
            println!(
                "replay matched: {} shifts, digest {}",
                summary.shifts.len(),
                summary.digest
            );
        }
    }
    Ok(())
}

pub fn write_record(path: &Path, record: &Record) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let bytes = repro::canonical_json_bytes(record)?;
    fs::write(path, bytes).with_context(|| format!("writing record to {}", path.display()))
}

pub fn read_record(path: &Path) -> Result<Record> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading record from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing record {}", path.display()))
}
