use anyhow::{ensure, Context};
use bevy::prelude::*;
use bevy::time::Fixed;
use retrowave::systems::tune::TunePlugin;
use retrowave::{config, insert_strip_resources, logs, runtime, CliOptions, StripPlugin};

mod diagnostics;
mod plugins;

fn main() -> anyhow::Result<()> {
    let cli = CliOptions::parse();
    if cli.debug_logs {
        logs::strip::set_enabled(true);
    }
    let (mut cfg, cfg_path) = config::resolve_app_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed() {
        cfg.height.seed = seed;
    }
    if cli.runs_headless() {
        return runtime::run_cli(&cli, cfg);
    }
    if cli.tune {
        cfg = cfg.for_tuning();
    }

    let fixed_dt = cli.effective_fixed_dt();
    ensure!(
        fixed_dt.is_finite() && fixed_dt > 0.0,
        "--fixed-dt must be positive, got {fixed_dt}"
    );

    let mut app = App::new();
    app.insert_resource(Time::<Fixed>::from_seconds(fixed_dt));
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Retrowave".into(),
            ..default()
        }),
        ..default()
    }));
    insert_strip_resources(&mut app, &cfg).context("building terrain strip")?;
    app.add_plugins((
        StripPlugin,
        plugins::VisualsPlugin,
        diagnostics::DiagnosticsUiPlugin,
    ));
    if cli.tune {
        app.add_plugins(TunePlugin {
            path: cfg_path,
            seed_override: cli.seed(),
        });
    }
    app.run();
    Ok(())
}
