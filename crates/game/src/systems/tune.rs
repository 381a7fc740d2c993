use std::path::PathBuf;

use bevy::prelude::*;
use worldgen::HeightParams;

use crate::config::load_app_config;
use crate::scheduling::sets;
use crate::systems::strip::{step_strip, TerrainStrip};

const RELOAD_SECS: f32 = 0.5;

/// Live height tuning: the window is rebuilt every frame and the config file
/// is re-read on a short timer.
#[derive(Resource, Debug)]
pub struct TuneState {
    pub path: Option<PathBuf>,
    pub seed_override: Option<u32>,
    pub timer: Timer,
    pub reloads: u32,
}

impl TuneState {
    pub fn new(path: Option<PathBuf>, seed_override: Option<u32>) -> Self {
        Self {
            path,
            seed_override,
            timer: Timer::from_seconds(RELOAD_SECS, TimerMode::Repeating),
            reloads: 0,
        }
    }

    fn reload(&mut self) -> Option<HeightParams> {
        let path = self.path.as_ref()?;
        match load_app_config(path) {
            Ok(cfg) => {
                self.reloads += 1;
                let mut height = cfg.height;
                if let Some(seed) = self.seed_override {
                    height.seed = seed;
                }
                Some(height)
            }
            Err(err) => {
                log::warn!("keeping previous height parameters: {err:#}");
                None
            }
        }
    }
}

pub fn retune_strip(time: Res<Time>, mut tune: ResMut<TuneState>, mut strip: ResMut<TerrainStrip>) {
    if tune.timer.tick(time.delta()).just_finished() {
        if let Some(height) = tune.reload() {
            if height != *strip.0.generator().heights().params() {
                log::info!("height parameters changed, regenerating");
                if let Err(err) = strip.0.generator_mut().set_height_params(height) {
                    log::warn!("rejected height parameters: {err}");
                }
            }
        }
    }
    if let Err(err) = strip.0.generator_mut().regenerate() {
        log::error!("regenerating strip failed: {err}");
    }
}

pub struct TunePlugin {
    pub path: Option<PathBuf>,
    pub seed_override: Option<u32>,
}

impl Plugin for TunePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TuneState::new(self.path.clone(), self.seed_override))
            .add_systems(
                FixedUpdate,
                retune_strip
                    .in_set(sets::RETROWAVE_Generate)
                    .before(step_strip),
            );
    }
}
