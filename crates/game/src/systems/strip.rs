use bevy::prelude::*;
use worldgen::{
    Advance, ConfigError, MarkerPrototype, MeshData, MeshSink, Strip, Triangle, Vertex,
};

use crate::config::AppConfig;
use crate::logs::strip::{self as strip_logs, CombineLogData, ShiftLogData};
use crate::scheduling::{self, sets};
use crate::systems::mesh_bridge::write_mesh;
use crate::systems::shift_queue::{clear_shift_queue, ShiftQueue};
use crate::systems::viewpoint::{advance_viewpoint, ScrollViewpoint};
use crate::systems::wireframe::collect_wireframe;

/// Material slot a marker mesh renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerMaterial {
    Vertex,
    Line,
}

#[derive(Resource)]
pub struct TerrainStrip(pub Strip<MarkerMaterial>);

impl TerrainStrip {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ConfigError> {
        Strip::new(
            &cfg.strip(),
            MarkerPrototype::sphere(MarkerMaterial::Vertex),
            MarkerPrototype::cylinder(MarkerMaterial::Line),
        )
        .map(Self)
    }
}

/// Handle of the single terrain mesh asset the strip is written into.
#[derive(Resource, Debug, Clone)]
pub struct TerrainMesh(pub Handle<Mesh>);

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StripStats {
    pub frame: u32,
    pub shifts: u32,
    pub wireframe_meshes: usize,
    pub wireframe_markers: usize,
}

/// What the last upload looked like.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadStats {
    pub uploads: u64,
    pub vertices: usize,
    pub triangles: usize,
    pub max_index: Option<u32>,
}

struct FrameSink<'a> {
    stats: &'a mut UploadStats,
    target: Option<(&'a mut Assets<Mesh>, &'a Handle<Mesh>)>,
    width: u32,
}

impl MeshSink for FrameSink<'_> {
    fn upload(&mut self, vertices: &[Vertex], triangles: &[Triangle]) {
        self.stats.uploads += 1;
        self.stats.vertices = vertices.len();
        self.stats.triangles = triangles.len();
        self.stats.max_index = triangles.iter().flatten().copied().max();

        if let Some((meshes, handle)) = self.target.as_mut() {
            if let Some(mut mesh) = meshes.get_mut(*handle) {
                write_mesh(&mut mesh, &MeshData::from_strip(vertices, triangles, self.width));
            }
        }
    }
}

pub fn step_strip(
    mut strip: ResMut<TerrainStrip>,
    viewpoint: Res<ScrollViewpoint>,
    mut stats: ResMut<StripStats>,
    mut uploads: ResMut<UploadStats>,
    mut shifts: ResMut<ShiftQueue>,
    terrain: Option<Res<TerrainMesh>>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
) {
    stats.frame += 1;
    let frame = stats.frame;
    let width = strip.0.generator().grid().width;
    let target = match (meshes.as_deref_mut(), terrain.as_deref()) {
        (Some(meshes), Some(terrain)) => Some((meshes, &terrain.0)),
        _ => None,
    };
    let mut sink = FrameSink {
        stats: &mut uploads,
        target,
        width,
    };

    let report = match strip.0.tick(&*viewpoint, &mut sink) {
        Ok(report) => report,
        Err(err) => {
            log::error!("strip tick failed at frame {frame}: {err}");
            return;
        }
    };

    if let Advance::Shifted(shift) = report.advance {
        stats.shifts += 1;
        shifts.push(frame, shift.back_row, shift.front_row);
        let entry = ShiftLogData {
            frame,
            appended_row: shift.appended_row,
            evicted_row: shift.evicted_row,
            viewpoint_z: viewpoint.z(),
        };
        if let Err(err) = strip_logs::log_shift(&entry) {
            log::warn!("failed to write shift log: {err:#}");
        }
    }

    if report.combined.built > 0 {
        stats.wireframe_meshes += report.combined.built;
        stats.wireframe_markers += report.combined.merged;
        let entry = CombineLogData {
            frame,
            built: report.combined.built,
            merged: report.combined.merged,
        };
        if let Err(err) = strip_logs::log_combine(&entry) {
            log::warn!("failed to write combine log: {err:#}");
        }
    }
}

/// Inserts the config, strip and viewpoint resources the plugin systems read.
pub fn insert_strip_resources(app: &mut App, cfg: &AppConfig) -> Result<(), ConfigError> {
    let strip = TerrainStrip::from_config(cfg)?;
    app.insert_resource(*cfg)
        .insert_resource(strip)
        .insert_resource(ScrollViewpoint::from_camera(&cfg.camera));
    Ok(())
}

/// Fixed-step scrolling, generation and wireframe collection.
///
/// Expects [`insert_strip_resources`] to have run first.
pub struct StripPlugin;

impl Plugin for StripPlugin {
    fn build(&self, app: &mut App) {
        scheduling::configure(app);
        app.init_resource::<ShiftQueue>()
            .init_resource::<StripStats>()
            .init_resource::<UploadStats>()
            .add_systems(First, clear_shift_queue)
            .add_systems(
                FixedUpdate,
                (
                    advance_viewpoint.in_set(sets::RETROWAVE_Viewpoint),
                    step_strip.in_set(sets::RETROWAVE_Generate),
                    collect_wireframe.in_set(sets::RETROWAVE_Wireframe),
                ),
            );
    }
}
