use bevy::asset::RenderAssetUsages;
use bevy::color::LinearRgba;
use bevy::mesh::{Mesh, PrimitiveTopology};
use bevy::pbr::{MeshMaterial3d, StandardMaterial};
use bevy::prelude::*;
use retrowave::config::AppConfig;
use retrowave::scheduling::sets;
use retrowave::systems::strip::TerrainMesh;
use retrowave::systems::viewpoint::{camera_transform, follow_viewpoint, ScrollViewpoint, StripCamera};
use retrowave::systems::wireframe::WireframeMaterials;

pub struct VisualsPlugin;
impl Plugin for VisualsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.02, 0.0, 0.05)))
            .add_systems(Startup, setup)
            .add_systems(Update, follow_viewpoint.in_set(sets::RETROWAVE_Present));
    }
}

fn setup(
    mut cmds: Commands,
    cfg: Res<AppConfig>,
    viewpoint: Res<ScrollViewpoint>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    cmds.spawn((
        Camera3d::default(),
        Camera::default(),
        camera_transform(&cfg, viewpoint.z()),
        StripCamera,
    ));
    cmds.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    // Filled in by the strip sink on the first frame.
    let terrain = meshes.add(Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    ));
    cmds.insert_resource(TerrainMesh(terrain.clone()));
    cmds.spawn((
        Mesh3d(terrain),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.06, 0.02, 0.12),
            emissive: LinearRgba::new(0.15, 0.02, 0.3, 1.0),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::IDENTITY,
    ));

    cmds.insert_resource(WireframeMaterials {
        vertex: materials.add(StandardMaterial {
            base_color: Color::srgb(0.1, 0.8, 1.0),
            unlit: true,
            ..default()
        }),
        line: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.1, 0.75),
            unlit: true,
            ..default()
        }),
    });
}
