use bevy::pbr::{MeshMaterial3d, StandardMaterial};
use bevy::prelude::*;

use crate::systems::mesh_bridge::to_bevy_mesh;
use crate::systems::strip::{MarkerMaterial, TerrainStrip};

#[derive(Resource, Debug, Clone)]
pub struct WireframeMaterials {
    pub vertex: Handle<StandardMaterial>,
    pub line: Handle<StandardMaterial>,
}

impl WireframeMaterials {
    pub fn handle(&self, key: MarkerMaterial) -> Handle<StandardMaterial> {
        match key {
            MarkerMaterial::Vertex => self.vertex.clone(),
            MarkerMaterial::Line => self.line.clone(),
        }
    }
}

/// One merged batch of wireframe markers.
#[derive(Component, Debug)]
pub struct WireframeBatch {
    pub markers: usize,
}

/// Moves freshly combined marker meshes out of the strip. Without a renderer they are dropped.
pub fn collect_wireframe(
    mut commands: Commands,
    mut strip: ResMut<TerrainStrip>,
    materials: Option<Res<WireframeMaterials>>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
) {
    if strip.0.wireframe().combined().is_empty() {
        return;
    }
    let combined = strip.0.wireframe_mut().take_combined();
    let (Some(materials), Some(meshes)) = (materials, meshes.as_deref_mut()) else {
        return;
    };
    for batch in combined {
        commands.spawn((
            Mesh3d(meshes.add(to_bevy_mesh(batch.mesh()))),
            MeshMaterial3d(materials.handle(*batch.material())),
            Transform::IDENTITY,
            WireframeBatch {
                markers: batch.constituents(),
            },
        ));
    }
}
