//! Low-poly prototype shapes for wireframe markers.

use std::f32::consts::{PI, TAU};

use crate::mesh::MeshData;

/// UV sphere of radius 0.5 centered on the origin.
pub fn marker_sphere(sectors: u32, stacks: u32) -> MeshData {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let radius = 0.5;
    let mut mesh = MeshData::default();

    for j in 0..=stacks {
        let v = j as f32 / stacks as f32;
        let phi = v * PI;
        for i in 0..=sectors {
            let u = i as f32 / sectors as f32;
            let theta = u * TAU;
            let normal = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
            mesh.positions
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            mesh.normals.push(normal);
            mesh.uvs.push([u, v]);
        }
    }

    let ring = sectors + 1;
    for j in 0..stacks {
        for i in 0..sectors {
            let a = j * ring + i;
            let b = a + ring;
            if j != 0 {
                mesh.indices.extend_from_slice(&[a, a + 1, b]);
            }
            if j != stacks - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b + 1, b]);
            }
        }
    }
    mesh
}

/// Open-ended cylinder of radius 0.5 spanning y in [-1, 1].
pub fn marker_cylinder(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::default();

    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let theta = u * TAU;
        let (s, c) = theta.sin_cos();
        for (y, v) in [(-1.0, 0.0), (1.0, 1.0)] {
            mesh.positions.push([c * 0.5, y, s * 0.5]);
            mesh.normals.push([c, 0.0, s]);
            mesh.uvs.push([u, v]);
        }
    }

    for i in 0..segments {
        let bottom = i * 2;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        mesh.indices
            .extend_from_slice(&[bottom, top, next_bottom, next_bottom, top, next_top]);
    }
    mesh
}
