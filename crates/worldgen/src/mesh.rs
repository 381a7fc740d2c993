use glam::{Affine3A, Vec3};

use crate::window::{Triangle, Vertex};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Builds renderable buffers for the live strip. `width` is the number of quads per row.
    pub fn from_strip(vertices: &[Vertex], triangles: &[Triangle], width: u32) -> Self {
        let stride = width as usize + 1;
        let rows = vertices.len() / stride.max(1);
        let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.to_array()).collect();
        let mut uvs = Vec::with_capacity(vertices.len());
        for j in 0..rows {
            for i in 0..stride {
                let u = i as f32 / width.max(1) as f32;
                let v = j as f32 / (rows.saturating_sub(1)).max(1) as f32;
                uvs.push([u, v]);
            }
        }
        let normals = smooth_normals(vertices, triangles);
        let indices = triangles.iter().flatten().copied().collect();
        Self {
            positions,
            normals,
            uvs,
            indices,
        }
    }

    /// Appends `other` with `transform` baked into its positions and normals.
    pub fn append_transformed(&mut self, other: &MeshData, transform: &Affine3A) {
        let base = self.positions.len() as u32;
        let normal_matrix = transform.matrix3.inverse().transpose();
        self.positions.extend(
            other
                .positions
                .iter()
                .map(|p| transform.transform_point3(Vec3::from_array(*p)).to_array()),
        );
        self.normals.extend(other.normals.iter().map(|n| {
            (normal_matrix * Vec3::from_array(*n))
                .normalize_or_zero()
                .to_array()
        }));
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

/// Area-weighted vertex normals accumulated from the triangle list.
pub fn smooth_normals(vertices: &[Vertex], triangles: &[Triangle]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; vertices.len()];
    for tri in triangles {
        let [a, b, c] = tri.map(|i| i as usize);
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let face = (vertices[b] - vertices[a]).cross(vertices[c] - vertices[a]);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            let n = if n == Vec3::ZERO { Vec3::Y } else { n };
            n.to_array()
        })
        .collect()
}
