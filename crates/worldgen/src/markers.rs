use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3};
use log::debug;

use crate::config::{ConfigError, WireframeCfg};
use crate::mesh::MeshData;
use crate::primitives;
use crate::window::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Vertex,
    Line,
}

/// Shared geometry plus an opaque material reference for one marker kind.
#[derive(Debug, Clone)]
pub struct MarkerPrototype<M> {
    pub mesh: Arc<MeshData>,
    pub material: M,
}

impl<M> MarkerPrototype<M> {
    pub fn new(mesh: MeshData, material: M) -> Self {
        Self {
            mesh: Arc::new(mesh),
            material,
        }
    }

    pub fn sphere(material: M) -> Self {
        Self::new(primitives::marker_sphere(8, 6), material)
    }

    pub fn cylinder(material: M) -> Self {
        Self::new(primitives::marker_cylinder(6), material)
    }
}

#[derive(Debug, Clone)]
pub struct MarkerMesh<M> {
    pub kind: MarkerKind,
    pub mesh: Arc<MeshData>,
    pub material: M,
    pub transform: Affine3A,
}

impl<M: Clone> MarkerMesh<M> {
    pub fn vertex(proto: &MarkerPrototype<M>, position: Vertex, scale: f32) -> Self {
        Self {
            kind: MarkerKind::Vertex,
            mesh: proto.mesh.clone(),
            material: proto.material.clone(),
            transform: Affine3A::from_scale_rotation_translation(
                Vec3::splat(scale),
                Quat::IDENTITY,
                position,
            ),
        }
    }

    /// Cylinder between `a` and `b`; the prototype spans two units along its local y axis.
    pub fn line(proto: &MarkerPrototype<M>, a: Vertex, b: Vertex, thickness: f32) -> Self {
        let span = a - b;
        let distance = span.length();
        let rotation = if distance > f32::EPSILON {
            Quat::from_rotation_arc(Vec3::Y, span / distance)
        } else {
            Quat::IDENTITY
        };
        Self {
            kind: MarkerKind::Line,
            mesh: proto.mesh.clone(),
            material: proto.material.clone(),
            transform: Affine3A::from_scale_rotation_translation(
                Vec3::new(thickness, distance / 2.0, thickness),
                rotation,
                (a + b) / 2.0,
            ),
        }
    }
}

/// Static geometry baked from a batch of markers. Immutable once built.
#[derive(Debug, Clone)]
pub struct CombinedMesh<M> {
    mesh: MeshData,
    material: M,
    constituents: usize,
}

impl<M> CombinedMesh<M> {
    /// Bakes `markers` into one buffer with the material of the first one.
    /// Returns `None` for an empty batch.
    pub fn bake(markers: Vec<MarkerMesh<M>>) -> Option<Self> {
        let constituents = markers.len();
        let mut iter = markers.into_iter();
        let first = iter.next()?;
        let mut mesh = MeshData::default();
        mesh.append_transformed(&first.mesh, &first.transform);
        for marker in iter {
            mesh.append_transformed(&marker.mesh, &marker.transform);
        }
        Some(Self {
            mesh,
            material: first.material,
            constituents,
        })
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn material(&self) -> &M {
        &self.material
    }

    pub fn constituents(&self) -> usize {
        self.constituents
    }
}

/// Pending markers of one kind awaiting a combine.
#[derive(Debug, Clone)]
pub struct MarkerBatcher<M> {
    batch_size: usize,
    pending: Vec<MarkerMesh<M>>,
}

impl<M> MarkerBatcher<M> {
    pub fn new(batch_size: u32) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(Self {
            batch_size: batch_size as usize,
            pending: Vec::new(),
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn enqueue(&mut self, marker: MarkerMesh<M>) {
        self.pending.push(marker);
    }

    /// Partitions every pending marker into full batches plus one remainder batch.
    pub fn combine_all(&mut self) -> Vec<CombinedMesh<M>> {
        let mut out = Vec::with_capacity(self.pending.len().div_ceil(self.batch_size));
        let mut rest = std::mem::take(&mut self.pending);
        while !rest.is_empty() {
            let tail = rest.split_off(rest.len().min(self.batch_size));
            out.extend(CombinedMesh::bake(rest));
            rest = tail;
        }
        out
    }

    /// Bakes full batches only, leaving any short tail pending.
    pub fn combine_full(&mut self) -> Vec<CombinedMesh<M>> {
        let mut out = Vec::new();
        while self.pending.len() >= self.batch_size {
            let tail = self.pending.split_off(self.batch_size);
            let batch = std::mem::replace(&mut self.pending, tail);
            out.extend(CombinedMesh::bake(batch));
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineReport {
    pub built: usize,
    pub merged: usize,
}

impl CombineReport {
    fn absorb<M>(&mut self, meshes: &[CombinedMesh<M>]) {
        self.built += meshes.len();
        self.merged += meshes.iter().map(CombinedMesh::constituents).sum::<usize>();
    }
}

struct Channel<M> {
    proto: MarkerPrototype<M>,
    batcher: MarkerBatcher<M>,
}

/// Turns generated rows into vertex and line markers and merges them in bounded batches.
///
/// With both visualization toggles off every operation is a no-op.
pub struct DebugGeometryBatcher<M> {
    verts: Option<Channel<M>>,
    lines: Option<Channel<M>>,
    vert_scale: f32,
    line_thickness: f32,
    combined: Vec<CombinedMesh<M>>,
}

impl<M: Clone> DebugGeometryBatcher<M> {
    pub fn new(
        cfg: &WireframeCfg,
        vertex_proto: MarkerPrototype<M>,
        line_proto: MarkerPrototype<M>,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let channel = |enabled: bool, proto| -> Result<Option<Channel<M>>, ConfigError> {
            if !enabled {
                return Ok(None);
            }
            Ok(Some(Channel {
                proto,
                batcher: MarkerBatcher::new(cfg.batch_size)?,
            }))
        };
        Ok(Self {
            verts: channel(cfg.visualize_verts, vertex_proto)?,
            lines: channel(cfg.visualize_lines, line_proto)?,
            vert_scale: cfg.vert_scale,
            line_thickness: cfg.line_thickness,
            combined: Vec::new(),
        })
    }

    pub fn disabled() -> Self {
        Self {
            verts: None,
            lines: None,
            vert_scale: 0.0,
            line_thickness: 0.0,
            combined: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.verts.is_some() || self.lines.is_some()
    }

    pub fn pending(&self, kind: MarkerKind) -> usize {
        self.channel(kind).map_or(0, |c| c.batcher.pending())
    }

    pub fn combined(&self) -> &[CombinedMesh<M>] {
        &self.combined
    }

    /// Hands over every combined mesh built so far.
    pub fn take_combined(&mut self) -> Vec<CombinedMesh<M>> {
        std::mem::take(&mut self.combined)
    }

    fn channel(&self, kind: MarkerKind) -> Option<&Channel<M>> {
        match kind {
            MarkerKind::Vertex => self.verts.as_ref(),
            MarkerKind::Line => self.lines.as_ref(),
        }
    }

    /// Queues a sphere per vertex and a cylinder per horizontal edge of one row.
    pub fn observe_row(&mut self, row: impl IntoIterator<Item = Vertex>) {
        if !self.is_active() {
            return;
        }
        let mut previous: Option<Vertex> = None;
        for vertex in row {
            if let Some(verts) = self.verts.as_mut() {
                let marker = MarkerMesh::vertex(&verts.proto, vertex, self.vert_scale);
                verts.batcher.enqueue(marker);
            }
            if let (Some(lines), Some(prev)) = (self.lines.as_mut(), previous) {
                let marker = MarkerMesh::line(&lines.proto, vertex, prev, self.line_thickness);
                lines.batcher.enqueue(marker);
            }
            previous = Some(vertex);
        }
    }

    /// One-shot partition of everything pending, remainder batches included.
    pub fn combine_all(&mut self) -> CombineReport {
        let mut report = CombineReport::default();
        for channel in [self.verts.as_mut(), self.lines.as_mut()].into_iter().flatten() {
            let meshes = channel.batcher.combine_all();
            report.absorb(&meshes);
            self.combined.extend(meshes);
        }
        if report.built > 0 {
            debug!(
                "combined {} markers into {} meshes",
                report.merged, report.built
            );
        }
        report
    }

    /// Partitions a kind into full batches plus a remainder once that kind has
    /// a full batch pending. Kinds below the threshold keep their markers.
    pub fn maybe_combine(&mut self) -> CombineReport {
        let mut report = CombineReport::default();
        for channel in [self.verts.as_mut(), self.lines.as_mut()].into_iter().flatten() {
            if channel.batcher.pending() < channel.batcher.batch_size() {
                continue;
            }
            let meshes = channel.batcher.combine_all();
            report.absorb(&meshes);
            self.combined.extend(meshes);
        }
        if report.built > 0 {
            debug!(
                "combined {} markers into {} meshes",
                report.merged, report.built
            );
        }
        report
    }

    /// Runtime variant: bakes only full batches.
    pub fn combine_ready(&mut self) -> CombineReport {
        let mut report = CombineReport::default();
        for channel in [self.verts.as_mut(), self.lines.as_mut()].into_iter().flatten() {
            let meshes = channel.batcher.combine_full();
            report.absorb(&meshes);
            self.combined.extend(meshes);
        }
        if report.built > 0 {
            debug!(
                "combined {} queued markers into {} meshes",
                report.merged, report.built
            );
        }
        report
    }
}
