use std::collections::VecDeque;

use glam::Vec3;
use thiserror::Error;

use crate::height::HeightField;

pub type Vertex = Vec3;
pub type Triangle = [u32; 3];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("triangle {triangle} references vertex {index} but only {live} vertices are live")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        live: usize,
    },
    #[error("cannot evict from an empty window")]
    EmptyWindow,
    #[error("row {got} does not follow row {expected_after}")]
    NonContiguousRow { expected_after: i32, got: i32 },
    #[error("window holds {vertices} vertices, not a multiple of the {stride}-vertex row stride")]
    RowWidthMismatch { vertices: usize, stride: usize },
}

/// Live vertex and triangle buffers for the rows currently in view.
///
/// Vertices sit in a ring buffer, oldest row first. Triangles are numbered
/// relative to the oldest live row, so the index list for `n` rows is always a
/// prefix of the list for `n + 1` rows. Evicting the oldest row therefore
/// rebases every remaining index by dropping the last quad row of triangles,
/// which costs `O(width)` instead of a pass over the whole buffer.
#[derive(Debug, Clone)]
pub struct MeshWindow {
    width: u32,
    vertices: VecDeque<Vertex>,
    triangles: Vec<Triangle>,
    first_row: i32,
    rows: usize,
}

impl MeshWindow {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            vertices: VecDeque::new(),
            triangles: Vec::new(),
            first_row: 0,
            rows: 0,
        }
    }

    pub fn with_capacity(width: u32, depth: u32) -> Self {
        let stride = width as usize + 1;
        let rows = depth as usize + 1;
        Self {
            width,
            vertices: VecDeque::with_capacity(stride * rows),
            triangles: Vec::with_capacity(width as usize * 2 * rows),
            first_row: 0,
            rows: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn stride(&self) -> usize {
        self.width as usize + 1
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Row index of the oldest live row, if any.
    pub fn first_row(&self) -> Option<i32> {
        (self.rows > 0).then_some(self.first_row)
    }

    /// Row index of the newest live row, if any.
    pub fn last_row(&self) -> Option<i32> {
        (self.rows > 0).then(|| self.first_row + self.rows as i32 - 1)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertices(&self) -> impl ExactSizeIterator<Item = Vertex> + '_ {
        self.vertices.iter().copied()
    }

    /// Vertices of the live row `row`, or an empty iterator when it is not live.
    pub fn row(&self, row: i32) -> impl Iterator<Item = Vertex> + '_ {
        let stride = self.stride();
        let range = match self.first_row() {
            Some(first) if row >= first && ((row - first) as usize) < self.rows => {
                let start = (row - first) as usize * stride;
                start..start + stride
            }
            _ => 0..0,
        };
        self.vertices.range(range).copied()
    }

    /// Contiguous view of both buffers, as handed to a mesh sink.
    pub fn buffers(&mut self) -> (&[Vertex], &[Triangle]) {
        (self.vertices.make_contiguous(), &self.triangles)
    }

    /// Samples `width + 1` vertices for `row` and stitches them to the previous row.
    pub fn append_row(&mut self, row: i32, heights: &HeightField) -> Result<(), WindowError> {
        if let Some(last) = self.last_row() {
            if row != last + 1 {
                return Err(WindowError::NonContiguousRow {
                    expected_after: last,
                    got: row,
                });
            }
        } else {
            self.first_row = row;
        }

        let stride = self.stride();
        let previous_base = self.vertices.len().checked_sub(stride);
        for x in 0..=self.width as i32 {
            let y = heights.elevation(x, row);
            self.vertices.push_back(Vec3::new(x as f32, y, row as f32));
        }
        self.rows += 1;

        if let Some(base) = previous_base {
            self.stitch(base as u32);
        }
        Ok(())
    }

    fn stitch(&mut self, base: u32) {
        let w = self.width;
        for x in 0..w {
            let v = base + x;
            self.triangles.push([v, v + w + 1, v + 1]);
            self.triangles.push([v + 1, v + w + 1, v + w + 2]);
        }
    }

    /// Drops the oldest row's vertices and rebases the triangle list onto the new oldest row.
    pub fn evict_row(&mut self) -> Result<(), WindowError> {
        if self.rows == 0 {
            return Err(WindowError::EmptyWindow);
        }
        let stride = self.stride();
        if self.vertices.len() < stride {
            return Err(WindowError::RowWidthMismatch {
                vertices: self.vertices.len(),
                stride,
            });
        }
        self.vertices.drain(..stride);
        let keep = self
            .triangles
            .len()
            .saturating_sub(self.width as usize * 2);
        self.triangles.truncate(keep);
        self.rows -= 1;
        self.first_row += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.rows = 0;
    }

    /// Verifies that every triangle index addresses a live vertex.
    pub fn check_indices(&self) -> Result<(), WindowError> {
        let stride = self.stride();
        if self.vertices.len() != self.rows * stride {
            return Err(WindowError::RowWidthMismatch {
                vertices: self.vertices.len(),
                stride,
            });
        }
        let live = self.vertices.len();
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= live) {
                return Err(WindowError::IndexOutOfRange {
                    triangle,
                    index,
                    live,
                });
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn push_raw_triangle(&mut self, tri: Triangle) {
        self.triangles.push(tri);
    }
}
