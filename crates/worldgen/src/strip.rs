use log::{debug, info, warn};

use crate::config::{ConfigError, GridCfg};
use crate::height::{HeightField, HeightParams};
use crate::window::{MeshWindow, Triangle, Vertex, WindowError};

/// Supplies the viewpoint position along the scroll axis.
pub trait Viewpoint {
    fn scroll_z(&self) -> f32;
}

impl Viewpoint for f32 {
    fn scroll_z(&self) -> f32 {
        *self
    }
}

/// Consumes the live buffers once per tick and makes them renderable.
pub trait MeshSink {
    fn upload(&mut self, vertices: &[Vertex], triangles: &[Triangle]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripState {
    Uninitialized,
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub appended_row: i32,
    pub evicted_row: i32,
    pub back_row: i32,
    pub front_row: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The full initial window was synthesized on this call.
    Initialized,
    Shifted(Shift),
    Idle,
}

impl Advance {
    pub fn shifted(&self) -> bool {
        matches!(self, Advance::Shifted(_))
    }
}

/// Drives a [`MeshWindow`] forward one row at a time as the viewpoint advances.
///
/// Live rows are `back_row..front_row`; `front_row - back_row` equals the
/// configured depth outside of [`StripGenerator::advance`].
pub struct StripGenerator {
    grid: GridCfg,
    heights: HeightField,
    window: MeshWindow,
    state: StripState,
    back_row: i32,
    front_row: i32,
    last_viewpoint: Option<f32>,
}

impl StripGenerator {
    pub fn new(grid: GridCfg, height: HeightParams) -> Result<Self, ConfigError> {
        grid.validate()?;
        height.validate()?;
        Ok(Self {
            grid,
            heights: HeightField::new(height),
            window: MeshWindow::with_capacity(grid.width, grid.depth),
            state: StripState::Uninitialized,
            back_row: 0,
            front_row: 0,
            last_viewpoint: None,
        })
    }

    pub fn grid(&self) -> &GridCfg {
        &self.grid
    }

    pub fn heights(&self) -> &HeightField {
        &self.heights
    }

    pub fn window(&self) -> &MeshWindow {
        &self.window
    }

    pub fn state(&self) -> StripState {
        self.state
    }

    pub fn back_row(&self) -> i32 {
        self.back_row
    }

    pub fn front_row(&self) -> i32 {
        self.front_row
    }

    /// World z of the trailing row, the one the viewpoint must outrun to trigger a shift.
    pub fn trailing_row_z(&self) -> f32 {
        self.back_row as f32
    }

    /// Synthesizes the full window. Does nothing once steady.
    pub fn initialize(&mut self) -> Result<bool, WindowError> {
        if self.state == StripState::Steady {
            return Ok(false);
        }
        self.window.clear();
        for row in self.back_row..self.back_row + self.grid.depth as i32 {
            self.window.append_row(row, &self.heights)?;
        }
        self.front_row = self.back_row + self.grid.depth as i32;
        self.state = StripState::Steady;
        info!(
            "strip initialized: {} rows x {} columns ({} vertices)",
            self.grid.depth,
            self.grid.stride(),
            self.window.vertex_count()
        );
        Ok(true)
    }

    /// One generation step. Performs at most one append/evict pair.
    pub fn advance(&mut self, viewpoint_z: f32) -> Result<Advance, WindowError> {
        if self.initialize()? {
            self.last_viewpoint = Some(viewpoint_z);
            return Ok(Advance::Initialized);
        }

        if let Some(last) = self.last_viewpoint {
            let step = viewpoint_z - last;
            if step > self.grid.lookahead_margin {
                warn!(
                    "viewpoint moved {step:.2} units in one tick, more than the {:.2} lookahead margin",
                    self.grid.lookahead_margin
                );
            }
        }
        self.last_viewpoint = Some(viewpoint_z);

        if viewpoint_z - self.grid.lookahead_margin <= self.trailing_row_z() {
            return Ok(Advance::Idle);
        }

        let appended_row = self.front_row;
        let evicted_row = self.back_row;
        self.window.append_row(appended_row, &self.heights)?;
        self.window.evict_row()?;
        self.front_row += 1;
        self.back_row += 1;

        let shift = Shift {
            appended_row,
            evicted_row,
            back_row: self.back_row,
            front_row: self.front_row,
        };
        debug!(
            "strip shift: +row {appended_row} -row {evicted_row} (viewpoint z {viewpoint_z:.2})"
        );
        Ok(Advance::Shifted(shift))
    }

    /// Replaces the height parameters; takes effect on the next synthesized row.
    pub fn set_height_params(&mut self, params: HeightParams) -> Result<(), ConfigError> {
        params.validate()?;
        self.heights = HeightField::new(params);
        Ok(())
    }

    /// Re-samples every live row from the current height parameters without moving the cursors.
    pub fn regenerate(&mut self) -> Result<(), WindowError> {
        self.state = StripState::Uninitialized;
        self.initialize().map(|_| ())
    }

    /// Hands the live buffers to `sink`.
    pub fn publish(&mut self, sink: &mut impl MeshSink) {
        let (vertices, triangles) = self.window.buffers();
        sink.upload(vertices, triangles);
    }

    /// Advances against `viewpoint` and always publishes afterwards.
    pub fn tick(
        &mut self,
        viewpoint: &impl Viewpoint,
        sink: &mut impl MeshSink,
    ) -> Result<Advance, WindowError> {
        let advance = self.advance(viewpoint.scroll_z())?;
        self.publish(sink);
        Ok(advance)
    }
}
