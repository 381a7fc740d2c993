use crate::config::{ConfigError, StripConfig};
use crate::markers::{CombineReport, DebugGeometryBatcher, MarkerPrototype};
use crate::strip::{Advance, MeshSink, StripGenerator, Viewpoint};
use crate::window::WindowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub advance: Advance,
    pub combined: CombineReport,
}

/// A strip generator paired with its wireframe batcher.
pub struct Strip<M> {
    generator: StripGenerator,
    wireframe: DebugGeometryBatcher<M>,
}

impl<M: Clone> Strip<M> {
    pub fn new(
        cfg: &StripConfig,
        vertex_proto: MarkerPrototype<M>,
        line_proto: MarkerPrototype<M>,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            generator: StripGenerator::new(cfg.grid, cfg.height)?,
            wireframe: DebugGeometryBatcher::new(&cfg.wireframe, vertex_proto, line_proto)?,
        })
    }

    /// A strip without wireframe markers.
    pub fn plain(cfg: &StripConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            generator: StripGenerator::new(cfg.grid, cfg.height)?,
            wireframe: DebugGeometryBatcher::disabled(),
        })
    }

    pub fn generator(&self) -> &StripGenerator {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut StripGenerator {
        &mut self.generator
    }

    pub fn wireframe(&self) -> &DebugGeometryBatcher<M> {
        &self.wireframe
    }

    pub fn wireframe_mut(&mut self) -> &mut DebugGeometryBatcher<M> {
        &mut self.wireframe
    }

    /// Advances one step, queues markers for any new rows, combines and publishes.
    pub fn tick(
        &mut self,
        viewpoint: &impl Viewpoint,
        sink: &mut impl MeshSink,
    ) -> Result<TickReport, WindowError> {
        let advance = self.generator.advance(viewpoint.scroll_z())?;
        let combined = match advance {
            Advance::Initialized => {
                let window = self.generator.window();
                for row in self.generator.back_row()..self.generator.front_row() {
                    self.wireframe.observe_row(window.row(row));
                }
                self.wireframe.combine_all()
            }
            Advance::Shifted(shift) => {
                self.wireframe
                    .observe_row(self.generator.window().row(shift.appended_row));
                self.wireframe.combine_ready()
            }
            Advance::Idle => self.wireframe.combine_ready(),
        };
        self.generator.publish(sink);
        Ok(TickReport { advance, combined })
    }
}
