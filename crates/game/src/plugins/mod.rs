mod visuals;

pub use visuals::VisualsPlugin;
