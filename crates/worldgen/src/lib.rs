//! Streaming procedural terrain strip: a height field sampled row by row into a
//! sliding vertex/index window, plus batching of wireframe marker meshes.

pub mod config;
pub mod driver;
pub mod height;
pub mod markers;
pub mod mesh;
pub mod primitives;
pub mod strip;
pub mod window;

pub use config::{ConfigError, GridCfg, StripConfig, WireframeCfg};
pub use driver::{Strip, TickReport};
pub use height::{HeightField, HeightParams};
pub use markers::{
    CombineReport, CombinedMesh, DebugGeometryBatcher, MarkerBatcher, MarkerKind, MarkerMesh,
    MarkerPrototype,
};
pub use mesh::MeshData;
pub use strip::{Advance, MeshSink, Shift, StripGenerator, StripState, Viewpoint};
pub use window::{MeshWindow, Triangle, Vertex, WindowError};
