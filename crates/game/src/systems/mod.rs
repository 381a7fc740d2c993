pub mod mesh_bridge;
pub mod shift_queue;
pub mod strip;
pub mod tune;
pub mod viewpoint;
pub mod wireframe;
