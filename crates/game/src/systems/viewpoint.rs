use bevy::prelude::*;
use worldgen::Viewpoint;

use crate::config::{AppConfig, CameraCfg};

/// Position of the scrolling camera along +z, advanced every fixed step.
///
/// Distance accumulates in `f64` so small steps still register far from the
/// origin; the generator and camera read it back as `f32`.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ScrollViewpoint {
    pub distance: f64,
    pub speed: f32,
}

impl ScrollViewpoint {
    pub fn from_camera(cfg: &CameraCfg) -> Self {
        Self {
            distance: f64::from(cfg.start_z),
            speed: cfg.speed,
        }
    }

    pub fn z(&self) -> f32 {
        self.distance as f32
    }

    pub fn advance_by(&mut self, secs: f64) {
        self.distance += f64::from(self.speed) * secs;
    }
}

impl Viewpoint for ScrollViewpoint {
    fn scroll_z(&self) -> f32 {
        self.z()
    }
}

#[derive(Component)]
pub struct StripCamera;

pub fn advance_viewpoint(time: Res<Time>, mut viewpoint: ResMut<ScrollViewpoint>) {
    viewpoint.advance_by(time.delta_secs_f64());
}

/// Camera centered over the strip at `z`, looking down the scroll axis.
pub fn camera_transform(cfg: &AppConfig, z: f32) -> Transform {
    let x = cfg.grid.width as f32 * 0.5;
    let rotation = Quat::from_rotation_y(std::f32::consts::PI)
        * Quat::from_rotation_x(-cfg.camera.pitch.to_radians());
    Transform::from_xyz(x, cfg.camera.height, z).with_rotation(rotation)
}

pub fn follow_viewpoint(
    viewpoint: Res<ScrollViewpoint>,
    cfg: Res<AppConfig>,
    mut cameras: Query<&mut Transform, With<StripCamera>>,
) {
    for mut transform in &mut cameras {
        *transform = camera_transform(&cfg, viewpoint.z());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_faces_forward_and_down() {
        let cfg = AppConfig::default();
        let transform = camera_transform(&cfg, 12.0);
        let forward = transform.forward();
        assert!(forward.z > 0.0, "{forward:?}");
        assert!(forward.y < 0.0, "{forward:?}");
        assert_eq!(transform.translation.z, 12.0);
        assert_eq!(transform.translation.x, 10.0);
    }

    #[test]
    fn small_steps_still_move_far_from_origin() {
        let mut viewpoint = ScrollViewpoint {
            distance: 1.0e7,
            speed: 5.0,
        };
        for _ in 0..60 {
            viewpoint.advance_by(1.0 / 60.0);
        }
        assert!((viewpoint.distance - (1.0e7 + 5.0)).abs() < 1e-6, "{viewpoint:?}");
        assert!(viewpoint.z() >= 1.0e7 + 4.0);
    }

    #[test]
    fn start_z_seeds_the_distance() {
        let cfg = CameraCfg {
            start_z: 3.5,
            ..CameraCfg::default()
        };
        let viewpoint = ScrollViewpoint::from_camera(&cfg);
        assert_eq!(viewpoint.distance, 3.5);
        assert_eq!(viewpoint.z(), 3.5);
    }
}
