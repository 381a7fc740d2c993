use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeightParams {
    pub seed: u32,
    pub noise_scale: f32,
    pub height_multiplier: f32,
    pub sharpness: f32,
    /// Valley center, in noise-space units along the x axis.
    pub valley_shift: f32,
    pub valley_average_incline: f32,
    pub valley_subtract_incline: f32,
    pub floor_height: f32,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            seed: 0,
            noise_scale: 0.3,
            height_multiplier: 2.5,
            sharpness: 3.0,
            valley_shift: 7.1,
            valley_average_incline: 0.4,
            valley_subtract_incline: 1.3,
            floor_height: 1.0,
        }
    }
}

impl HeightParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("noise_scale", self.noise_scale),
            ("height_multiplier", self.height_multiplier),
            ("sharpness", self.sharpness),
            ("valley_shift", self.valley_shift),
            ("valley_average_incline", self.valley_average_incline),
            ("valley_subtract_incline", self.valley_subtract_incline),
            ("floor_height", self.floor_height),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        // Negative values here push the surface below zero or make it NaN.
        let non_negative = [
            ("height_multiplier", self.height_multiplier),
            ("valley_average_incline", self.valley_average_incline),
            ("valley_subtract_incline", self.valley_subtract_incline),
            ("floor_height", self.floor_height),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}

/// Pure mapping from a lattice point to a surface elevation.
#[derive(Clone)]
pub struct HeightField {
    params: HeightParams,
    perlin: Perlin,
}

impl HeightField {
    pub fn new(params: HeightParams) -> Self {
        Self {
            params,
            perlin: Perlin::new(params.seed),
        }
    }

    pub fn params(&self) -> &HeightParams {
        &self.params
    }

    pub fn elevation(&self, x: i32, z: i32) -> f32 {
        let p = &self.params;
        let scale = p.noise_scale as f64;
        // Perlin yields [-1, 1]; remap to [0, 1] before shaping.
        let sample = self.perlin.get([x as f64 * scale, z as f64 * scale]);
        let mut height = ((sample + 1.0) * 0.5).max(0.0) as f32;

        height *= p.height_multiplier;
        height = height.powf(p.sharpness);

        let offset = x as f32 * p.noise_scale - p.valley_shift;
        let soft = p.valley_average_incline * offset * offset;
        if height > soft {
            height = (height + soft) / 2.0;
        }

        let hard = p.valley_subtract_incline * offset * offset;
        if height > hard {
            height = hard;
        }

        height.max(p.floor_height)
    }

    /// Upper bound the hard valley cut places on column `x`, before the floor clamp.
    pub fn valley_ceiling(&self, x: i32) -> f32 {
        let p = &self.params;
        let offset = x as f32 * p.noise_scale - p.valley_shift;
        p.valley_subtract_incline * offset * offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_is_deterministic() {
        let a = HeightField::new(HeightParams::default());
        let b = HeightField::new(HeightParams::default());
        for z in 0..50 {
            for x in 0..=20 {
                assert_eq!(a.elevation(x, z).to_bits(), a.elevation(x, z).to_bits());
                assert_eq!(a.elevation(x, z).to_bits(), b.elevation(x, z).to_bits());
            }
        }
    }

    #[test]
    fn elevation_never_drops_below_floor() {
        let params = HeightParams {
            floor_height: 0.75,
            ..HeightParams::default()
        };
        let field = HeightField::new(params);
        for z in 0..400 {
            for x in 0..=40 {
                assert!(field.elevation(x, z) >= 0.75, "({x}, {z})");
            }
        }
    }

    #[test]
    fn hard_cut_bounds_every_column() {
        let field = HeightField::new(HeightParams {
            height_multiplier: 4.0,
            floor_height: 0.0,
            ..HeightParams::default()
        });
        for z in 0..200 {
            for x in 0..=40 {
                let ceiling = field.valley_ceiling(x);
                assert!(field.elevation(x, z) <= ceiling + f32::EPSILON, "({x}, {z})");
            }
        }
    }

    #[test]
    fn valley_ceiling_shrinks_toward_center() {
        let field = HeightField::new(HeightParams::default());
        // Center sits at x = 7.1 / 0.3 ~= 23.67.
        let mut previous = f32::INFINITY;
        for x in 0..=23 {
            let ceiling = field.valley_ceiling(x);
            assert!(ceiling < previous, "x = {x}");
            previous = ceiling;
        }
        // Right at the center the cut flattens the surface onto the floor.
        for z in 0..100 {
            assert_eq!(field.elevation(24, z), field.params().floor_height);
        }
    }

    #[test]
    fn soft_cut_averages_before_hard_cut() {
        // A very shallow hard profile leaves only the soft cut visible near the edge.
        let params = HeightParams {
            valley_subtract_incline: 1.0e6,
            floor_height: 0.0,
            ..HeightParams::default()
        };
        let field = HeightField::new(params);
        let x = 0;
        let offset = x as f32 * params.noise_scale - params.valley_shift;
        let soft = params.valley_average_incline * offset * offset;
        for z in 0..100 {
            let y = field.elevation(x, z);
            let perlin = Perlin::new(params.seed);
            let raw = ((perlin.get([0.0, z as f64 * params.noise_scale as f64]) + 1.0) * 0.5)
                .max(0.0) as f32;
            let shaped = (raw * params.height_multiplier).powf(params.sharpness);
            let expected = if shaped > soft {
                (shaped + soft) / 2.0
            } else {
                shaped
            };
            assert_eq!(y.to_bits(), expected.to_bits(), "z = {z}");
        }
    }

    #[test]
    fn negative_floor_and_inclines_are_rejected() {
        let floor = HeightParams {
            floor_height: -0.5,
            ..HeightParams::default()
        };
        assert_eq!(
            floor.validate(),
            Err(ConfigError::Negative {
                name: "floor_height",
                value: -0.5
            })
        );
        let incline = HeightParams {
            valley_subtract_incline: -1.3,
            ..HeightParams::default()
        };
        assert!(matches!(
            incline.validate(),
            Err(ConfigError::Negative {
                name: "valley_subtract_incline",
                ..
            })
        ));
        let average = HeightParams {
            valley_average_incline: -0.4,
            ..HeightParams::default()
        };
        assert!(average.validate().is_err());
        assert_eq!(HeightParams::default().validate(), Ok(()));
        let flat = HeightParams {
            floor_height: 0.0,
            ..HeightParams::default()
        };
        assert_eq!(flat.validate(), Ok(()));
    }

    #[test]
    fn far_rows_are_stable() {
        let field = HeightField::new(HeightParams::default());
        let z = 50_000_000;
        let first = field.elevation(5, z);
        assert!(first.is_finite());
        assert!(first >= 1.0);
        for _ in 0..3 {
            assert_eq!(field.elevation(5, z).to_bits(), first.to_bits());
        }
    }
}
