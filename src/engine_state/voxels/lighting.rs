//! Point lights placed in the world and the parameters they share.

use cgmath::Vector4;
use serde::{Deserialize, Serialize};

/// A point light. `w = 1` marks a real light, `w = 0` the end-of-list sentinel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector4<f32>,
}

impl PointLight {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        PointLight {
            position: Vector4::new(x, y, z, 1.0),
        }
    }

    /// The terminator the shader uses to stop walking the light array.
    pub fn sentinel() -> Self {
        PointLight {
            position: Vector4::new(-1.0, -1.0, -1.0, 0.0),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.position.w == 0.0
    }
}

/// Colors, attenuation and spotlight shape applied to every point light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingParams {
    /// Scene-wide ambient intensity
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub spot_direction: [f32; 3],
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
    pub spot_cutoff_degrees: f32,
    pub spot_exponent: f32,
}

impl Default for LightingParams {
    fn default() -> Self {
        LightingParams {
            ambient: 0.25,
            diffuse: 0.5,
            specular: 0.5,
            spot_direction: [0.0, 1.0, 0.0],
            constant_attenuation: 0.2,
            linear_attenuation: 0.2,
            quadratic_attenuation: 0.05,
            spot_cutoff_degrees: 90.0,
            spot_exponent: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_the_only_directional_entry() {
        assert!(PointLight::sentinel().is_sentinel());
        assert!(!PointLight::at(0.0, 0.0, 0.0).is_sentinel());
    }
}
