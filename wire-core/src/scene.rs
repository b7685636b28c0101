/// Scene configuration and depth shading
use nalgebra::Point3;

use crate::projection::Camera;
use crate::surface::Color;

/// Linear map of `value` from `[from_start, from_end]` onto `[1, 0]`, clamped.
fn falloff(value: f64, from_start: f64, from_end: f64) -> f64 {
    if from_start == from_end {
        return if value <= from_start { 1.0 } else { 0.0 };
    }
    let t = (value - from_start) / (from_end - from_start);
    (1.0 - t).clamp(0.0, 1.0)
}

/// Depth fog: opaque at `near`, transparent at `far`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub enabled: bool,
    pub near: f64,
    pub far: f64,
}

impl Fog {
    pub fn new(near: f64, far: f64) -> Self {
        Self {
            enabled: true,
            near,
            far,
        }
    }

    /// Attenuation for an object at `depth` (already offset by the camera).
    pub fn amount(&self, depth: f64) -> f64 {
        if !self.enabled {
            return 1.0;
        }
        falloff(depth, self.near, self.far)
    }
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            enabled: false,
            near: 400.0,
            far: 1200.0,
        }
    }
}

/// Height attenuation: opaque at `top`, transparent at `bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterLevel {
    pub enabled: bool,
    pub top: f64,
    pub bottom: f64,
}

impl WaterLevel {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self {
            enabled: true,
            top,
            bottom,
        }
    }

    pub fn amount(&self, height: f64) -> f64 {
        if !self.enabled {
            return 1.0;
        }
        falloff(height, self.top, self.bottom)
    }
}

impl Default for WaterLevel {
    fn default() -> Self {
        Self {
            enabled: false,
            top: 0.0,
            bottom: 100.0,
        }
    }
}

/// Everything the render pipeline reads besides the shape itself.
///
/// Passed explicitly to every render call; there is no global camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scene {
    pub camera: Camera,
    pub fog: Fog,
    pub water: WaterLevel,
    /// Base stroke/fill color. Shading only ever lowers its alpha.
    pub color: Color,
    /// Multiply line widths by the segment's average projection scale.
    pub scale_line_width: bool,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn with_fog(mut self, fog: Fog) -> Self {
        self.fog = fog;
        self
    }

    pub fn with_water(mut self, water: WaterLevel) -> Self {
        self.water = water;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_scaled_line_width(mut self, enabled: bool) -> Self {
        self.scale_line_width = enabled;
        self
    }

    /// Combined attenuation in `[0, 1]` for an object at `p`: the lower of
    /// the fog factor (from depth) and the water factor (from height).
    pub fn shade(&self, p: &Point3<f64>) -> f64 {
        let fog = self.fog.amount(self.camera.depth(p.z));
        let water = self.water.amount(p.y);
        fog.min(water)
    }

    /// Base color with alpha attenuated by [`Scene::shade`].
    pub fn shaded_color(&self, p: &Point3<f64>) -> Color {
        self.color.faded(self.shade(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_disabled_shading_is_opaque() {
        let scene = Scene::default();
        assert_eq!(scene.shade(&Point3::new(0.0, 5000.0, 99_999.0)), 1.0);
    }

    #[test]
    fn test_fog_maps_depth_linearly() {
        let fog = Fog::new(400.0, 1200.0);
        assert_eq!(fog.amount(400.0), 1.0);
        assert_eq!(fog.amount(1200.0), 0.0);
        assert_relative_eq!(fog.amount(800.0), 0.5, epsilon = 1e-12);
        assert_eq!(fog.amount(100.0), 1.0);
        assert_eq!(fog.amount(5000.0), 0.0);
    }

    #[test]
    fn test_fog_uses_camera_depth() {
        let scene = Scene::new(Camera::new(0.0, 0.0, 300.0)).with_fog(Fog::new(400.0, 1200.0));
        assert_relative_eq!(scene.shade(&Point3::new(0.0, 0.0, 500.0)), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_water_and_fog_take_minimum() {
        let scene = Scene::new(Camera::new(0.0, 0.0, 0.0))
            .with_fog(Fog::new(0.0, 100.0))
            .with_water(WaterLevel::new(0.0, 10.0));
        // fog 0.9, water 0.25
        let p = Point3::new(0.0, 7.5, 10.0);
        assert_relative_eq!(scene.shade(&p), 0.25, epsilon = 1e-12);
        assert_relative_eq!(scene.shaded_color(&p).a, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_range_is_a_step() {
        let fog = Fog::new(10.0, 10.0);
        assert_eq!(fog.amount(10.0), 1.0);
        assert_eq!(fog.amount(10.5), 0.0);
    }
}
