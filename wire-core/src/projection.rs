/// Camera and perspective projection
use nalgebra::Point3;

/// Screen-space result of projecting a 3D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub x: f64,
    pub y: f64,
    /// Perspective scale, `focal_length / depth`. Larger is nearer.
    pub scale: f64,
}

impl Projection {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.scale.is_finite()
    }
}

/// Simple pinhole camera.
///
/// `center.x`/`center.y` are the screen position of the optical axis and
/// `center.z` is added to every point's z before the perspective divide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub focal_length: f64,
    pub center: Point3<f64>,
    pub near_clip: f64,
    pub far_clip: f64,
}

impl Camera {
    pub fn new(cx: f64, cy: f64, cz: f64) -> Self {
        Self {
            center: Point3::new(cx, cy, cz),
            ..Self::default()
        }
    }

    /// Camera centered on a `width` x `height` drawing surface.
    pub fn centered(width: u32, height: u32, cz: f64) -> Self {
        Self::new(width as f64 / 2.0, height as f64 / 2.0, cz)
    }

    pub fn with_focal_length(mut self, focal_length: f64) -> Self {
        self.focal_length = focal_length;
        self
    }

    pub fn with_clip(mut self, near: f64, far: f64) -> Self {
        self.near_clip = near;
        self.far_clip = far;
        self
    }

    /// Distance along the view axis, `z + center.z`.
    pub fn depth(&self, z: f64) -> f64 {
        z + self.center.z
    }

    /// Project a point:
    ///
    /// ```text
    /// scale = focal_length / (center.z + z)
    /// x     = center.x + p.x * scale
    /// y     = center.y + p.y * scale
    /// ```
    ///
    /// A point at zero depth divides by zero. The result is not clamped: it
    /// carries IEEE infinities or NaN, and [`Camera::is_visible`] rejects
    /// such a point so it is never drawn.
    pub fn project(&self, p: &Point3<f64>) -> Projection {
        let scale = self.focal_length / self.depth(p.z);
        Projection {
            x: self.center.x + p.x * scale,
            y: self.center.y + p.y * scale,
            scale,
        }
    }

    /// True when `near_clip <= z + center.z <= far_clip` and the depth is nonzero.
    pub fn is_visible(&self, p: &Point3<f64>) -> bool {
        let depth = self.depth(p.z);
        depth >= self.near_clip && depth <= self.far_clip && depth != 0.0
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            focal_length: 300.0,
            center: Point3::origin(),
            near_clip: 100.0,
            far_clip: 100_000.0,
        }
    }
}
