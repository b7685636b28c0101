/// Axis-aligned bounds and axis selection
use nalgebra::Point3;

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn of(self, p: &Point3<f64>) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

/// An axis-aligned box, inclusive on every face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on the origin.
    pub fn centered(w: f64, h: f64, d: f64) -> Self {
        Self {
            min: Point3::new(-w / 2.0, -h / 2.0, -d / 2.0),
            max: Point3::new(w / 2.0, h / 2.0, d / 2.0),
        }
    }

    /// Smallest box containing every position, or `None` for an empty input.
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |bounds, p| bounds.including(p)))
    }

    fn including(self, p: &Point3<f64>) -> Self {
        Self {
            min: self.min.inf(p),
            max: self.max.sup(p),
        }
    }

    pub fn contains(&self, p: &Point3<f64>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> (f64, f64, f64) {
        let extent = self.max - self.min;
        (extent.x, extent.y, extent.z)
    }
}
