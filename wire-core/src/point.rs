/// 3D points with a cached screen projection and random point distributions
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use nalgebra::{Point3, Vector3};
use rand::Rng;

use crate::projection::{Camera, Projection};
use crate::transform::Transformable;

/// A point shared between collections.
///
/// Collections hold points through this handle so that
/// [`Shape::add_shape`](crate::Shape::add_shape) can alias points between
/// shapes. Identity is pointer identity ([`Rc::ptr_eq`]), never coordinate
/// equality.
pub type SharedPoint = Rc<RefCell<Point>>;

/// A 3D point and the result of its last projection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    pub position: Point3<f64>,
    /// Valid only after [`Point::project`].
    pub projection: Projection,
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.gen::<f64>()
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from(Point3::new(x, y, z))
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// Wrap this point in a fresh [`SharedPoint`] handle.
    pub fn shared(self) -> SharedPoint {
        Rc::new(RefCell::new(self))
    }

    /// Point at `t` along the line from `a` to `b`.
    pub fn lerp(t: f64, a: &Point, b: &Point) -> Point {
        Point::from(a.position.coords.lerp(&b.position.coords, t))
    }

    /// Compute and cache the screen projection.
    pub fn project(&mut self, camera: &Camera) -> Projection {
        self.projection = camera.project(&self.position);
        self.projection
    }

    pub fn is_visible(&self, camera: &Camera) -> bool {
        camera.is_visible(&self.position)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Distance from the origin.
    pub fn magnitude(&self) -> f64 {
        self.position.coords.norm()
    }

    /// Scale to unit length.
    ///
    /// Normalizing the origin divides by zero and leaves NaN coordinates; use
    /// [`Point::try_normalize`] where that can happen.
    pub fn normalize(&mut self) {
        let magnitude = self.magnitude();
        self.position.coords /= magnitude;
    }

    /// Scale to unit length unless the magnitude is at most `min_magnitude`.
    /// Returns the previous magnitude on success and leaves the point alone otherwise.
    pub fn try_normalize(&mut self, min_magnitude: f64) -> Option<f64> {
        self.position.coords.try_normalize_mut(min_magnitude)
    }

    /// Random point in a `w` x `h` x `d` box centered on the origin.
    pub fn random_in_box<R: Rng + ?Sized>(rng: &mut R, w: f64, h: f64, d: f64) -> Self {
        Self::new(
            uniform(rng, -w / 2.0, w / 2.0),
            uniform(rng, -h / 2.0, h / 2.0),
            uniform(rng, -d / 2.0, d / 2.0),
        )
    }

    /// Random point on the surface of a `w` x `h` x `d` box centered on the origin.
    ///
    /// A face is picked with probability proportional to its area, then the
    /// point is uniform within that face.
    pub fn random_on_box<R: Rng + ?Sized>(rng: &mut R, w: f64, h: f64, d: f64) -> Self {
        let mut p = Self::random_in_box(rng, w, h, d);
        let areas = [h * d, w * d, w * h];
        let total: f64 = areas.iter().sum();
        if total <= 0.0 {
            return p;
        }

        let mut pick = uniform(rng, 0.0, total);
        let mut axis = 2;
        for (i, area) in areas.iter().enumerate() {
            if pick < *area {
                axis = i;
                break;
            }
            pick -= area;
        }
        let half = [w, h, d][axis] / 2.0;
        p.position[axis] = if rng.gen::<bool>() { half } else { -half };
        p
    }

    /// Random point on the surface of a sphere.
    ///
    /// Uniform `u` in [-1, 1] and `θ` in [0, 2π) give `(√(1-u²)cosθ, √(1-u²)sinθ, u)`,
    /// which is uniform over the surface area.
    pub fn random_on_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f64) -> Self {
        Self::from(random_unit_vector(rng) * radius)
    }

    /// Random point inside a sphere. The radius is scaled by the cube root
    /// of a uniform draw so points are uniform in volume.
    pub fn random_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f64) -> Self {
        let direction = random_unit_vector(rng);
        let r = rng.gen::<f64>().cbrt() * radius;
        Self::from(direction * r)
    }

    /// Random point in a disc on the y = 0 plane.
    pub fn random_in_circle<R: Rng + ?Sized>(rng: &mut R, radius: f64) -> Self {
        let r = rng.gen::<f64>().sqrt() * radius;
        let a = uniform(rng, 0.0, TAU);
        Self::new(a.cos() * r, 0.0, a.sin() * r)
    }

    /// Random point in a `w` x `d` rectangle on the y = 0 plane.
    pub fn random_in_rectangle<R: Rng + ?Sized>(rng: &mut R, w: f64, d: f64) -> Self {
        Self::new(uniform(rng, -w / 2.0, w / 2.0), 0.0, uniform(rng, -d / 2.0, d / 2.0))
    }

    /// Random point on the side of a y-aligned cylinder (no caps).
    pub fn random_on_cylinder<R: Rng + ?Sized>(rng: &mut R, height: f64, radius: f64) -> Self {
        let angle = uniform(rng, 0.0, TAU);
        let y = uniform(rng, -height / 2.0, height / 2.0);
        Self::new(angle.cos() * radius, y, angle.sin() * radius)
    }

    /// Random point inside a y-aligned cylinder.
    pub fn random_in_cylinder<R: Rng + ?Sized>(rng: &mut R, height: f64, radius: f64) -> Self {
        let r = rng.gen::<f64>().sqrt() * radius;
        Self::random_on_cylinder(rng, height, r)
    }

    /// Random point on a torus around the y-axis.
    ///
    /// `radius1` runs from the torus center to the center of the tube and
    /// `radius2` is the tube radius. `arc` limits the angle around the tube,
    /// starting from the outer equator (use `TAU` for a closed tube); the
    /// sweep around the y-axis is always a full turn.
    pub fn random_on_torus<R: Rng + ?Sized>(
        rng: &mut R,
        radius1: f64,
        radius2: f64,
        arc: f64,
    ) -> Self {
        let tube = uniform(rng, 0.0, arc);
        let mut p = Self::new(tube.cos() * radius2 + radius1, tube.sin() * radius2, 0.0);
        p.rotate_y(uniform(rng, 0.0, TAU));
        p
    }

    /// Random point inside a torus; the tube radius is scaled by `sqrt` of a
    /// uniform draw so the tube cross-section is filled evenly.
    pub fn random_in_torus<R: Rng + ?Sized>(
        rng: &mut R,
        radius1: f64,
        radius2: f64,
        arc: f64,
    ) -> Self {
        let r = rng.gen::<f64>().sqrt() * radius2;
        Self::random_on_torus(rng, radius1, r, arc)
    }
}

fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f64> {
    let u = uniform(rng, -1.0, 1.0);
    let theta = uniform(rng, 0.0, TAU);
    let ring = (1.0 - u * u).sqrt();
    Vector3::new(ring * theta.cos(), ring * theta.sin(), u)
}

impl From<Point3<f64>> for Point {
    fn from(position: Point3<f64>) -> Self {
        Self {
            position,
            projection: Projection::default(),
        }
    }
}

impl From<Vector3<f64>> for Point {
    fn from(coords: Vector3<f64>) -> Self {
        Self::from(Point3::from(coords))
    }
}

impl Transformable for Point {
    fn map_positions<F: FnMut(&mut Point3<f64>)>(&mut self, mut f: F) {
        f(&mut self.position);
    }
}
