/// Ordered point storage with bulk transforms
use std::ops::Index;
use std::rc::Rc;

use nalgebra::Point3;
use tracing::debug;

use crate::error::{WireError, WireResult};
use crate::geometry::{Axis, Bounds};
use crate::noise::simplex3;
use crate::point::{Point, SharedPoint};
use crate::projection::Camera;
use crate::transform::Transformable;

/// An ordered list of points.
///
/// Insertion order is iteration and render order. `clone()` is deep: the
/// copy gets fresh points. Sharing a point between collections only happens
/// through [`PointCollection::push_shared`].
#[derive(Debug, Default)]
pub struct PointCollection {
    points: Vec<SharedPoint>,
}

impl PointCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SharedPoint> {
        self.points.iter()
    }

    /// Add an owned point and return its handle.
    pub fn push(&mut self, point: Point) -> SharedPoint {
        let shared = point.shared();
        self.points.push(Rc::clone(&shared));
        shared
    }

    pub fn push_xyz(&mut self, x: f64, y: f64, z: f64) -> SharedPoint {
        self.push(Point::new(x, y, z))
    }

    /// Add an existing handle. The point is now aliased by both owners.
    pub fn push_shared(&mut self, point: SharedPoint) {
        self.points.push(point);
    }

    /// Point at `index`; negative indices count back from the end.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range in either direction.
    pub fn get(&self, index: isize) -> &SharedPoint {
        let len = self.len();
        let resolved = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            Some(index as usize)
        };
        match resolved {
            Some(i) if i < len => &self.points[i],
            _ => panic!("point index {index} out of bounds for collection with {len} points"),
        }
    }

    pub fn try_get(&self, index: usize) -> WireResult<&SharedPoint> {
        self.points.get(index).ok_or(WireError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn first(&self) -> Option<&SharedPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SharedPoint> {
        self.points.last()
    }

    /// Index of this exact point (by identity, not by value).
    pub fn position_of(&self, point: &SharedPoint) -> Option<usize> {
        self.points.iter().position(|p| Rc::ptr_eq(p, point))
    }

    /// Snapshot of every position, in order.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.points.iter().map(|p| p.borrow().position).collect()
    }

    /// Project every point against `camera`, refreshing each cache.
    pub fn project(&self, camera: &Camera) {
        for point in &self.points {
            point.borrow_mut().project(camera);
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_positions(&self.positions())
    }

    /// Keep only points satisfying `keep`, preserving order.
    pub fn cull<F: FnMut(&Point) -> bool>(&mut self, mut keep: F) {
        self.points.retain(|p| keep(&p.borrow()));
    }

    /// Deep copy holding only the points that satisfy `keep`.
    pub fn culled<F: FnMut(&Point) -> bool>(&self, keep: F) -> Self {
        let mut copy = self.clone();
        copy.cull(keep);
        copy
    }

    /// Keep only points inside `bounds`.
    pub fn cull_box(&mut self, bounds: &Bounds) {
        self.cull(|p| bounds.contains(&p.position));
    }

    /// Drop points whose mask entry is false. Returns the old-to-new index map.
    pub(crate) fn retain_mask(&mut self, keep: &[bool]) -> Vec<Option<usize>> {
        let mut remap = Vec::with_capacity(self.points.len());
        let mut next = 0;
        let mut index = 0;
        self.points.retain(|_| {
            let kept = keep[index];
            index += 1;
            if kept {
                remap.push(Some(next));
                next += 1;
            } else {
                remap.push(None);
            }
            kept
        });
        remap
    }

    /// Stable sort by one coordinate.
    pub fn sort_by_axis(&mut self, axis: Axis, ascending: bool) {
        self.points.sort_by(|a, b| {
            let (a, b) = (axis.of(&a.borrow().position), axis.of(&b.borrow().position));
            let order = a.total_cmp(&b);
            if ascending {
                order
            } else {
                order.reverse()
            }
        });
    }

    /// Push every point closer than `radius` to `center` out onto the sphere
    /// of that radius, keeping its direction from `center`.
    ///
    /// A point exactly at `center` has no direction and is left where it is.
    pub fn repel(&mut self, center: &Point3<f64>, radius: f64) {
        let mut skipped = 0;
        self.map_positions(|p| {
            let offset = *p - center;
            let distance = offset.norm();
            if distance >= radius {
                return;
            }
            if distance == 0.0 {
                skipped += 1;
                return;
            }
            *p = center + offset * (radius / distance);
        });
        if skipped > 0 {
            debug!(skipped, "repel left coincident points in place");
        }
    }

    /// Scale each point away from (or toward) the world origin by
    /// `1 + offset * noise`, where the noise is sampled at
    /// `origin + position * scale`. `origin` moves the sample window through
    /// noise space.
    pub fn noisify(&mut self, origin: &Point3<f64>, scale: f64, offset: f64) {
        self.map_positions(|p| {
            let n = simplex3(
                origin.x + p.x * scale,
                origin.y + p.y * scale,
                origin.z + p.z * scale,
            );
            p.coords *= 1.0 + n * offset;
        });
    }

    /// Normalize every point. The origin becomes NaN, as with [`Point::normalize`].
    pub fn normalize(&mut self) {
        for point in &self.points {
            point.borrow_mut().normalize();
        }
    }

    /// Pointwise interpolation toward `other`.
    ///
    /// # Panics
    ///
    /// Panics if the collections differ in length.
    pub fn lerp(&self, other: &PointCollection, t: f64) -> PointCollection {
        match self.try_lerp(other, t) {
            Ok(collection) => collection,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_lerp(&self, other: &PointCollection, t: f64) -> WireResult<PointCollection> {
        if self.len() != other.len() {
            return Err(WireError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        let mut result = Self::with_capacity(self.len());
        for (a, b) in self.points.iter().zip(&other.points) {
            result.push(Point::lerp(t, &a.borrow(), &b.borrow()));
        }
        Ok(result)
    }
}

impl Clone for PointCollection {
    fn clone(&self) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| p.borrow().clone().shared())
                .collect(),
        }
    }
}

impl Index<usize> for PointCollection {
    type Output = SharedPoint;

    fn index(&self, index: usize) -> &SharedPoint {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a PointCollection {
    type Item = &'a SharedPoint;
    type IntoIter = std::slice::Iter<'a, SharedPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<Point> for PointCollection {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().map(Point::shared).collect(),
        }
    }
}

impl Transformable for PointCollection {
    fn map_positions<F: FnMut(&mut Point3<f64>)>(&mut self, mut f: F) {
        for point in &self.points {
            f(&mut point.borrow_mut().position);
        }
    }
}
