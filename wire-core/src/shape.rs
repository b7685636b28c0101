/// Wireframe shapes: a point collection plus the segments drawn between its points
use std::mem;
use std::rc::Rc;

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::collection::PointCollection;
use crate::error::{WireError, WireResult};
use crate::geometry::Bounds;
use crate::point::{Point, SharedPoint};
use crate::projection::Camera;
use crate::scene::Scene;
use crate::segment::{stroke_between, Segment};
use crate::surface::DrawingSurface;
use crate::transform::Transformable;

/// Most pieces [`Shape::subdivide`] cuts a single segment into.
pub const MAX_SUBDIVISIONS: usize = 1 << 16;

/// Points plus the segments connecting them.
///
/// Every segment indexes into `points`. All mutating operations keep it
/// that way: removing a point removes every segment that touched it and
/// renumbers the rest. `clone()` copies every point, so segments of the
/// copy refer to the copy's own points.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    points: PointCollection,
    segments: Vec<Segment>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a shape from existing parts, rejecting segments that index past the points.
    pub fn from_parts(points: PointCollection, segments: Vec<Segment>) -> WireResult<Self> {
        for segment in &segments {
            segment.endpoints(&points)?;
        }
        Ok(Self { points, segments })
    }

    pub fn points(&self) -> &PointCollection {
        &self.points
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn add_point(&mut self, point: Point) -> SharedPoint {
        self.points.push(point)
    }

    pub fn add_xyz(&mut self, x: f64, y: f64, z: f64) -> SharedPoint {
        self.points.push_xyz(x, y, z)
    }

    /// Add an existing point handle, aliasing it with its other owners. Returns its index.
    pub fn add_shared_point(&mut self, point: SharedPoint) -> usize {
        self.points.push_shared(point);
        self.points.len() - 1
    }

    /// Connect two points that already belong to this shape.
    pub fn add_segment(&mut self, a: &SharedPoint, b: &SharedPoint) -> WireResult<Segment> {
        let a = self.points.position_of(a).ok_or(WireError::ForeignPoint)?;
        let b = self.points.position_of(b).ok_or(WireError::ForeignPoint)?;
        let segment = Segment::new(a, b);
        self.segments.push(segment);
        Ok(segment)
    }

    /// Connect the points at indices `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn add_segment_by_index(&mut self, a: usize, b: usize) -> Segment {
        match self.try_add_segment_by_index(a, b) {
            Ok(segment) => segment,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_add_segment_by_index(&mut self, a: usize, b: usize) -> WireResult<Segment> {
        self.points.try_get(a)?;
        self.points.try_get(b)?;
        let segment = Segment::new(a, b);
        self.segments.push(segment);
        Ok(segment)
    }

    /// Append `other`'s points and segments by reference.
    ///
    /// The merged points are the same [`SharedPoint`]s as in `other`, so any
    /// later transform on either shape moves them in both. Use `other.clone()`
    /// first when an independent copy is wanted:
    ///
    /// ```
    /// use wire_core::{Shape, Transformable};
    ///
    /// let mut a = Shape::new();
    /// let mut b = Shape::new();
    /// b.add_xyz(1.0, 0.0, 0.0);
    ///
    /// a.add_shape(&b);
    /// b.translate_x(1.0);
    /// assert_eq!(a.points()[0].borrow().x(), 2.0);
    ///
    /// a.add_shape(&b.clone());
    /// b.translate_x(1.0);
    /// assert_eq!(a.points()[1].borrow().x(), 2.0);
    /// ```
    ///
    /// Adding the same shape twice lists its points twice, and every
    /// transform then moves them twice.
    pub fn add_shape(&mut self, other: &Shape) {
        let offset = self.points.len();
        for point in &other.points {
            self.points.push_shared(Rc::clone(point));
        }
        self.segments.extend(
            other
                .segments
                .iter()
                .map(|s| Segment::new(s.a + offset, s.b + offset)),
        );
    }

    /// Remove the first segment connecting the same two indices. Returns whether one was found.
    pub fn remove_segment(&mut self, segment: &Segment) -> bool {
        match self.segments.iter().position(|s| s == segment) {
            Some(i) => {
                self.segments.remove(i);
                true
            }
            None => false,
        }
    }

    /// Drop points whose mask entry is false along with every segment touching them.
    fn retain_points(&mut self, keep: &[bool]) {
        let before = (self.points.len(), self.segments.len());
        let remap = self.points.retain_mask(keep);
        self.segments = self
            .segments
            .iter()
            .filter_map(|s| s.remapped(&remap))
            .collect();
        debug!(
            removed_points = before.0 - self.points.len(),
            removed_segments = before.1 - self.segments.len(),
            "culled shape"
        );
    }

    /// Keep only points satisfying `keep`. Segments touching a removed point go too.
    pub fn cull<F: FnMut(&Point) -> bool>(&mut self, mut keep: F) {
        let mask: Vec<bool> = self.points.iter().map(|p| keep(&p.borrow())).collect();
        self.retain_points(&mask);
    }

    pub fn culled<F: FnMut(&Point) -> bool>(&self, keep: F) -> Shape {
        let mut copy = self.clone();
        copy.cull(keep);
        copy
    }

    /// Keep only points inside `bounds`.
    pub fn cull_box(&mut self, bounds: &Bounds) {
        self.cull(|p| bounds.contains(&p.position));
    }

    pub fn culled_box(&self, bounds: &Bounds) -> Shape {
        self.culled(|p| bounds.contains(&p.position))
    }

    /// Move the points matching `pred` (and segments between two of them) into a new shape.
    ///
    /// Segments with one endpoint on each side are removed from both shapes.
    pub fn split<F: FnMut(&Point) -> bool>(&mut self, mut pred: F) -> Shape {
        let matches: Vec<bool> = self.points.iter().map(|p| pred(&p.borrow())).collect();

        let mut taken = Shape::new();
        let mut taken_index = vec![None; matches.len()];
        for (i, point) in self.points.iter().enumerate() {
            if matches[i] {
                taken_index[i] = Some(taken.points.len());
                taken.points.push_shared(Rc::clone(point));
            }
        }
        taken.segments = self
            .segments
            .iter()
            .filter_map(|s| s.remapped(&taken_index))
            .collect();

        let total = self.segments.len();
        let keep: Vec<bool> = matches.iter().map(|m| !m).collect();
        self.retain_points(&keep);

        debug!(
            moved_points = taken.points.len(),
            moved_segments = taken.segments.len(),
            dropped_segments = total - taken.segments.len() - self.segments.len(),
            "split shape"
        );
        taken
    }

    /// Break every segment longer than `max_length` into a chain of equal pieces.
    ///
    /// A segment of length `l` becomes `round(l / max_length)` pieces, one
    /// more whenever that still leaves a piece longer than `max_length`. The
    /// chain takes the original segment's place in the list; the new interior
    /// points are appended to the point list. Non-positive lengths do nothing.
    ///
    /// No segment is cut into more than [`MAX_SUBDIVISIONS`] pieces; a segment
    /// that would need more ends up with pieces longer than `max_length`.
    pub fn subdivide(&mut self, max_length: f64) {
        if max_length <= 0.0 || max_length.is_nan() {
            return;
        }

        let original = mem::take(&mut self.segments);
        let mut segments = Vec::with_capacity(original.len());
        let mut split = 0;
        let mut capped = 0;
        let added_before = self.points.len();

        for segment in original {
            let a = self.points[segment.a].borrow().clone();
            let b = self.points[segment.b].borrow().clone();
            let length = a.distance(&b);
            if length <= max_length {
                segments.push(segment);
                continue;
            }

            let ratio = length / max_length;
            let pieces = if ratio.is_finite() && ratio < MAX_SUBDIVISIONS as f64 {
                let mut pieces = (ratio.round() as usize).max(1);
                while pieces < MAX_SUBDIVISIONS && length / pieces as f64 > max_length * (1.0 + 1e-9) {
                    pieces += 1;
                }
                pieces
            } else {
                capped += 1;
                MAX_SUBDIVISIONS
            };

            let mut previous = segment.a;
            for i in 1..pieces {
                self.points.push(Point::lerp(i as f64 / pieces as f64, &a, &b));
                let next = self.points.len() - 1;
                segments.push(Segment::new(previous, next));
                previous = next;
            }
            segments.push(Segment::new(previous, segment.b));
            split += 1;
        }

        self.segments = segments;
        if capped > 0 {
            warn!(capped, max_length, "segments hit the subdivision limit");
        }
        debug!(
            split,
            added_points = self.points.len() - added_before,
            "subdivided shape"
        );
    }

    /// Keep `take` points, drop the next `skip`, and repeat over the point list.
    ///
    /// Segments touching a dropped point are removed. `take == 0` empties the
    /// shape and `skip == 0` keeps everything, as does a `take` covering the
    /// whole point list.
    pub fn thin_points(&mut self, take: usize, skip: usize) {
        if skip == 0 || take >= self.points.len() {
            return;
        }
        let period = take.saturating_add(skip);
        let mask: Vec<bool> = (0..self.points.len()).map(|i| i % period < take).collect();
        self.retain_points(&mask);
    }

    /// Refresh every point's projection cache.
    pub fn project(&self, camera: &Camera) {
        self.points.project(camera);
    }

    /// Points inside the camera's clip range.
    pub fn visible_points(&self, camera: &Camera) -> Vec<SharedPoint> {
        self.points
            .iter()
            .filter(|p| p.borrow().is_visible(camera))
            .cloned()
            .collect()
    }

    /// Project every point once, then stroke every segment in list order at `width`.
    ///
    /// The surface's line width is restored afterwards.
    pub fn stroke<S: DrawingSurface + ?Sized>(&self, scene: &Scene, surface: &mut S, width: f64) {
        self.project(&scene.camera);
        surface.save();
        surface.set_line_width(width);
        for segment in &self.segments {
            let a = self.points[segment.a].borrow();
            let b = self.points[segment.b].borrow();
            stroke_between(&a, &b, scene, surface);
        }
        surface.restore();
    }

    /// Project every point and fill a circle at each visible one.
    ///
    /// The radius is multiplied by the point's projection scale and the fill
    /// color is shaded like a segment's.
    pub fn render_points<S: DrawingSurface + ?Sized>(&self, scene: &Scene, surface: &mut S, radius: f64) {
        self.project(&scene.camera);
        for point in &self.points {
            let point = point.borrow();
            if !point.is_visible(&scene.camera) {
                continue;
            }
            surface.save();
            surface.set_source_color(scene.shaded_color(&point.position));
            surface.fill_circle(
                point.projection.x,
                point.projection.y,
                radius * point.projection.scale,
            );
            surface.restore();
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.points.bounds()
    }

    /// Translate so the bounding-box center sits at the origin.
    pub fn center(&mut self) {
        if let Some(bounds) = self.bounds() {
            let c: Point3<f64> = bounds.center();
            self.translate(-c.x, -c.y, -c.z);
        }
    }
}

impl Transformable for Shape {
    fn map_positions<F: FnMut(&mut Point3<f64>)>(&mut self, f: F) {
        self.points.map_positions(f);
    }
}
