/// Edges between two points of a collection
use std::cell::Ref;

use crate::collection::PointCollection;
use crate::error::{WireError, WireResult};
use crate::point::Point;
use crate::scene::Scene;
use crate::surface::DrawingSurface;

/// A visible edge, stored as two indices into a [`PointCollection`].
///
/// A segment never owns its endpoints. Resolving it against a collection
/// that is too short is reported as [`WireError::DanglingSegment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub a: usize,
    pub b: usize,
}

impl Segment {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Rewrite both indices through an old-to-new map; `None` if either endpoint was removed.
    pub(crate) fn remapped(&self, remap: &[Option<usize>]) -> Option<Segment> {
        Some(Segment::new(remap[self.a]?, remap[self.b]?))
    }

    pub fn endpoints<'a>(&self, points: &'a PointCollection) -> WireResult<(Ref<'a, Point>, Ref<'a, Point>)> {
        let len = points.len();
        if self.a >= len || self.b >= len {
            return Err(WireError::DanglingSegment {
                a: self.a,
                b: self.b,
                len,
            });
        }
        Ok((points[self.a].borrow(), points[self.b].borrow()))
    }

    pub fn length(&self, points: &PointCollection) -> WireResult<f64> {
        let (a, b) = self.endpoints(points)?;
        Ok(a.distance(&b))
    }

    /// Draw this segment using the endpoints' cached projections.
    ///
    /// The endpoints must have been projected with `scene.camera` first.
    pub fn stroke<S: DrawingSurface + ?Sized>(
        &self,
        points: &PointCollection,
        scene: &Scene,
        surface: &mut S,
    ) -> WireResult<()> {
        let (a, b) = self.endpoints(points)?;
        stroke_between(&a, &b, scene, surface);
        Ok(())
    }
}

/// Stroke a line between two projected points.
///
/// Skipped unless both ends are visible. With `scale_line_width` the width is
/// the surface's current width times the mean projection scale. Alpha is
/// shaded from the segment midpoint. Width and color are restored afterwards.
pub(crate) fn stroke_between<S: DrawingSurface + ?Sized>(
    a: &Point,
    b: &Point,
    scene: &Scene,
    surface: &mut S,
) {
    if !(a.is_visible(&scene.camera) && b.is_visible(&scene.camera)) {
        return;
    }

    let base_width = surface.line_width();
    let width = if scene.scale_line_width {
        base_width * (a.projection.scale + b.projection.scale) / 2.0
    } else {
        base_width
    };
    let midpoint = nalgebra::center(&a.position, &b.position);

    surface.save();
    surface.set_source_color(scene.shaded_color(&midpoint));
    surface.set_line_width(width);
    surface.move_to(a.projection.x, a.projection.y);
    surface.line_to(b.projection.x, b.projection.y);
    surface.stroke();
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Camera;
    use crate::scene::Fog;
    use crate::surface::{Color, Recorder};
    use approx::assert_relative_eq;

    fn scene() -> Scene {
        Scene::new(Camera::new(0.0, 0.0, 10.0).with_focal_length(100.0).with_clip(1.0, 1000.0))
    }

    fn projected(coords: &[(f64, f64, f64)], scene: &Scene) -> PointCollection {
        let points: PointCollection = coords.iter().map(|&(x, y, z)| Point::new(x, y, z)).collect();
        points.project(&scene.camera);
        points
    }

    #[test]
    fn test_stroke_draws_between_projections() {
        let scene = scene();
        let points = projected(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)], &scene);
        let mut surface = Recorder::new();
        Segment::new(0, 1).stroke(&points, &scene, &mut surface).unwrap();

        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].from, (0.0, 0.0));
        assert_relative_eq!(lines[0].to.0, 10.0, epsilon = 1e-12);
        assert_eq!(lines[0].width, 1.0);
        assert_eq!(lines[0].color, Color::WHITE);
    }

    #[test]
    fn test_scaled_width_is_mean_projection_scale() {
        let scene = scene().with_scaled_line_width(true);
        // depths 10 and 40: scales 10 and 2.5
        let points = projected(&[(0.0, 0.0, 0.0), (0.0, 1.0, 30.0)], &scene);
        let mut surface = Recorder::new();
        surface.set_line_width(2.0);
        Segment::new(0, 1).stroke(&points, &scene, &mut surface).unwrap();

        assert_relative_eq!(surface.lines()[0].width, 2.0 * 6.25, epsilon = 1e-12);
        assert_eq!(surface.line_width(), 2.0);
        assert_eq!(surface.saved_states(), 0);
    }

    #[test]
    fn test_fog_fades_midpoint() {
        let scene = scene().with_fog(Fog::new(10.0, 30.0));
        // midpoint depth 20: halfway through the fog
        let points = projected(&[(0.0, 0.0, 0.0), (0.0, 0.0, 20.0)], &scene);
        let mut surface = Recorder::new();
        Segment::new(0, 1).stroke(&points, &scene, &mut surface).unwrap();

        assert_relative_eq!(surface.lines()[0].color.a, 0.5, epsilon = 1e-12);
        assert_eq!(surface.color(), Color::WHITE);
    }

    #[test]
    fn test_invisible_endpoint_skips_segment() {
        let scene = scene();
        // second point sits behind the near clip
        let points = projected(&[(0.0, 0.0, 0.0), (1.0, 1.0, -9.5)], &scene);
        let mut surface = Recorder::new();
        Segment::new(0, 1).stroke(&points, &scene, &mut surface).unwrap();
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_dangling_segment_is_an_error() {
        let scene = scene();
        let points = projected(&[(0.0, 0.0, 0.0)], &scene);
        let mut surface = Recorder::new();
        let err = Segment::new(0, 3).stroke(&points, &scene, &mut surface).unwrap_err();
        assert!(matches!(err, WireError::DanglingSegment { a: 0, b: 3, len: 1 }));
    }

    #[test]
    fn test_length_and_remap() {
        let scene = scene();
        let points = projected(&[(0.0, 0.0, 0.0), (3.0, 4.0, 0.0)], &scene);
        assert_relative_eq!(Segment::new(0, 1).length(&points).unwrap(), 5.0, epsilon = 1e-12);

        let remap = [Some(0), None, Some(1)];
        assert_eq!(Segment::new(0, 2).remapped(&remap), Some(Segment::new(0, 1)));
        assert_eq!(Segment::new(1, 2).remapped(&remap), None);
    }
}
