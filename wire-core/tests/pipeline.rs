use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

use approx::assert_relative_eq;
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wire_core::{
    parse_shape, primitives, write_shape, Camera, Color, DrawCommand, DrawingSurface, Fog, Point,
    Recorder, Scene, Shape, Transformable, WaterLevel,
};

fn close_camera() -> Camera {
    Camera::new(0.0, 0.0, 10.0)
        .with_focal_length(100.0)
        .with_clip(1.0, 1000.0)
}

#[test]
fn test_scaled_box_projects_corner() {
    let mut shape = primitives::cuboid(2.0, 2.0, 2.0);
    shape.scale(2.0, 1.0, 1.0);
    let scene = Scene::new(close_camera());
    let mut surface = Recorder::new();
    shape.stroke(&scene, &mut surface, 1.0);

    assert_eq!(surface.lines().len(), 12);
    let corner = shape
        .points()
        .iter()
        .find(|p| p.borrow().position == Point3::new(2.0, 1.0, 1.0))
        .expect("corner (2, 1, 1) present")
        .borrow()
        .projection;
    assert_relative_eq!(corner.scale, 100.0 / 11.0, epsilon = 1e-12);
    assert_relative_eq!(corner.x, 18.1818, epsilon = 1e-4);
    assert_relative_eq!(corner.y, 9.0909, epsilon = 1e-4);
}

#[test]
fn test_near_clip_boundary() {
    let camera = Camera::new(0.0, 0.0, 50.0).with_clip(100.0, 1000.0);
    assert!(Point::new(0.0, 0.0, 50.0).is_visible(&camera));
    assert!(!Point::new(0.0, 0.0, 49.0).is_visible(&camera));
    assert!(Point::new(0.0, 0.0, 950.0).is_visible(&camera));
    assert!(!Point::new(0.0, 0.0, 951.0).is_visible(&camera));
}

#[test]
fn test_zero_depth_propagates_non_finite() {
    let camera = Camera::new(0.0, 0.0, 10.0).with_clip(-100.0, 100.0);
    let mut p = Point::new(1.0, 1.0, -10.0);
    let projection = p.project(&camera);
    assert!(!projection.is_finite());
    assert!(!p.is_visible(&camera));
}

#[test]
fn test_identity_transforms() {
    let mut rng = StdRng::seed_from_u64(11);
    let original = primitives::random_inner_box(&mut rng, 4.0, 4.0, 4.0, 25);
    let moved = original
        .translated(0.0, 0.0, 0.0)
        .rotated(0.0, 0.0, 0.0)
        .scaled(1.0, 1.0, 1.0);
    assert_eq!(original.points().positions(), moved.points().positions());
}

#[test]
fn test_rotation_composes() {
    let p = Point::new(1.0, -2.0, 3.0);
    let twice = p.rotated_x(0.4).rotated_x(0.9);
    let once = p.rotated_x(1.3);
    assert_relative_eq!(twice.position, once.position, epsilon = 1e-12);
}

#[test]
fn test_clone_then_stroke_uses_clone_points() {
    // stand the circle up so every point sits at depth 10
    let original = primitives::circle(1.0, 8).rotated_x(FRAC_PI_2);
    let copy = original.clone().translated_x(5.0);
    let scene = Scene::new(close_camera());

    let mut a = Recorder::new();
    let mut b = Recorder::new();
    original.stroke(&scene, &mut a, 1.0);
    copy.stroke(&scene, &mut b, 1.0);

    for (la, lb) in a.lines().iter().zip(b.lines()) {
        assert_relative_eq!(lb.from.0 - la.from.0, 50.0, epsilon = 1e-9);
    }
}

#[test]
fn test_merge_aliases_until_cloned() {
    let mut scene_shape = Shape::new();
    let mut part = primitives::cuboid(1.0, 1.0, 1.0);
    scene_shape.add_shape(&part);
    let snapshot = scene_shape.clone();

    part.translate_y(3.0);
    assert_eq!(scene_shape.points()[0].borrow().y(), -0.5 + 3.0);
    assert_eq!(snapshot.points()[0].borrow().y(), -0.5);
    assert!(Rc::ptr_eq(&scene_shape.points()[7], &part.points()[7]));
}

#[test]
fn test_save_load_round_trip() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut shape = primitives::sphere(20.0, 5, 7);
    shape.randomize(&mut rng, 0.5);
    shape.subdivide(3.0);

    let mut out = Vec::new();
    write_shape(&shape, &mut out).unwrap();
    let loaded = parse_shape(std::str::from_utf8(&out).unwrap()).unwrap();

    assert_eq!(loaded.segments(), shape.segments());
    for (a, b) in shape.points().positions().iter().zip(loaded.points().positions()) {
        assert_relative_eq!(*a, b, epsilon = 1e-6);
    }
}

#[test]
fn test_cull_scenario() {
    let xs = [-4.0, 1.0, -2.0, 3.0, -1.5, 0.0, 5.0, -3.0, 7.0, -0.5];
    let mut shape = Shape::new();
    for &x in &xs {
        shape.add_xyz(x, 0.0, 0.0);
    }
    for i in 0..xs.len() {
        shape.add_segment_by_index(i, (i + 3) % xs.len());
    }

    let culled = shape.culled(|p| p.x() > 0.0);
    let kept: Vec<f64> = culled.points().iter().map(|p| p.borrow().x()).collect();
    assert_eq!(kept, vec![1.0, 3.0, 5.0, 7.0]);
    for segment in culled.segments() {
        let (a, b) = segment.endpoints(culled.points()).unwrap();
        assert!(a.x() > 0.0 && b.x() > 0.0);
    }
    // 3 -> 5 and 7 -> 1 survive; everything else touched a point at or below zero
    assert_eq!(culled.segment_count(), 2);
}

#[test]
fn test_fog_and_water_shade_strokes() {
    let mut shape = Shape::new();
    // near and shallow, far, deep
    shape.add_xyz(0.0, -1.0, 0.0);
    shape.add_xyz(1.0, -1.0, 0.0);
    shape.add_xyz(0.0, -1.0, 100.0);
    shape.add_xyz(1.0, -1.0, 100.0);
    shape.add_xyz(0.0, 50.0, 0.0);
    shape.add_xyz(1.0, 50.0, 0.0);
    for i in 0..3 {
        shape.add_segment_by_index(2 * i, 2 * i + 1);
    }

    let scene = Scene::new(close_camera())
        .with_fog(Fog::new(10.0, 210.0))
        .with_water(WaterLevel::new(0.0, 100.0))
        .with_color(Color::rgb(0.0, 1.0, 0.0));
    let mut surface = Recorder::new();
    surface.set_source_color(Color::BLACK);
    shape.stroke(&scene, &mut surface, 2.0);

    let alphas: Vec<f64> = surface.lines().iter().map(|l| l.color.a).collect();
    assert_relative_eq!(alphas[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(alphas[1], 0.5, epsilon = 1e-12);
    assert_relative_eq!(alphas[2], 0.5, epsilon = 1e-12);
    assert_eq!(surface.color(), Color::BLACK);
    assert_eq!(
        surface.commands.iter().filter(|c| **c == DrawCommand::Save).count(),
        surface.commands.iter().filter(|c| **c == DrawCommand::Restore).count()
    );
}
