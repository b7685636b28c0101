/// Ready-made shapes built through the public Shape API
use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::point::Point;
use crate::shape::Shape;
use crate::transform::Transformable;

/// Box centered on the origin: 8 corners and 12 edges.
pub fn cuboid(w: f64, h: f64, d: f64) -> Shape {
    let mut shape = Shape::new();

    // back face (z = -1), then front face (z = 1)
    for z in [-1.0, 1.0] {
        shape.add_xyz(-1.0, -1.0, z);
        shape.add_xyz(-1.0, 1.0, z);
        shape.add_xyz(1.0, 1.0, z);
        shape.add_xyz(1.0, -1.0, z);
    }

    for face in [0, 4] {
        for i in 0..4 {
            shape.add_segment_by_index(face + i, face + (i + 1) % 4);
        }
    }
    for i in 0..4 {
        shape.add_segment_by_index(i, i + 4);
    }

    shape.scale(w / 2.0, h / 2.0, d / 2.0);
    shape
}

/// Append a closed ring of `res` points on the y = 0 plane. Returns the index of its first point.
fn add_ring(shape: &mut Shape, radius: f64, res: usize, connect: bool) -> usize {
    let start = shape.point_count();
    for i in 0..res {
        let t = TAU * i as f64 / res as f64;
        shape.add_xyz(t.cos() * radius, 0.0, t.sin() * radius);
    }
    if connect {
        for i in 0..res {
            shape.add_segment_by_index(start + i, start + (i + 1) % res);
        }
    }
    start
}

/// Closed circle of `res` points on the y = 0 plane.
pub fn circle(radius: f64, res: usize) -> Shape {
    let mut shape = Shape::new();
    add_ring(&mut shape, radius, res, true);
    shape
}

/// Flat grid on the y = 0 plane with `rows` cells along x and `cols` along z.
pub fn grid_plane(w: f64, d: f64, rows: usize, cols: usize) -> Shape {
    let mut shape = Shape::new();
    if rows == 0 || cols == 0 {
        return shape;
    }

    let index = |x: usize, z: usize| x * (cols + 1) + z;
    for x in 0..=rows {
        for z in 0..=cols {
            shape.add_xyz(x as f64, 0.0, z as f64);
        }
    }
    for x in 0..=rows {
        for z in 0..=cols {
            if x < rows {
                shape.add_segment_by_index(index(x, z), index(x + 1, z));
            }
            if z < cols {
                shape.add_segment_by_index(index(x, z), index(x, z + 1));
            }
        }
    }

    shape.scale(w / rows as f64, 1.0, d / cols as f64);
    shape.translate(-w / 2.0, 0.0, -d / 2.0);
    shape
}

/// UV sphere: `long + 1` rings of `lat` points from pole to pole, joined
/// around each ring and between neighbouring rings.
pub fn sphere(radius: f64, long: usize, lat: usize) -> Shape {
    let mut shape = Shape::new();
    if long == 0 || lat == 0 {
        return shape;
    }

    for i in 0..=long {
        let a = i as f64 / long as f64 * PI;
        let start = add_ring(&mut shape, a.sin(), lat, true);
        for j in 0..lat {
            shape.points()[start + j].borrow_mut().translate_y(a.cos());
        }
    }
    for i in 0..long {
        for j in 0..lat {
            shape.add_segment_by_index(i * lat + j, (i + 1) * lat + j);
        }
    }

    shape.uni_scale(radius);
    shape
}

/// Torus around the y-axis made of `slices` tube rings of `res` points.
///
/// `arc` limits the sweep; a full `TAU` sweep also joins the last ring to the first.
pub fn torus(radius1: f64, radius2: f64, arc: f64, slices: usize, res: usize) -> Shape {
    let mut shape = Shape::new();
    if slices == 0 || res == 0 {
        return shape;
    }

    for i in 0..slices {
        let mut ring = circle(radius2, res);
        ring.rotate_x(PI / 2.0);
        ring.translate_x(radius1);
        ring.rotate_y(i as f64 / slices as f64 * arc);
        shape.add_shape(&ring);
    }
    for i in 0..slices - 1 {
        for j in 0..res {
            shape.add_segment_by_index(i * res + j, (i + 1) * res + j);
        }
    }
    if arc >= TAU {
        let last = slices - 1;
        for j in 0..res {
            shape.add_segment_by_index(last * res + j, j);
        }
    }
    shape
}

/// `count` unconnected points on the surface of a sphere.
pub fn random_surface_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f64, count: usize) -> Shape {
    let mut shape = Shape::new();
    for _ in 0..count {
        shape.add_point(Point::random_on_sphere(rng, radius));
    }
    shape
}

/// `count` unconnected points inside a box centered on the origin.
pub fn random_inner_box<R: Rng + ?Sized>(rng: &mut R, w: f64, h: f64, d: f64, count: usize) -> Shape {
    let mut shape = Shape::new();
    for _ in 0..count {
        shape.add_point(Point::random_in_box(rng, w, h, d));
    }
    shape
}
