/// Rotation matrices and the transform algebra shared by points, collections and shapes
use nalgebra::{Matrix3, Point3};
use rand::Rng;

/// Rotation matrix builders.
///
/// Angles follow the wire convention: rotating about X maps
/// `y' = y·cos + z·sin`, `z' = z·cos − y·sin`, and likewise for the other axes.
pub struct Transform;

impl Transform {
    /// Rotation about the x-axis.
    pub fn rotation_x(angle: f64) -> Matrix3<f64> {
        let (s, c) = angle.sin_cos();
        Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, c, s, //
            0.0, -s, c,
        )
    }

    /// Rotation about the y-axis.
    pub fn rotation_y(angle: f64) -> Matrix3<f64> {
        let (s, c) = angle.sin_cos();
        Matrix3::new(
            c, 0.0, s, //
            0.0, 1.0, 0.0, //
            -s, 0.0, c,
        )
    }

    /// Rotation about the z-axis.
    pub fn rotation_z(angle: f64) -> Matrix3<f64> {
        let (s, c) = angle.sin_cos();
        Matrix3::new(
            c, -s, 0.0, //
            s, c, 0.0, //
            0.0, 0.0, 1.0,
        )
    }

    /// Combined rotation: X first, then Y, then Z.
    pub fn rotation_matrix(rx: f64, ry: f64, rz: f64) -> Matrix3<f64> {
        let mx = Self::rotation_x(rx);
        let my = Self::rotation_y(ry);
        let mz = Self::rotation_z(rz);

        // Apply rotations in order: X, Y, Z
        mz * my * mx
    }
}

/// Uniform draw in `[-amount, amount)`. Zero or negative amounts are allowed.
fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f64) -> f64 {
    amount * (rng.gen::<f64>() * 2.0 - 1.0)
}

/// In-place and copy-returning affine transforms.
///
/// Implementors only provide [`Transformable::map_positions`]; every other
/// method is built on it. The `...ed` variants clone first, so for a
/// [`Shape`](crate::Shape) they return an independent deep copy.
pub trait Transformable {
    /// Apply `f` to every position owned (or shared) by this value.
    fn map_positions<F: FnMut(&mut Point3<f64>)>(&mut self, f: F);

    fn translate_x(&mut self, tx: f64) {
        self.map_positions(|p| p.x += tx);
    }

    fn translate_y(&mut self, ty: f64) {
        self.map_positions(|p| p.y += ty);
    }

    fn translate_z(&mut self, tz: f64) {
        self.map_positions(|p| p.z += tz);
    }

    fn translate(&mut self, tx: f64, ty: f64, tz: f64) {
        self.map_positions(|p| {
            p.x += tx;
            p.y += ty;
            p.z += tz;
        });
    }

    fn rotate_x(&mut self, angle: f64) {
        let m = Transform::rotation_x(angle);
        self.map_positions(|p| *p = m * *p);
    }

    fn rotate_y(&mut self, angle: f64) {
        let m = Transform::rotation_y(angle);
        self.map_positions(|p| *p = m * *p);
    }

    fn rotate_z(&mut self, angle: f64) {
        let m = Transform::rotation_z(angle);
        self.map_positions(|p| *p = m * *p);
    }

    /// Rotate about X, then Y, then Z. The order is part of the contract.
    fn rotate(&mut self, rx: f64, ry: f64, rz: f64) {
        let m = Transform::rotation_matrix(rx, ry, rz);
        self.map_positions(|p| *p = m * *p);
    }

    fn scale_x(&mut self, sx: f64) {
        self.map_positions(|p| p.x *= sx);
    }

    fn scale_y(&mut self, sy: f64) {
        self.map_positions(|p| p.y *= sy);
    }

    fn scale_z(&mut self, sz: f64) {
        self.map_positions(|p| p.z *= sz);
    }

    fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.map_positions(|p| {
            p.x *= sx;
            p.y *= sy;
            p.z *= sz;
        });
    }

    fn uni_scale(&mut self, scale: f64) {
        self.map_positions(|p| p.coords *= scale);
    }

    fn randomize_x<R: Rng + ?Sized>(&mut self, rng: &mut R, amount: f64) {
        self.map_positions(|p| p.x += jitter(rng, amount));
    }

    fn randomize_y<R: Rng + ?Sized>(&mut self, rng: &mut R, amount: f64) {
        self.map_positions(|p| p.y += jitter(rng, amount));
    }

    fn randomize_z<R: Rng + ?Sized>(&mut self, rng: &mut R, amount: f64) {
        self.map_positions(|p| p.z += jitter(rng, amount));
    }

    /// Offset every coordinate of every point by an independent draw in `[-amount, amount)`.
    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, amount: f64) {
        self.map_positions(|p| {
            p.x += jitter(rng, amount);
            p.y += jitter(rng, amount);
            p.z += jitter(rng, amount);
        });
    }

    fn translated_x(&self, tx: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.translate_x(tx);
        copy
    }

    fn translated_y(&self, ty: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.translate_y(ty);
        copy
    }

    fn translated_z(&self, tz: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.translate_z(tz);
        copy
    }

    fn translated(&self, tx: f64, ty: f64, tz: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.translate(tx, ty, tz);
        copy
    }

    fn rotated_x(&self, angle: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.rotate_x(angle);
        copy
    }

    fn rotated_y(&self, angle: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.rotate_y(angle);
        copy
    }

    fn rotated_z(&self, angle: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.rotate_z(angle);
        copy
    }

    fn rotated(&self, rx: f64, ry: f64, rz: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.rotate(rx, ry, rz);
        copy
    }

    fn scaled_x(&self, sx: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.scale_x(sx);
        copy
    }

    fn scaled_y(&self, sy: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.scale_y(sy);
        copy
    }

    fn scaled_z(&self, sz: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.scale_z(sz);
        copy
    }

    fn scaled(&self, sx: f64, sy: f64, sz: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.scale(sx, sy, sz);
        copy
    }

    fn uni_scaled(&self, scale: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.uni_scale(scale);
        copy
    }

    fn randomized_x<R: Rng + ?Sized>(&self, rng: &mut R, amount: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.randomize_x(rng, amount);
        copy
    }

    fn randomized_y<R: Rng + ?Sized>(&self, rng: &mut R, amount: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.randomize_y(rng, amount);
        copy
    }

    fn randomized_z<R: Rng + ?Sized>(&self, rng: &mut R, amount: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.randomize_z(rng, amount);
        copy
    }

    fn randomized<R: Rng + ?Sized>(&self, rng: &mut R, amount: f64) -> Self
    where
        Self: Clone,
    {
        let mut copy = self.clone();
        copy.randomize(rng, amount);
        copy
    }
}
