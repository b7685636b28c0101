//! Wire Core Library - wireframe shapes and their render pipeline
//!
//! Shapes are points joined by segments. They are built from primitives,
//! point clouds or saved files, transformed in place, projected with a
//! simple pinhole camera and stroked onto any [`DrawingSurface`].
//!
//! ```
//! use wire_core::{primitives, Camera, Recorder, Scene, Transformable};
//!
//! let shape = primitives::cuboid(2.0, 2.0, 2.0).rotated(0.3, 0.4, 0.0);
//! let scene = Scene::new(Camera::new(0.0, 0.0, 10.0).with_focal_length(100.0).with_clip(1.0, 100.0));
//! let mut surface = Recorder::new();
//! shape.stroke(&scene, &mut surface, 1.0);
//! assert_eq!(surface.lines().len(), 12);
//! ```

pub mod collection;
pub mod error;
pub mod format;
pub mod geometry;
pub mod noise;
pub mod point;
pub mod primitives;
pub mod projection;
pub mod scene;
pub mod segment;
pub mod shape;
pub mod surface;
pub mod transform;
pub mod xyz;

// Re-export commonly used types
pub use collection::PointCollection;
pub use error::{WireError, WireResult};
pub use format::{load_shape, parse_shape, save_shape, write_shape};
pub use geometry::{Axis, Bounds};
pub use point::{Point, SharedPoint};
pub use projection::{Camera, Projection};
pub use scene::{Fog, Scene, WaterLevel};
pub use segment::Segment;
pub use shape::Shape;
pub use surface::{Color, DrawCommand, DrawingSurface, Recorder};
pub use transform::{Transform, Transformable};
pub use xyz::{load_xyz, parse_xyz};
