/// Point-cloud import for .xyz files
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use nom::{
    character::complete::{alpha1, alphanumeric0, space0, space1},
    combinator::{opt, recognize},
    number::complete::double,
    sequence::{pair, preceded, terminated},
    IResult,
};
use tracing::{debug, info};

use crate::error::{WireError, WireResult};
use crate::shape::Shape;
use crate::transform::Transformable;

/// Lines that may fail to parse without error: the count and the comment.
const HEADER_LINES: usize = 2;

/// Parse a point cloud into a point-only shape, centered and turned into scene orientation.
///
/// The first line is usually a point count and the second a comment; either
/// may be missing. Every other line holds an optional element label followed
/// by two or three numbers. A missing z is 0 and anything after the
/// coordinates is ignored:
///
/// ```text
/// C 0 1 2
/// Fe -0.432 0.457 10
/// 34.765 45.987 -98.123
/// ```
pub fn parse_xyz(input: &str) -> WireResult<Shape> {
    let mut shape = Shape::new();
    let mut skipped = 0;

    for (i, text) in input.lines().enumerate() {
        let line = i + 1;
        match vertex(text) {
            Ok((_, (x, y, z))) => {
                shape.add_xyz(x, y, z);
            }
            Err(_) if line <= HEADER_LINES || text.trim().is_empty() => skipped += 1,
            Err(_) => return Err(WireError::parse(line, format!("not a vertex: `{text}`"))),
        }
    }

    debug!(points = shape.point_count(), skipped, "parsed point cloud");
    shape.center();
    shape.rotate(-PI / 2.0, PI, 0.0);
    Ok(shape)
}

/// Load and parse an `.xyz` file.
pub fn load_xyz(path: impl AsRef<Path>) -> WireResult<Shape> {
    let path = path.as_ref();
    let shape = parse_xyz(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), points = shape.point_count(), "loaded point cloud");
    Ok(shape)
}

fn label(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, alphanumeric0))(input)
}

fn vertex(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, _) = space0(input)?;
    let (input, _) = opt(terminated(label, space1))(input)?;
    let (input, x) = double(input)?;
    let (input, y) = preceded(space1, double)(input)?;
    let (input, z) = opt(preceded(space1, double))(input)?;
    Ok((input, (x, y, z.unwrap_or(0.0))))
}
