/// Plain-text persistence for shapes
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use nom::{
    character::complete::{i64 as integer, space0, space1},
    combinator::all_consuming,
    number::complete::double,
    sequence::{delimited, preceded},
    IResult,
};
use tracing::{info, warn};

use crate::collection::PointCollection;
use crate::error::{WireError, WireResult};
use crate::segment::Segment;
use crate::shape::Shape;

/// Upper bound on capacity reserved from an untrusted count.
const MAX_PREALLOCATE: usize = 1 << 16;

/// Write `shape` in wire format.
pub fn write_shape<W: Write>(shape: &Shape, mut writer: W) -> WireResult<()> {
    writeln!(writer, "{}", shape.point_count())?;
    for point in shape.points() {
        let p = point.borrow();
        writeln!(writer, "{:.6} {:.6} {:.6}", p.x(), p.y(), p.z())?;
    }
    writeln!(writer, "{}", shape.segment_count())?;
    for segment in shape.segments() {
        writeln!(writer, "{} {}", segment.a, segment.b)?;
    }
    Ok(())
}

/// Save `shape` to a file, replacing it if it exists.
pub fn save_shape(shape: &Shape, path: impl AsRef<Path>) -> WireResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(fs::File::create(path)?);
    write_shape(shape, &mut writer)?;
    writer.flush()?;
    info!(
        path = %path.display(),
        points = shape.point_count(),
        segments = shape.segment_count(),
        "saved shape"
    );
    Ok(())
}

/// Load a shape saved by [`save_shape`].
pub fn load_shape(path: impl AsRef<Path>) -> WireResult<Shape> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let shape = parse_shape(&text)?;
    info!(
        path = %path.display(),
        points = shape.point_count(),
        segments = shape.segment_count(),
        "loaded shape"
    );
    Ok(shape)
}

/// Parse a shape from wire-format text.
///
/// ```text
/// <point count>
/// x y z            one line per point
/// <segment count>
/// a b              one line per segment, 0-based point indices
/// ```
///
/// Loading is all or nothing: any malformed line or out-of-range index is a
/// [`WireError::Parse`].
pub fn parse_shape(input: &str) -> WireResult<Shape> {
    let mut lines = LineReader::new(input);

    let point_count = lines.count("point")?;
    let mut points = PointCollection::with_capacity(point_count.min(MAX_PREALLOCATE));
    for _ in 0..point_count {
        let (line, text) = lines.next("point")?;
        let (_, (x, y, z)) = coordinates(text)
            .map_err(|_| WireError::parse(line, format!("malformed point `{text}`")))?;
        points.push_xyz(x, y, z);
    }

    let segment_count = lines.count("segment")?;
    let mut segments = Vec::with_capacity(segment_count.min(MAX_PREALLOCATE));
    for _ in 0..segment_count {
        let (line, text) = lines.next("segment")?;
        let (_, (a, b)) = index_pair(text)
            .map_err(|_| WireError::parse(line, format!("malformed segment `{text}`")))?;
        let a = point_index(a, point_count, line)?;
        let b = point_index(b, point_count, line)?;
        segments.push(Segment::new(a, b));
    }

    let trailing = lines.remaining();
    if trailing > 0 {
        warn!(trailing, "ignoring lines after the last segment");
    }

    Shape::from_parts(points, segments)
}

/// Line cursor that remembers the 1-based number of the last line handed out.
struct LineReader<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> LineReader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
            line: 0,
        }
    }

    fn next(&mut self, what: &str) -> WireResult<(usize, &'a str)> {
        self.line += 1;
        let line = self.line;
        match self.lines.next() {
            Some(text) => Ok((line, text)),
            None => Err(WireError::parse(line, format!("unexpected end of input, expected {what}"))),
        }
    }

    fn count(&mut self, what: &str) -> WireResult<usize> {
        let (line, text) = self.next(&format!("{what} count"))?;
        let (_, n) =
            count(text).map_err(|_| WireError::parse(line, format!("invalid {what} count `{text}`")))?;
        usize::try_from(n).map_err(|_| WireError::parse(line, format!("negative {what} count {n}")))
    }

    /// Non-blank lines left over.
    fn remaining(self) -> usize {
        self.lines.filter(|text| !text.trim().is_empty()).count()
    }
}

fn point_index(index: i64, len: usize, line: usize) -> WireResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| {
            WireError::parse(
                line,
                format!("segment index {index} outside 0..{len}"),
            )
        })
}

fn count(input: &str) -> IResult<&str, i64> {
    all_consuming(delimited(space0, integer, space0))(input)
}

fn coordinates(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, x) = preceded(space0, double)(input)?;
    let (input, y) = preceded(space1, double)(input)?;
    let (input, z) = preceded(space1, double)(input)?;
    let (input, _) = all_consuming(space0)(input)?;
    Ok((input, (x, y, z)))
}

fn index_pair(input: &str) -> IResult<&str, (i64, i64)> {
    let (input, a) = preceded(space0, integer)(input)?;
    let (input, b) = preceded(space1, integer)(input)?;
    let (input, _) = all_consuming(space0)(input)?;
    Ok((input, (a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transformable;
    use approx::assert_relative_eq;

    const TRIANGLE: &str = "3\n0 -10 0\n10 10 0\n-10 10 0\n3\n0 1\n1 2\n2 0\n";

    #[test]
    fn test_parse_triangle() {
        let shape = parse_shape(TRIANGLE).unwrap();
        assert_eq!(shape.point_count(), 3);
        assert_eq!(shape.points()[1].borrow().x(), 10.0);
        assert_eq!(shape.segments()[2], Segment::new(2, 0));
    }

    #[test]
    fn test_write_uses_six_decimals() {
        let shape = parse_shape("1\n1 -0.5 2.25\n0\n").unwrap();
        let mut out = Vec::new();
        write_shape(&shape, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n1.000000 -0.500000 2.250000\n0\n");
    }

    #[test]
    fn test_round_trip() {
        let mut shape = parse_shape(TRIANGLE).unwrap();
        shape.rotate(0.3, 0.2, 0.1);
        let mut out = Vec::new();
        write_shape(&shape, &mut out).unwrap();
        let loaded = parse_shape(std::str::from_utf8(&out).unwrap()).unwrap();

        assert_eq!(loaded.segments(), shape.segments());
        for (a, b) in shape.points().iter().zip(loaded.points()) {
            assert_relative_eq!(a.borrow().position, b.borrow().position, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_tolerates_extra_whitespace() {
        let shape = parse_shape(" 2 \n1  2\t3\n4 5 6  \n1\n 0 1\n").unwrap();
        assert_eq!(shape.points()[0].borrow().z(), 3.0);
        assert_eq!(shape.segment_count(), 1);
    }

    #[test]
    fn test_rejects_bad_count() {
        let err = parse_shape("three\n").unwrap_err();
        assert!(matches!(err, WireError::Parse { line: 1, .. }));

        let err = parse_shape("-1\n").unwrap_err();
        assert!(matches!(err, WireError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_rejects_malformed_point() {
        let err = parse_shape("2\n1 2 3\n1 2\n0\n").unwrap_err();
        assert!(matches!(err, WireError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = parse_shape("2\n0 0 0\n1 1 1\n1\n0 2\n").unwrap_err();
        match err {
            WireError::Parse { line, message } => {
                assert_eq!(line, 5);
                assert!(message.contains("outside 0..2"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(parse_shape("1\n0 0 0\n1\n-1 0\n").is_err());
    }

    #[test]
    fn test_rejects_truncated_input() {
        let err = parse_shape("3\n0 0 0\n").unwrap_err();
        assert!(matches!(err, WireError::Parse { line: 3, .. }));
        assert!(parse_shape("").is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("wire-format-{}.wire", std::process::id()));
        let shape = parse_shape(TRIANGLE).unwrap();
        save_shape(&shape, &path).unwrap();
        let loaded = load_shape(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.point_count(), 3);
        assert_eq!(loaded.segments(), shape.segments());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_shape("/definitely/not/here.wire").unwrap_err();
        assert!(matches!(err, WireError::Io(_)));
    }
}
