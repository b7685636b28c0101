/// ASCII drawing surface for terminal rendering
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wire_core::{Color, DrawingSurface};

/// Character luminosity ramp (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy)]
struct Cell {
    level: usize,
    color: Color,
}

impl Cell {
    const EMPTY: Cell = Cell {
        level: 0,
        color: Color::WHITE,
    };
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    line_width: f64,
    color: Color,
}

/// Character grid that rasterizes paths and circles as they are drawn.
///
/// Alpha picks the glyph from the luminosity ramp. Where shapes overlap the
/// brighter glyph wins.
pub struct AsciiSurface {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: Vec<(f64, f64)>,
}

impl AsciiSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
            state: GraphicsState {
                line_width: 1.0,
                color: Color::WHITE,
            },
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.path.clear();
    }

    /// Glyph at a cell, or `None` outside the grid.
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(LUMINOSITY_RAMP[self.cells[y * self.width + x].level])
    }

    /// The grid as text, one line per row.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| LUMINOSITY_RAMP[c.level]).collect())
            .collect()
    }

    fn current_level(&self) -> usize {
        let alpha = self.state.color.a.clamp(0.0, 1.0);
        (alpha * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize
    }

    fn plot(&mut self, x: i64, y: i64, level: usize) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let cell = &mut self.cells[y as usize * self.width + x as usize];
        if level > cell.level {
            *cell = Cell {
                level,
                color: self.state.color,
            };
        }
    }

    /// DDA line between two points already clipped to the grid.
    fn rasterize_line(&mut self, from: (f64, f64), to: (f64, f64), level: usize) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (from.0 + dx * t).floor() as i64;
            let y = (from.1 + dy * t).floor() as i64;
            self.plot(x, y, level);
        }
    }

    /// Liang-Barsky clip of a segment against the grid rectangle.
    fn clip(&self, from: (f64, f64), to: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
            return None;
        }
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let (max_x, max_y) = (self.width as f64, self.height as f64);
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, q) in [
            (-dx, from.0),
            (dx, max_x - from.0),
            (-dy, from.1),
            (dy, max_y - from.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }
        if t0 > t1 {
            return None;
        }
        Some((
            (from.0 + dx * t0, from.1 + dy * t0),
            (from.0 + dx * t1, from.1 + dy * t1),
        ))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(term_color(cell.color)))?;
                writer.queue(Print(LUMINOSITY_RAMP[cell.level]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn term_color(color: Color) -> TermColor {
    let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    TermColor::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

impl DrawingSurface for AsciiSurface {
    fn move_to(&mut self, x: f64, y: f64) {
        self.path.clear();
        self.path.push((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push((x, y));
    }

    fn stroke(&mut self) {
        let level = self.current_level();
        let path = std::mem::take(&mut self.path);
        if level == 0 {
            return;
        }
        for pair in path.windows(2) {
            if let Some((from, to)) = self.clip(pair[0], pair[1]) {
                self.rasterize_line(from, to, level);
            }
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn line_width(&self) -> f64 {
        self.state.line_width
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        let level = self.current_level();
        if level == 0 || !(x.is_finite() && y.is_finite() && radius.is_finite()) {
            return;
        }
        let min_x = (x - radius).floor().max(0.0) as i64;
        let max_x = (x + radius).ceil().min(self.width as f64) as i64;
        let min_y = (y - radius).floor().max(0.0) as i64;
        let max_y = (y + radius).ceil().min(self.height as f64) as i64;

        // always mark the center so tiny markers stay visible
        self.plot(x.floor() as i64, y.floor() as i64, level);
        for cy in min_y..max_y {
            for cx in min_x..max_x {
                let (px, py) = (cx as f64 + 0.5, cy as f64 + 0.5);
                if (px - x).powi(2) + (py - y).powi(2) <= radius * radius {
                    self.plot(cx, cy, level);
                }
            }
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_source_color(&mut self, color: Color) {
        self.state.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut surface = AsciiSurface::new(10, 3);
        surface.move_to(1.5, 1.5);
        surface.line_to(6.5, 1.5);
        surface.stroke();
        assert_eq!(surface.rows()[1], " @@@@@@   ");
        assert_eq!(surface.rows()[0], "          ");
    }

    #[test]
    fn test_alpha_selects_glyph() {
        let mut surface = AsciiSurface::new(4, 1);
        surface.set_source_color(Color::WHITE.faded(0.5));
        surface.move_to(0.5, 0.5);
        surface.line_to(3.5, 0.5);
        surface.stroke();
        // 0.5 * 9 rounds to ramp index 5
        assert_eq!(surface.glyph(2, 0), Some('+'));
    }

    #[test]
    fn test_brighter_glyph_wins() {
        let mut surface = AsciiSurface::new(3, 3);
        surface.move_to(0.5, 1.5);
        surface.line_to(2.5, 1.5);
        surface.stroke();
        surface.set_source_color(Color::WHITE.faded(0.2));
        surface.move_to(1.5, 0.5);
        surface.line_to(1.5, 2.5);
        surface.stroke();
        assert_eq!(surface.glyph(1, 1), Some('@'));
        assert_eq!(surface.glyph(1, 0), Some(':'));
    }

    #[test]
    fn test_offscreen_lines_are_clipped() {
        let mut surface = AsciiSurface::new(5, 5);
        surface.move_to(-1e9, 2.5);
        surface.line_to(1e9, 2.5);
        surface.stroke();
        assert_eq!(surface.rows()[2], "@@@@@");

        surface.move_to(-10.0, -10.0);
        surface.line_to(-1.0, -20.0);
        surface.stroke();
        surface.move_to(f64::INFINITY, 0.0);
        surface.line_to(1.0, 1.0);
        surface.stroke();
        assert_eq!(surface.rows().iter().filter(|r| r.trim().is_empty()).count(), 4);
    }

    #[test]
    fn test_fill_circle() {
        let mut surface = AsciiSurface::new(7, 7);
        surface.fill_circle(3.5, 3.5, 1.5);
        assert_eq!(surface.glyph(3, 3), Some('@'));
        assert_eq!(surface.glyph(2, 3), Some('@'));
        assert_eq!(surface.glyph(0, 0), Some(' '));

        surface.fill_circle(0.2, 6.2, 0.1);
        assert_eq!(surface.glyph(0, 6), Some('@'));
    }

    #[test]
    fn test_save_restore_and_transparent_strokes() {
        let mut surface = AsciiSurface::new(3, 1);
        surface.save();
        surface.set_line_width(4.0);
        surface.set_source_color(Color::rgba(1.0, 0.0, 0.0, 0.0));
        surface.move_to(0.5, 0.5);
        surface.line_to(2.5, 0.5);
        surface.stroke();
        surface.restore();

        assert_eq!(surface.rows()[0], "   ");
        assert_eq!(surface.line_width(), 1.0);
        surface.restore();
        assert_eq!(surface.line_width(), 1.0);
    }

    #[test]
    fn test_clear() {
        let mut surface = AsciiSurface::new(2, 2);
        surface.fill_circle(1.0, 1.0, 1.0);
        surface.clear();
        assert!(surface.rows().iter().all(|r| r == "  "));
        assert_eq!(surface.size(), (2, 2));
    }

    #[test]
    fn test_draw_emits_every_cell() {
        let mut surface = AsciiSurface::new(3, 2);
        surface.fill_circle(0.5, 0.5, 0.2);
        let mut out = Vec::new();
        surface.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('@'));
        assert_eq!(text.matches(' ').count(), 5);
    }
}
