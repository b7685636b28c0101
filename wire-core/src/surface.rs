// Drawing contract between the render pipeline and a 2D target

/// RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn faded(self, factor: f64) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// The drawing primitives the render pipeline needs.
///
/// The pipeline never rasterizes; any canvas, terminal grid or vector
/// backend can implement this. A surface keeps a current line width and
/// source color. `save` pushes a snapshot of both and `restore` pops it.
pub trait DrawingSurface {
    /// Start a new sub-path at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Add a line from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Stroke the current path with the current color and width, then clear it.
    fn stroke(&mut self);

    fn set_line_width(&mut self, width: f64);

    fn line_width(&self) -> f64;

    /// Fill a circle of the given radius centered on (x, y).
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);

    /// Push the current graphics state.
    fn save(&mut self);

    /// Pop the graphics state pushed by the matching [`DrawingSurface::save`].
    fn restore(&mut self);

    fn set_source_color(&mut self, color: Color);
}

/// One call made on a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    SetLineWidth(f64),
    FillCircle { x: f64, y: f64, radius: f64 },
    Save,
    Restore,
    SetSourceColor(Color),
}

/// A stroked line as seen by a [`Recorder`]: endpoints plus the state it was drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedLine {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub width: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    line_width: f64,
    color: Color,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            color: Color::WHITE,
        }
    }
}

/// In-memory surface that records every call and tracks graphics state.
///
/// Useful for tests and for exporting a frame to another format.
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: Vec<(f64, f64)>,
    lines: Vec<RecordedLine>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current source color.
    pub fn color(&self) -> Color {
        self.state.color
    }

    /// Depth of the save/restore stack.
    pub fn saved_states(&self) -> usize {
        self.stack.len()
    }

    /// Every line segment that has been stroked, in order.
    pub fn lines(&self) -> &[RecordedLine] {
        &self.lines
    }

    /// Every filled circle, in order.
    pub fn circles(&self) -> Vec<(f64, f64, f64)> {
        self.commands
            .iter()
            .filter_map(|command| match *command {
                DrawCommand::FillCircle { x, y, radius } => Some((x, y, radius)),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for Recorder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
        self.path.clear();
        self.path.push((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
        self.path.push((x, y));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
        for pair in self.path.windows(2) {
            self.lines.push(RecordedLine {
                from: pair[0],
                to: pair[1],
                width: self.state.line_width,
                color: self.state.color,
            });
        }
        self.path.clear();
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth(width));
        self.state.line_width = width;
    }

    fn line_width(&self) -> f64 {
        self.state.line_width
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::FillCircle { x, y, radius });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_source_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetSourceColor(color));
        self.state.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faded_only_touches_alpha() {
        let color = Color::rgba(0.2, 0.4, 0.6, 0.5).faded(0.5);
        assert_eq!(color, Color::rgba(0.2, 0.4, 0.6, 0.25));
    }

    #[test]
    fn test_recorder_restores_state() {
        let mut recorder = Recorder::new();
        recorder.set_line_width(2.0);
        recorder.save();
        recorder.set_line_width(8.0);
        recorder.set_source_color(Color::BLACK);
        recorder.restore();

        assert_eq!(recorder.line_width(), 2.0);
        assert_eq!(recorder.color(), Color::WHITE);
        assert_eq!(recorder.saved_states(), 0);
    }

    #[test]
    fn test_recorder_collects_stroked_lines() {
        let mut recorder = Recorder::new();
        recorder.set_line_width(3.0);
        recorder.move_to(0.0, 0.0);
        recorder.line_to(4.0, 0.0);
        recorder.line_to(4.0, 3.0);
        recorder.stroke();

        let lines = recorder.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].from, (4.0, 0.0));
        assert_eq!(lines[1].to, (4.0, 3.0));
        assert_eq!(lines[0].width, 3.0);
    }

    #[test]
    fn test_unstroked_path_draws_nothing() {
        let mut recorder = Recorder::new();
        recorder.move_to(0.0, 0.0);
        recorder.line_to(1.0, 1.0);
        assert!(recorder.lines().is_empty());
        assert_eq!(recorder.commands.len(), 2);
    }
}
