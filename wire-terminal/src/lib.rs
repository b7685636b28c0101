/// Terminal front end that spins a wireframe shape as ASCII art
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wire_core::{Camera, Fog, Scene, Shape, Transformable};

pub mod renderer;

pub use renderer::AsciiSurface;

/// Terminal cells are about twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Distance from the camera to the shape's center, in unit-sphere radii.
const VIEW_DISTANCE: f64 = 4.0;

/// Accumulated rotation applied to the shape each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spin {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Spin {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Fit a shape into the unit sphere around the origin.
pub fn normalize_size(shape: &mut Shape) {
    shape.center();
    let radius = shape
        .points()
        .iter()
        .map(|p| p.borrow().magnitude())
        .fold(0.0, f64::max);
    if radius > 0.0 {
        shape.uni_scale(1.0 / radius);
    }
}

/// Scene for a `width` x `height` terminal viewing a unit-sized shape.
pub fn terminal_scene(width: u16, height: u16) -> Scene {
    let camera = Camera::centered(width as u32, height as u32, VIEW_DISTANCE)
        .with_focal_length(height as f64 * 1.6)
        .with_clip(0.5, 100.0);
    let mut fog = Fog::new(VIEW_DISTANCE - 1.0, VIEW_DISTANCE + 1.2);
    fog.enabled = false;
    Scene::new(camera).with_fog(fog)
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    shape: Shape,
    spin: Spin,
    scene: Scene,
    surface: AsciiSurface,
    show_points: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Take ownership of `shape`, rescaled to fit the view. Point-only
    /// shapes start in point mode.
    pub fn new(mut shape: Shape) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        normalize_size(&mut shape);
        let show_points = shape.segment_count() == 0;

        Ok(Self {
            shape,
            spin: Spin::new(0.3, 0.3, 0.0),
            scene: terminal_scene(width, height),
            surface: AsciiSurface::new(width as usize, height as usize),
            show_points,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Continuous slow rotation
            self.spin.rotate(0.01, 0.015, 0.0);

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Resize(width, height) => {
                let fog = self.scene.fog;
                self.scene = terminal_scene(width, height);
                self.scene.fog.enabled = fog.enabled;
                self.surface = AsciiSurface::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.spin.rotate(0.1, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.spin.rotate(-0.1, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.spin.rotate(0.0, -0.1, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.spin.rotate(0.0, 0.1, 0.0),
            KeyCode::Char('e') => self.spin.rotate(0.0, 0.0, 0.1),
            KeyCode::Char('r') => self.spin.rotate(0.0, 0.0, -0.1),
            KeyCode::Char('f') => self.scene.fog.enabled = !self.scene.fog.enabled,
            KeyCode::Char('p') => self.show_points = !self.show_points,
            _ => {}
        }
    }

    /// The shape as it appears this frame: rotated, then stretched for the
    /// cell aspect ratio with y pointing down the screen.
    fn frame_shape(&self) -> Shape {
        self.shape
            .rotated(self.spin.x, self.spin.y, self.spin.z)
            .scaled(CELL_ASPECT, -1.0, 1.0)
    }

    fn render(&mut self) -> io::Result<()> {
        self.surface.clear();

        let frame = self.frame_shape();
        if self.show_points {
            frame.render_points(&self.scene, &mut self.surface, 0.1);
        } else {
            frame.stroke(&self.scene, &mut self.surface, 1.0);
        }

        let mut stdout = stdout();
        self.surface.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Wire Terminal | FPS: {:.1} | {} pts {} segs | WASD/Arrows=Rotate E/R=Roll F=Fog P=Points Q=Quit",
                self.fps,
                self.shape.point_count(),
                self.shape.segment_count(),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire_core::primitives;

    #[test]
    fn test_normalize_size_fits_unit_sphere() {
        let mut shape = primitives::cuboid(10.0, 4.0, 2.0);
        shape.translate(7.0, -3.0, 1.0);
        normalize_size(&mut shape);
        let max = shape
            .points()
            .iter()
            .map(|p| p.borrow().magnitude())
            .fold(0.0, f64::max);
        assert!((max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_size_single_point() {
        let mut shape = Shape::new();
        shape.add_xyz(3.0, 3.0, 3.0);
        normalize_size(&mut shape);
        assert_eq!(shape.points()[0].borrow().magnitude(), 0.0);
    }

    #[test]
    fn test_cube_fills_terminal_view() {
        let mut shape = primitives::cuboid(2.0, 2.0, 2.0);
        normalize_size(&mut shape);
        let scene = terminal_scene(80, 24);
        let mut surface = AsciiSurface::new(80, 24);
        shape
            .rotated(0.3, 0.3, 0.0)
            .scaled(CELL_ASPECT, -1.0, 1.0)
            .stroke(&scene, &mut surface, 1.0);

        let rows = surface.rows();
        let lit = rows.iter().filter(|r| !r.trim().is_empty()).count();
        assert!(lit > 5, "only {lit} rows drawn");
        assert!(rows[0].trim().is_empty() && rows[23].trim().is_empty());
    }

    #[test]
    fn test_spin_accumulates() {
        let mut spin = Spin::default();
        spin.rotate(0.1, 0.2, 0.3);
        spin.rotate(0.1, 0.0, -0.3);
        assert_eq!(spin, Spin::new(0.2, 0.2, 0.0));
    }
}
