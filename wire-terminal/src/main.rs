/// Wire Terminal Demo - Spinning Cube and Sphere
///
/// Renders a cuboid wrapped around a slightly jittered sphere as ASCII art.
/// Controls:
///   - WASD / Arrow Keys: Rotate
///   - E/R: Roll rotation
///   - F: Toggle depth fog
///   - P: Toggle point markers
///   - Q/ESC: Quit
use std::io;
use wire_core::{primitives, Transformable};
use wire_terminal::TerminalApp;

fn main() -> io::Result<()> {
    println!("Wire Terminal Renderer - Loading...");

    let mut rng = rand::thread_rng();
    let mut shape = primitives::cuboid(2.0, 2.0, 2.0);
    let mut sphere = primitives::sphere(0.8, 8, 12);
    sphere.randomize(&mut rng, 0.03);
    shape.add_shape(&sphere);

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(shape)?;
    app.run()?;

    println!("Thank you for using Wire Terminal Renderer!");
    Ok(())
}
