/// Example: Load and render a saved shape or `.xyz` point cloud in the terminal
///
/// Usage: cargo run --example load_wire -- path/to/shape.wire
///        cargo run --example load_wire -- path/to/cloud.xyz
use std::env;
use std::io;
use std::path::Path;
use wire_core::{load_shape, load_xyz, primitives, WireError};
use wire_terminal::TerminalApp;

fn to_io(err: WireError) -> io::Error {
    match err {
        WireError::Io(err) => err,
        other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file.wire|file.xyz>", args[0]);
        eprintln!("\nNo file provided, using default cube...");
        let mut app = TerminalApp::new(primitives::cuboid(2.0, 2.0, 2.0))?;
        return app.run();
    }

    let path = Path::new(&args[1]);
    println!("Loading shape: {}", path.display());

    let is_cloud = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("xyz"));
    let shape = if is_cloud { load_xyz(path) } else { load_shape(path) }.map_err(to_io)?;

    println!(
        "Loaded {} points and {} segments",
        shape.point_count(),
        shape.segment_count()
    );
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(shape)?;
    app.run()?;

    println!("Thank you for using Wire Terminal Renderer!");
    Ok(())
}
