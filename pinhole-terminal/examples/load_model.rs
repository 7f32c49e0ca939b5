/// Example: Load a model and render it to a PNG, then preview it
///
/// Usage: cargo run --example load_model -- path/to/model.obj [out.png]

use pinhole_core::{Color, ImageOptions};
use pinhole_terminal::{load_model, TerminalApp};
use std::env;
use std::io;
use std::path::Path;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <model.obj|model.stl> [out.png]", args[0]);
        return Ok(());
    }

    let path = Path::new(&args[1]);
    println!("Loading model: {}", path.display());
    let mut scene = load_model(path).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load model: {}", e))
    })?;
    println!("Loaded {} segments", scene.len());

    if let Some(out) = args.get(2) {
        let options = ImageOptions::default().with_background(Some(Color::WHITE));
        scene.rotate(0.3, 0.3, 0.0);
        scene
            .save_png(out, 750, 750, &options)
            .map_err(|e| {
                io::Error::new(io::ErrorKind::Other, format!("Failed to write PNG: {}", e))
            })?;
        println!("Wrote {}", out);
        return Ok(());
    }

    println!("Starting terminal preview (press Q to quit)...");
    let options = ImageOptions::default().with_foreground(Some(Color::WHITE));
    let mut app = TerminalApp::new(scene, options)?;
    app.run()
}
