/// Pinhole Terminal Preview
///
/// Shows the shapes demo, or a model passed on the command line.
/// Usage: pinhole-terminal [--options settings.json] [model.obj|model.stl]
/// Controls:
///   - WASD / Arrow Keys: Rotate the scene
///   - E/R: Roll rotation
///   - Space: Toggle spinning
///   - P: Save a PNG snapshot
///   - Q/ESC: Quit

use pinhole_core::{Color, ImageOptions};
use pinhole_terminal::{load_model, shapes_scene, TerminalApp};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let mut model: Option<PathBuf> = None;
    // the terminal backdrop is black
    let mut options = ImageOptions::default().with_foreground(Some(Color::WHITE));
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" => {
                let path = args
                    .next()
                    .ok_or_else(|| invalid("--options needs a file".to_string()))?;
                let text = fs::read_to_string(&path)?;
                options = serde_json::from_str(&text)
                    .map_err(|e| invalid(format!("bad options file {}: {}", path, e)))?;
            }
            _ => model = Some(PathBuf::from(arg)),
        }
    }

    let scene = match &model {
        Some(path) => load_model(path).map_err(|e| invalid(format!("{}: {}", path.display(), e)))?,
        None => shapes_scene(),
    };
    info!(segments = scene.len(), "starting preview");

    let mut app = TerminalApp::new(scene, options)?;
    app.run()
}
