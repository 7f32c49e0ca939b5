/// Terminal preview for pinhole scenes
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use pinhole_core::{Aabb, Color as SceneColor, ImageOptions, Pinhole, RotationState};
use std::f64::consts::PI;
use std::fs::{self, File};
use std::io::{self, stdout, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub mod renderer;

pub use renderer::HalfBlockRenderer;

/// Rotation per key press, in radians
const STEP: f64 = 0.1;

/// Size of PNG snapshots taken with `p`
const SNAPSHOT_SIZE: (u32, u32) = (1024, 768);

/// Cube and two crossed rings, the classic pinhole demo
pub fn shapes_scene() -> Pinhole {
    let mut p = Pinhole::new();
    p.begin();
    p.draw_cube([-0.2, -0.2, -0.2], [0.2, 0.2, 0.2]);
    p.colorize(SceneColor::rgb(255, 0, 0));
    p.end();

    p.begin();
    p.draw_circle([0.0, 0.0, 0.0], 0.2);
    p.rotate(PI / 3.0, PI / 2.0, 0.0);
    p.end();

    p.begin();
    p.draw_circle([0.0, 0.0, 0.0], 0.2);
    p.rotate(-PI / 3.0, PI / 2.0, 0.0);
    p.end();

    p.scale(1.75, 1.75, 1.75);
    p
}

/// Loads an `.obj` or `.stl` file, centered and scaled to fit the view
pub fn load_model(path: &Path) -> pinhole_core::Result<Pinhole> {
    let mut scene = Pinhole::new();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("stl") => scene.load_stl(&fs::read(path)?)?,
        _ => scene.load_obj(BufReader::new(File::open(path)?))?,
    }
    info!(path = %path.display(), segments = scene.len(), "model loaded");

    scene.center();
    let mut bounds = Aabb::empty();
    for seg in scene.segments() {
        bounds.extend(&seg.start);
        bounds.extend(&seg.end);
    }
    if !bounds.is_empty() {
        let extent = (bounds.max - bounds.min).amax();
        if extent > 0.0 {
            let factor = 1.2 / extent;
            scene.scale(factor, factor, factor);
        }
    }
    Ok(scene)
}

/// Interactive preview that spins a scene in the terminal
pub struct TerminalApp {
    scene: Pinhole,
    rotation: RotationState,
    options: ImageOptions,
    renderer: HalfBlockRenderer,
    spin: bool,
    running: bool,
    snapshots: u32,
    status: Option<String>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Pinhole, options: ImageOptions) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;

        Ok(Self {
            scene,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            options,
            // top line holds the status bar
            renderer: HalfBlockRenderer::new(columns, rows.saturating_sub(1)),
            spin: true,
            running: true,
            snapshots: 0,
            status: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    /// The scene as currently shown, with the view rotation applied
    pub fn posed_scene(&self) -> Pinhole {
        let mut posed = self.scene.clone();
        posed.rotate(self.rotation.x, self.rotation.y, self.rotation.z);
        posed
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if self.spin {
                self.rotation.rotate(0.01, 0.015, 0.0);
            }

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

    /// Applies one terminal event to the view state
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code)
            }
            Event::Resize(columns, rows) => {
                debug!(columns, rows, "terminal resized");
                self.renderer.resize(columns, rows.saturating_sub(1));
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, -STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, STEP, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, STEP),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -STEP),
            KeyCode::Char(' ') => self.spin = !self.spin,
            KeyCode::Char('p') => self.snapshot(),
            _ => {}
        }
    }

    fn snapshot(&mut self) {
        self.snapshots += 1;
        let path = PathBuf::from(format!("pinhole-{:03}.png", self.snapshots));
        let (width, height) = SNAPSHOT_SIZE;
        match self.posed_scene().save_png(&path, width, height, &self.options) {
            Ok(()) => {
                info!(path = %path.display(), "snapshot saved");
                self.status = Some(format!("saved {}", path.display()));
            }
            Err(e) => {
                error!(error = %e, "snapshot failed");
                self.status = Some(format!("snapshot failed: {}", e));
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = self.renderer.frame_size();
        let frame = self.posed_scene().image(width, height, &self.options);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&frame, &mut stdout)?;

        let status = self.status.as_deref().unwrap_or(
            "WASD/Arrows=Rotate E/R=Roll Space=Spin P=Snapshot Q=Quit",
        );
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Pinhole | {} segments | FPS: {:.1} | {}",
                self.scene.len(),
                self.fps,
                status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
