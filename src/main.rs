// What you SEE:
// • Two soft, slowly breathing blobs (orange in front, purple behind) under film grain.
// • A small panel in the corner: Up/Down pick a setting, Left/Right change it
//   (hold Shift for big steps), Space flips on/off settings.
// • Tab hides the panel, P pauses, G re-rolls the grain, S saves a PNG. ESC quits.

mod blob;
mod compositor;
mod config;
mod curve;
mod draw;
mod driver;
mod error;
mod noise;
mod panel;
mod raster;
mod rng;
mod snapshot;
mod surface;
mod types;

use clap::Parser;
use compositor::Scene;
use config::Config;
use draw::{draw_text_5x7, Drawer, LINE_HEIGHT};
use driver::Driver;
use error::Error;
use minifb::Key;
use panel::{Hook, Panel};
use rng::{RandomSource, SeededRandom};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use surface::{RasterSurface, Surface};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Animated two-blob canvas with blur and film grain")]
struct Cli {
    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// YAML file with starting parameters (missing keys keep defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for blob shapes and grain (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Where S writes PNG snapshots
    #[arg(long, default_value = ".")]
    snapshot_dir: PathBuf,

    /// Start with the panel hidden
    #[arg(long)]
    no_panel: bool,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    /* --- Parameters + randomness ---
       Visual: decides the starting shape, colors and grain. */
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut rng = match cli.seed {
        Some(seed) => SeededRandom::from_seed(seed),
        None => SeededRandom::from_entropy(),
    };
    info!(width = cli.width, height = cli.height, seed = ?cli.seed, "starting");

    /* --- Window + software canvas ---
       Visual: a window opens; the canvas is what you see each frame. */
    let mut drawer = Drawer::new("Grain Blobs", cli.width, cli.height)?;
    let mut surface = RasterSurface::new(cli.width, cli.height, config.background)?;

    /* --- Blobs + grain tile, created once ---
       Visual: the two blob shapes and the grain pattern. */
    let mut scene = Scene::new(&config, &mut rng);
    let mut panel = Panel::new(!cli.no_panel);
    let mut driver = Driver::new();

    /* --- HUD / FPS --- */
    let start = Instant::now();
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Inputs → config changes (+ hooks for grain/blob rebuilds) */
        let mut hooks: Vec<Hook> = Vec::new();
        let big = if drawer.shift_down() { 10 } else { 1 };
        if drawer.pressed_repeat(Key::Down) { panel.select_next(); }
        if drawer.pressed_repeat(Key::Up) { panel.select_prev(); }
        if drawer.pressed_repeat(Key::Right) { hooks.extend(panel.adjust(&mut config, big)); }
        if drawer.pressed_repeat(Key::Left) { hooks.extend(panel.adjust(&mut config, -big)); }
        if drawer.pressed_once(Key::Space) { hooks.extend(panel.toggle(&mut config)); }
        if drawer.pressed_once(Key::Tab) { panel.visible = !panel.visible; }
        if drawer.pressed_once(Key::P) { config.animate = !config.animate; }
        if drawer.pressed_once(Key::G) { hooks.push(Hook::RegenerateGrain); }

        for hook in hooks {
            apply_hook(hook, &config, &mut scene, &mut rng);
        }

        /* 2) Follow the window size (content is redrawn from scratch) */
        let (w, h) = drawer.size();
        if w > 0 && h > 0 && (w, h) != surface.size() {
            debug!(w, h, "resize");
            surface.resize(w, h)?;
        }
        surface.set_background(config.background);

        /* 3) Draw a frame only while animating; paused frames keep the last picture */
        let now_ms = now.duration_since(start).as_secs_f64() * 1000.0;
        if let Some(time) = driver.tick(&config, now_ms) {
            scene.render(&config, &mut surface, time, &mut rng);
        }

        /* 4) S saves exactly what the blobs look like (before the HUD goes on) */
        let mut screen = surface.frame();
        if drawer.pressed_once(Key::S) {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default();
            match snapshot::save_png(&screen, &cli.snapshot_dir, millis) {
                Ok(path) => info!(path = %path.display(), "snapshot saved"),
                Err(e) => warn!("{e}"),
            }
        }

        /* 5) HUD + panel go on the copy so a paused frame stays clean */
        let status = if config.animate { "LIVE" } else { "PAUSED" };
        let clock = driver.last_time().unwrap_or(0.0) / 1000.0;
        let hud = format!("{status} {clock:.1}S | {hud_fps_text} | TAB: panel  P: pause  S: save");
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);
        panel.render(&mut screen, &config, 8 + LINE_HEIGHT + 4);

        /* 6) Present to the window (this is when the on-screen image updates). */
        drawer.present(&screen)?;

        /* 7) FPS counter (logged + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            let (ticks, drawn) = driver.counts();
            debug!(fps, ticks, drawn, "frame stats");
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("bye");
    Ok(())
}

/// Run the side effect a panel change asked for.
fn apply_hook(hook: Hook, config: &Config, scene: &mut Scene, rng: &mut dyn RandomSource) {
    match hook {
        Hook::RegenerateGrain => {
            debug!("regenerating grain");
            scene.regenerate_noise(config, rng);
        }
        Hook::ResizeSegments(n) => {
            debug!(segments = n, "resizing blobs");
            scene.resize_blobs(n, rng);
        }
    }
}
