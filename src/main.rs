use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};

use term_float::drivers::InputDriver;
use term_float::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_float::drivers::mouse::MouseTranslator;
use term_float::event_loop::{ControlFlow, EventLoop};
use term_float::log_buffer::{LogBufferHandle, set_global_log_buffer};
use term_float::state::AppState;
use term_float::ui::{self, ControlButton, FrameView};
use term_float::{
    DisplayMode, FloatController, Geometry, GeometryStore, HeadlessSurface, JsonFileStore,
    MemoryStore, OverlayConfig, OverlayResult, OverlaySurface, Point, ScreenBounds, tracing_sub,
};

const POLL_INTERVAL: Duration = Duration::from_millis(16);
const LOG_TAIL: usize = 5;

// The terminal is the screen here, so sizes are in cells.
const CELL_MIN_DIMENSION: i32 = 6;
const CELL_BUBBLE_DIAMETER: i32 = 3;
const CELL_TOUCH_SLOP: i32 = 1;
const CELL_DEFAULT_GEOMETRY: Geometry = Geometry::new(4, 2, 40, 12);

type Controller = FloatController<HeadlessSurface, Box<dyn GeometryStore>>;

#[derive(Parser, Debug)]
#[command(
    name = "term-float",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating overlay you can move, resize and collapse with the mouse"
)]
struct Cli {
    /// Smallest width/height the overlay can be resized to, in cells.
    #[arg(long, value_name = "CELLS", default_value_t = CELL_MIN_DIMENSION)]
    min_dimension: i32,

    /// Side of the collapsed bubble, in cells.
    #[arg(long, value_name = "CELLS", default_value_t = CELL_BUBBLE_DIAMETER)]
    bubble_diameter: i32,

    /// How long a press has to stay still before it starts a move.
    #[arg(long = "long-press-ms", value_name = "MS", default_value_t = 500)]
    long_press_ms: u64,

    /// Where the overlay geometry is remembered between runs.
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Keep the geometry in memory only.
    #[arg(long, conflicts_with = "state_file")]
    no_persist: bool,
}

impl Cli {
    fn overlay_config(&self) -> OverlayResult<OverlayConfig> {
        let config = OverlayConfig {
            min_dimension: self.min_dimension,
            bubble_diameter: self.bubble_diameter,
            long_press_timeout: Duration::from_millis(self.long_press_ms),
            touch_slop: CELL_TOUCH_SLOP,
            default_geometry: CELL_DEFAULT_GEOMETRY,
            ..OverlayConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn state_path(&self) -> Option<PathBuf> {
        if self.no_persist {
            return None;
        }
        self.state_file.clone().or_else(JsonFileStore::default_path)
    }
}

fn main() -> io::Result<()> {
    let args = Cli::parse();
    let config = args
        .overlay_config()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    let log = LogBufferHandle::default();
    set_global_log_buffer(log.clone());
    tracing_sub::init_default();

    let state_path = args.state_path();
    let store: Box<dyn GeometryStore> = match &state_path {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };
    let mut controller =
        FloatController::new(config, HeadlessSurface::new(), store).map_err(io::Error::other)?;

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    if let Err(err) = controller.on_attach(output.screen_bounds()) {
        tracing::warn!(error = %err, "overlay attached without a layout");
    }

    let mut state = AppState::new();
    let mut mouse = MouseTranslator::new();
    let mut events = EventLoop::new(ConsoleInputDriver::new(), POLL_INTERVAL);

    let result = events.run(|driver, event| {
        let now = Instant::now();
        let idle = event.is_none();
        match event {
            None => {
                controller.tick(now);
            }
            Some(Event::Key(key)) => {
                if handle_key(key, &mut controller, &mut state) {
                    return Ok(ControlFlow::Quit);
                }
            }
            Some(Event::Mouse(event)) => {
                let at = Point::new(i32::from(event.column), i32::from(event.row));
                if event.kind == MouseEventKind::Down(MouseButton::Left)
                    && let Some(button) = control_hit(&controller, at)
                {
                    match button {
                        ControlButton::Minimize => toggle_bubble(&mut controller),
                        ControlButton::Exit => return Ok(ControlFlow::Quit),
                    }
                }
                let pinch = controller.mode() == DisplayMode::Interacting
                    && !controller.is_collapsed();
                for pointer in mouse.translate(&event, pinch, now) {
                    controller.on_pointer_event(&pointer);
                }
            }
            Some(Event::Resize(cols, rows)) => {
                if let Ok(bounds) = ScreenBounds::new(i32::from(cols), i32::from(rows)) {
                    controller.on_bounds_changed(bounds);
                }
            }
            Some(Event::FocusLost) => {
                for pointer in mouse.cancel(now) {
                    controller.on_pointer_event(&pointer);
                }
            }
            Some(_) => {}
        }

        if let Some(enabled) = state.take_mouse_capture_change() {
            driver.set_mouse_capture(enabled)?;
        }
        if let Some(visible) = state.take_overlay_visible_change() {
            controller.set_visible(visible);
        }
        let signals = controller.take_signals();
        state.record_signals(&signals);

        if idle {
            let log_lines = if state.log_visible() {
                log.tail(LOG_TAIL)
            } else {
                Vec::new()
            };
            let view = FrameView {
                surface: controller.surface(),
                visible: controller.is_visible(),
                mode: controller.mode(),
                has_focus: controller.has_focus(),
                last_signal: state.last_signal(),
                signal_count: state.signal_count(),
                log_lines: &log_lines,
                help_visible: state.help_visible(),
            };
            output.draw(|frame| {
                let area = frame.area();
                ui::render_frame(frame.buffer_mut(), area, &view);
            })?;
        }

        Ok(match controller.next_deadline() {
            Some(at) => ControlFlow::WakeAt(at),
            None => ControlFlow::Continue,
        })
    });

    let saved = controller.persisted_geometry();
    controller.on_detach();
    output.exit()?;
    result?;

    if let Some(path) = state_path {
        println!(
            "overlay {}x{} at {},{} saved to {}",
            saved.width,
            saved.height,
            saved.x,
            saved.y,
            path.display()
        );
    }
    Ok(())
}

/// Returns true when the host should quit.
fn handle_key(key: KeyEvent, controller: &mut Controller, state: &mut AppState) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return key.code == KeyCode::Char('c');
    }
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('m') => toggle_bubble(controller),
        KeyCode::Char('f') => {
            let focus = !controller.has_focus();
            if let Err(err) = controller.request_focus(focus) {
                tracing::warn!(error = %err, "focus request rejected");
            }
        }
        KeyCode::Char('v') => state.toggle_overlay_visible(),
        KeyCode::Char('c') => state.toggle_mouse_capture(),
        KeyCode::Char('l') => state.toggle_log_visible(),
        KeyCode::Char('?') => state.toggle_help_visible(),
        KeyCode::Esc if state.help_visible() => state.toggle_help_visible(),
        _ => {}
    }
    false
}

fn toggle_bubble(controller: &mut Controller) {
    match controller.request_toggle_bubble() {
        Ok(mode) => tracing::debug!(?mode, "bubble toggled"),
        Err(err) => tracing::warn!(error = %err, "bubble toggle rejected"),
    }
}

fn control_hit(controller: &Controller, at: Point) -> Option<ControlButton> {
    if !controller.is_visible() || controller.is_collapsed() {
        return None;
    }
    let surface = controller.surface();
    if !surface.controls_visible {
        return None;
    }
    ui::control_at(surface.controls_region()?, at)
}
