use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use serde::{Deserialize, Serialize};

use term_float::{
    DisplayMode, FloatController, Geometry, GestureSignal, HeadlessSurface, MemoryStore,
    OverlayConfig, OverlayError, OverlayResult, PointerEvent, ScreenBounds, tracing_sub,
};

#[derive(Parser, Debug)]
#[command(
    name = "float-replay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replay a JSON gesture script through a headless overlay controller"
)]
struct ReplayCli {
    /// Script to replay.
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    #[arg(long, value_name = "PX", default_value_t = 50)]
    min_dimension: i32,

    #[arg(long, value_name = "PX", default_value_t = 56)]
    bubble_diameter: i32,

    #[arg(long = "long-press-ms", value_name = "MS", default_value_t = 500)]
    long_press_ms: u64,

    #[arg(long, value_name = "PX", default_value_t = 8)]
    touch_slop: i32,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Log controller decisions to stderr.
    #[arg(short, long)]
    verbose: bool,
}

struct ReplayConfig {
    overlay: OverlayConfig,
    json: bool,
    verbose: bool,
}

impl TryFrom<&ReplayCli> for ReplayConfig {
    type Error = String;

    fn try_from(cli: &ReplayCli) -> Result<Self, Self::Error> {
        if !(1..=10_000).contains(&cli.min_dimension) {
            return Err("min-dimension must be between 1 and 10000".to_string());
        }
        if !(1..=10_000).contains(&cli.bubble_diameter) {
            return Err("bubble-diameter must be between 1 and 10000".to_string());
        }
        if !(1..=10_000).contains(&cli.long_press_ms) {
            return Err("long-press-ms must be between 1 and 10000".to_string());
        }
        if !(0..=1_000).contains(&cli.touch_slop) {
            return Err("touch-slop must be between 0 and 1000".to_string());
        }
        Ok(Self {
            overlay: OverlayConfig {
                min_dimension: cli.min_dimension,
                bubble_diameter: cli.bubble_diameter,
                long_press_timeout: Duration::from_millis(cli.long_press_ms),
                touch_slop: cli.touch_slop,
                ..OverlayConfig::default()
            },
            json: cli.json,
            verbose: cli.verbose,
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ScreenSpec {
    width: i32,
    height: i32,
}

#[derive(Debug, Deserialize)]
struct Script {
    /// Attach without bounds when absent.
    screen: Option<ScreenSpec>,
    /// Geometry already in the store before the controller starts.
    geometry: Option<Geometry>,
    steps: Vec<Step>,
}

/// Times are milliseconds from the start of the replay.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Down {
        pointer: u32,
        x: i32,
        y: i32,
        #[serde(default)]
        at_ms: u64,
    },
    Move {
        pointer: u32,
        x: i32,
        y: i32,
        #[serde(default)]
        at_ms: u64,
    },
    Up {
        pointer: u32,
        x: i32,
        y: i32,
        #[serde(default)]
        at_ms: u64,
    },
    Cancel {
        pointer: u32,
        #[serde(default)]
        at_ms: u64,
    },
    Tick {
        at_ms: u64,
    },
    Toggle,
    Focus {
        focus: bool,
    },
    Bounds {
        width: i32,
        height: i32,
    },
    Hide,
    Show,
    Detach,
    Attach,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
struct SignalCounts {
    geometry_changed: usize,
    long_press_begin: usize,
    interaction_ended: usize,
    inside_tap: usize,
    outside_tap: usize,
}

impl SignalCounts {
    fn record(&mut self, signal: GestureSignal) {
        match signal {
            GestureSignal::GeometryChanged(_) => self.geometry_changed += 1,
            GestureSignal::LongPressBegin { .. } => self.long_press_begin += 1,
            GestureSignal::InteractionEnded => self.interaction_ended += 1,
            GestureSignal::InsideTap => self.inside_tap += 1,
            GestureSignal::OutsideTap => self.outside_tap += 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    attached: bool,
    screen: Option<(i32, i32)>,
    geometry: Geometry,
    mode: String,
    has_focus: bool,
    collapsed: bool,
    persisted: Option<Geometry>,
    saves: usize,
    rejected: usize,
    signals: SignalCounts,
}

impl Report {
    fn render_text(&self) -> String {
        let persisted = self
            .persisted
            .map(|g| format!("{}x{} at {},{}", g.width, g.height, g.x, g.y))
            .unwrap_or_else(|| "nothing".to_string());
        let screen = match (self.attached, self.screen) {
            (false, _) => "detached".to_string(),
            (true, Some((w, h))) => format!("{w}x{h}"),
            (true, None) => "unknown".to_string(),
        };
        indoc::formatdoc!(
            r#"
            Replay finished in {mode} mode.
            Screen: {screen}
            Geometry: {w}x{h} at {x},{y} | focus: {focus} | collapsed: {collapsed}
            Persisted: {persisted} ({saves} writes)
            Signals: {moved} geometry, {began} long-press, {ended} ended, {inside} inside taps, {outside} outside taps
            Rejected requests: {rejected}
            "#,
            mode = self.mode,
            screen = screen,
            w = self.geometry.width,
            h = self.geometry.height,
            x = self.geometry.x,
            y = self.geometry.y,
            focus = self.has_focus,
            collapsed = self.collapsed,
            persisted = persisted,
            saves = self.saves,
            moved = self.signals.geometry_changed,
            began = self.signals.long_press_begin,
            ended = self.signals.interaction_ended,
            inside = self.signals.inside_tap,
            outside = self.signals.outside_tap,
            rejected = self.rejected,
        )
    }
}

fn main() -> io::Result<()> {
    let args = ReplayCli::parse();
    let config = ReplayConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    if config.verbose {
        tracing_sub::init_default();
    }

    let raw = fs::read_to_string(&args.script)?;
    let script: Script = serde_json::from_str(&raw)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    let report = replay(&script, config.overlay).map_err(io::Error::other)?;

    if config.json {
        let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
        println!("{json}");
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

fn screen_bounds(spec: Option<ScreenSpec>) -> Option<ScreenBounds> {
    spec.and_then(|s| ScreenBounds::new(s.width, s.height).ok())
}

fn replay(script: &Script, config: OverlayConfig) -> OverlayResult<Report> {
    let store = match script.geometry {
        Some(geometry) => MemoryStore::with_geometry(geometry),
        None => MemoryStore::new(),
    };
    let mut controller = FloatController::new(config, HeadlessSurface::new(), store)?;
    let mut bounds = screen_bounds(script.screen);
    let mut rejected = 0;
    let mut signals = SignalCounts::default();

    attach(&mut controller, bounds);
    let start = Instant::now();
    let at = |ms: u64| start + Duration::from_millis(ms);

    for step in &script.steps {
        tracing::debug!(?step, "replaying");
        let outcome = match *step {
            Step::Down { pointer, x, y, at_ms } => {
                controller.on_pointer_event(&PointerEvent::down(pointer, x, y, at(at_ms)));
                Ok(())
            }
            Step::Move { pointer, x, y, at_ms } => {
                controller.on_pointer_event(&PointerEvent::moved(pointer, x, y, at(at_ms)));
                Ok(())
            }
            Step::Up { pointer, x, y, at_ms } => {
                controller.on_pointer_event(&PointerEvent::up(pointer, x, y, at(at_ms)));
                Ok(())
            }
            Step::Cancel { pointer, at_ms } => {
                controller.on_pointer_event(&PointerEvent::cancel(pointer, at(at_ms)));
                Ok(())
            }
            Step::Tick { at_ms } => {
                controller.tick(at(at_ms));
                Ok(())
            }
            Step::Toggle => controller.request_toggle_bubble().map(|_| ()),
            Step::Focus { focus } => controller.request_focus(focus),
            Step::Bounds { width, height } => ScreenBounds::new(width, height).map(|b| {
                bounds = Some(b);
                controller.on_bounds_changed(b);
            }),
            Step::Hide => {
                controller.set_visible(false);
                Ok(())
            }
            Step::Show => {
                controller.set_visible(true);
                Ok(())
            }
            Step::Detach => {
                controller.on_detach();
                Ok(())
            }
            Step::Attach => {
                attach(&mut controller, bounds);
                Ok(())
            }
        };
        if let Err(err) = outcome {
            tracing::debug!(error = %err, ?step, "step rejected");
            rejected += 1;
        }
        for signal in controller.take_signals() {
            signals.record(signal);
        }
    }

    Ok(Report {
        attached: controller.is_attached(),
        screen: controller.bounds().map(|b| (b.width, b.height)),
        geometry: controller.geometry(),
        mode: format!("{:?}", controller.mode()),
        has_focus: controller.has_focus(),
        collapsed: controller.is_collapsed(),
        persisted: controller.store().geometry(),
        saves: controller.store().save_count(),
        rejected,
        signals,
    })
}

fn attach(
    controller: &mut FloatController<HeadlessSurface, MemoryStore>,
    bounds: Option<ScreenBounds>,
) {
    match controller.on_attach(bounds) {
        Ok(()) | Err(OverlayError::BoundsUnavailable) => {}
        Err(err) => tracing::warn!(error = %err, "attach failed"),
    }
}
