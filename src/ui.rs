//! Terminal rendering for the demo host.
//!
//! Everything here reads a [`HeadlessSurface`] that the controller has
//! already driven, so what is drawn is exactly what the controller applied.
//! Geometry is signed and may drift past the terminal while bounds are
//! unknown; every draw is clipped to the frame area first.

use indoc::indoc;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};

use crate::geometry::{Geometry, Point};
use crate::gesture::GestureSignal;
use crate::surface::{DisplayMode, HeadlessSurface, OverlaySurface};

pub const HELP_TEXT: &str = indoc! {"
    click inside       focus the overlay
    click outside      let input through
    hold still         start a move
    drag while moving  move the overlay
    wheel while moving resize (pinch)
    [_] / m            bubble on / off
    [x] / q            quit
    f                  toggle focus
    v                  hide / show overlay
    c                  toggle mouse capture
    l                  toggle log
    ?                  close this help
"};

const LOG_ROWS: u16 = 5;

/// The two affordances in the controls strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlButton {
    Minimize,
    Exit,
}

/// Left half of the strip minimizes, right half exits.
pub fn control_at(region: Geometry, point: Point) -> Option<ControlButton> {
    if !region.contains(point) {
        return None;
    }
    if point.x < region.x + region.width / 2 {
        Some(ControlButton::Minimize)
    } else {
        Some(ControlButton::Exit)
    }
}

/// Everything one frame needs besides the buffer.
pub struct FrameView<'a> {
    pub surface: &'a HeadlessSurface,
    pub visible: bool,
    pub mode: DisplayMode,
    pub has_focus: bool,
    pub last_signal: Option<GestureSignal>,
    pub signal_count: usize,
    pub log_lines: &'a [String],
    pub help_visible: bool,
}

pub fn render_frame(buffer: &mut Buffer, area: Rect, view: &FrameView<'_>) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    render_status(buffer, area, view);
    if !view.log_lines.is_empty() {
        render_log(buffer, area, view.log_lines);
    }
    if view.visible {
        render_overlay(buffer, area, view.surface);
    }
    if view.help_visible {
        render_help(buffer, area);
    }
}

/// Clips a signed geometry to `area`.
pub fn clip_to_area(geometry: Geometry, area: Rect) -> Option<Rect> {
    let x0 = geometry.x.max(i32::from(area.x));
    let y0 = geometry.y.max(i32::from(area.y));
    let x1 = (geometry.x + geometry.width).min(i32::from(area.x) + i32::from(area.width));
    let y1 = (geometry.y + geometry.height).min(i32::from(area.y) + i32::from(area.height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect {
        x: u16::try_from(x0).ok()?,
        y: u16::try_from(y0).ok()?,
        width: u16::try_from(x1 - x0).ok()?,
        height: u16::try_from(y1 - y0).ok()?,
    })
}

/// Terminals have no alpha; lower opacity reads as dimmer.
fn opacity_style(base: Style, opacity: f32) -> Style {
    if opacity >= 0.85 {
        base
    } else if opacity >= 0.6 {
        base.add_modifier(Modifier::DIM)
    } else {
        base.fg(Color::DarkGray).add_modifier(Modifier::DIM)
    }
}

pub fn render_overlay(buffer: &mut Buffer, area: Rect, surface: &HeadlessSurface) {
    let Some(layout) = surface.layout else {
        return;
    };
    let Some(rect) = clip_to_area(layout, area) else {
        return;
    };
    Clear.render(rect, buffer);

    let (border, color) = match surface.style() {
        DisplayMode::Normal => (BorderType::Plain, Color::White),
        DisplayMode::Interacting => (BorderType::Double, Color::Yellow),
        DisplayMode::Bubble => (BorderType::Rounded, Color::Cyan),
    };
    let color = if surface.input_accepting || surface.style() != DisplayMode::Normal {
        color
    } else {
        Color::Gray
    };
    let style = opacity_style(Style::default().fg(color), surface.opacity);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(border)
        .border_style(style);
    if surface.style() != DisplayMode::Bubble {
        block = block.title(" float ");
    }
    let inner = block.inner(rect);
    block.render(rect, buffer);

    match surface.style() {
        DisplayMode::Bubble => {
            if inner.width > 0 && inner.height > 0 {
                let x = inner.x + inner.width / 2;
                let y = inner.y + inner.height / 2;
                safe_set_string(buffer, inner, x, y, "◉", style);
            }
        }
        DisplayMode::Interacting => {
            Paragraph::new("drag to move\nwheel to resize")
                .style(style)
                .render(inner, buffer);
        }
        DisplayMode::Normal => {
            let text = if surface.input_accepting {
                "input goes to the overlay"
            } else {
                "input passes through"
            };
            Paragraph::new(text).style(style).render(inner, buffer);
        }
    }

    if surface.controls_visible
        && let Some(region) = surface.controls_region()
        && let Some(strip) = clip_to_area(region, area)
    {
        let half = region.width / 2;
        let minimize = Point::new(region.x + half / 2, region.y);
        let exit = Point::new(region.x + half + (region.width - half) / 2, region.y);
        for (at, label) in [(minimize, "_"), (exit, "x")] {
            if let (Ok(x), Ok(y)) = (u16::try_from(at.x), u16::try_from(at.y)) {
                safe_set_string(buffer, strip, x, y, label, style.add_modifier(Modifier::BOLD));
            }
        }
    }
}

fn render_status(buffer: &mut Buffer, area: Rect, view: &FrameView<'_>) {
    let y = area.y + area.height - 1;
    let geometry = view
        .surface
        .layout
        .map(|g| format!("{}x{} @ {},{}", g.width, g.height, g.x, g.y))
        .unwrap_or_else(|| "no layout".to_string());
    let last = view
        .last_signal
        .map(|s| format!("{s:?}"))
        .unwrap_or_else(|| "-".to_string());
    let line = format!(
        " {:?} | {} | {} | kbd {} | signals {} (last {}) | ? help ",
        view.mode,
        geometry,
        if view.has_focus { "focused" } else { "passthrough" },
        if view.surface.keyboard_visible { "on" } else { "off" },
        view.signal_count,
        last,
    );
    let style = Style::default().fg(Color::Black).bg(Color::Gray);
    for x in area.x..area.x + area.width {
        if let Some(cell) = buffer.cell_mut((x, y)) {
            cell.reset();
            cell.set_style(style);
        }
    }
    safe_set_string(buffer, area, area.x, y, &line, style);
}

fn render_log(buffer: &mut Buffer, area: Rect, lines: &[String]) {
    let rows = LOG_ROWS.min(area.height.saturating_sub(1));
    if rows == 0 {
        return;
    }
    let top = area.y + area.height - 1 - rows;
    let skip = lines.len().saturating_sub(usize::from(rows));
    let style = Style::default().fg(Color::DarkGray);
    for (offset, line) in lines.iter().skip(skip).enumerate() {
        let Ok(offset) = u16::try_from(offset) else {
            break;
        };
        safe_set_string(buffer, area, area.x, top + offset, line, style);
    }
}

fn render_help(buffer: &mut Buffer, area: Rect) {
    let lines = HELP_TEXT.lines().count() as u16;
    let width = HELP_TEXT
        .lines()
        .map(|l| l.chars().count() as u16)
        .max()
        .unwrap_or(0)
        .saturating_add(4)
        .min(area.width);
    let height = lines.saturating_add(2).min(area.height);
    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    Clear.render(rect, buffer);
    let block = Block::default().title(" help ").borders(Borders::ALL);
    let inner = block.inner(rect);
    block.render(rect, buffer);
    Paragraph::new(HELP_TEXT).render(inner, buffer);
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = usize::from(max_x - x);
    let text: String = text.chars().take(available).collect();
    buffer.set_string(x, y, text, style);
}
