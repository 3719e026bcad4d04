use crate::geometry::Geometry;

/// Which of the three presentations the overlay is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Normal,
    /// A move/resize gesture is in progress.
    Interacting,
    Bubble,
}

/// The on-screen window the controller drives.
///
/// Implementations only reflect what they are told; every decision lives in
/// [`crate::controller::FloatController`].
pub trait OverlaySurface {
    fn apply_layout(&mut self, geometry: Geometry);
    /// Swaps background, clip and outline presentation.
    fn apply_style(&mut self, style: DisplayMode);
    /// The presentation currently applied.
    fn style(&self) -> DisplayMode;
    fn set_input_accepting(&mut self, accepting: bool);
    fn set_opacity(&mut self, opacity: f32);
    fn set_controls_visible(&mut self, visible: bool);
    /// Screen rectangle of the minimize/exit affordances, if laid out and shown.
    fn controls_region(&self) -> Option<Geometry>;
    fn show_keyboard(&mut self);
    fn hide_keyboard(&mut self);
}

impl<T: OverlaySurface + ?Sized> OverlaySurface for &mut T {
    fn apply_layout(&mut self, geometry: Geometry) {
        (**self).apply_layout(geometry)
    }

    fn apply_style(&mut self, style: DisplayMode) {
        (**self).apply_style(style)
    }

    fn style(&self) -> DisplayMode {
        (**self).style()
    }

    fn set_input_accepting(&mut self, accepting: bool) {
        (**self).set_input_accepting(accepting)
    }

    fn set_opacity(&mut self, opacity: f32) {
        (**self).set_opacity(opacity)
    }

    fn set_controls_visible(&mut self, visible: bool) {
        (**self).set_controls_visible(visible)
    }

    fn controls_region(&self) -> Option<Geometry> {
        (**self).controls_region()
    }

    fn show_keyboard(&mut self) {
        (**self).show_keyboard()
    }

    fn hide_keyboard(&mut self) {
        (**self).hide_keyboard()
    }
}

/// Height of the controls strip along the top edge of a [`HeadlessSurface`].
pub const HEADLESS_CONTROLS_HEIGHT: i32 = 1;

/// A surface without a display: records whatever was applied to it.
///
/// Used by the terminal host as the model it renders from and by the replay
/// tool and tests as the observation point. The controls strip occupies the
/// top row(s) of the right half of the window.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    pub layout: Option<Geometry>,
    pub style: DisplayMode,
    pub input_accepting: bool,
    pub opacity: f32,
    pub controls_visible: bool,
    pub keyboard_visible: bool,
    pub layout_updates: usize,
    controls_height: i32,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            layout: None,
            style: DisplayMode::Normal,
            input_accepting: false,
            opacity: 1.0,
            controls_visible: true,
            keyboard_visible: false,
            layout_updates: 0,
            controls_height: HEADLESS_CONTROLS_HEIGHT,
        }
    }

    pub fn with_controls_height(mut self, height: i32) -> Self {
        self.controls_height = height.max(0);
        self
    }
}

impl OverlaySurface for HeadlessSurface {
    fn apply_layout(&mut self, geometry: Geometry) {
        self.layout = Some(geometry);
        self.layout_updates += 1;
    }

    fn apply_style(&mut self, style: DisplayMode) {
        self.style = style;
    }

    fn style(&self) -> DisplayMode {
        self.style
    }

    fn set_input_accepting(&mut self, accepting: bool) {
        self.input_accepting = accepting;
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn set_controls_visible(&mut self, visible: bool) {
        self.controls_visible = visible;
    }

    fn controls_region(&self) -> Option<Geometry> {
        let layout = self.layout?;
        if !self.controls_visible || self.controls_height == 0 || layout.width < 2 {
            return None;
        }
        let half = layout.width / 2;
        Some(Geometry::new(
            layout.x + layout.width - half,
            layout.y,
            half,
            self.controls_height.min(layout.height),
        ))
    }

    fn show_keyboard(&mut self) {
        self.keyboard_visible = true;
    }

    fn hide_keyboard(&mut self) {
        self.keyboard_visible = false;
    }
}
