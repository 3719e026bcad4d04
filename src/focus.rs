use crate::surface::{DisplayMode, OverlaySurface};

/// Opacity levels keyed by display mode and focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityPolicy {
    pub focused: f32,
    pub unfocused: f32,
    /// Used while interacting, whatever the focus flag says.
    pub moving: f32,
}

impl OpacityPolicy {
    pub fn opacity(&self, mode: DisplayMode, has_focus: bool) -> f32 {
        match (mode, has_focus) {
            (DisplayMode::Interacting, _) => self.moving,
            (_, true) => self.focused,
            (_, false) => self.unfocused,
        }
    }
}

/// Owns the focus flag and decides whether the surface takes input or lets
/// it through to the apps underneath.
///
/// Bubble restoration on focus is the caller's job: the bubble cannot hold
/// focus, so [`crate::controller::FloatController::request_focus`] expands it
/// before delegating here.
#[derive(Debug, Clone)]
pub struct FocusController {
    has_focus: bool,
    policy: OpacityPolicy,
}

impl FocusController {
    pub fn new(policy: OpacityPolicy) -> Self {
        Self {
            has_focus: true,
            policy,
        }
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Pushes the whole focus state to the surface, e.g. after attach.
    pub fn apply<S: OverlaySurface + ?Sized>(&self, mode: DisplayMode, surface: &mut S) {
        surface.set_input_accepting(self.has_focus);
        self.refresh_opacity(mode, surface);
    }

    pub fn refresh_opacity<S: OverlaySurface + ?Sized>(&self, mode: DisplayMode, surface: &mut S) {
        surface.set_opacity(self.policy.opacity(mode, self.has_focus));
    }

    /// Returns whether the flag flipped. Asking for focus while already
    /// focused re-shows the keyboard instead; losing focus never hides it.
    pub fn request_focus<S: OverlaySurface + ?Sized>(
        &mut self,
        focus: bool,
        mode: DisplayMode,
        surface: &mut S,
    ) -> bool {
        if focus == self.has_focus {
            if focus {
                surface.show_keyboard();
            }
            return false;
        }
        self.has_focus = focus;
        tracing::debug!(focus, "overlay focus changed");
        self.apply(mode, surface);
        true
    }

    pub fn reset(&mut self) {
        self.has_focus = true;
    }
}
