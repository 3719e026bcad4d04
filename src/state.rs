use crate::gesture::GestureSignal;

/// Host-side toggles for the terminal demo. Changes the host has to push
/// somewhere else (mouse capture, overlay visibility) are latched until
/// taken.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppState {
    mouse_capture_enabled: bool,
    mouse_capture_dirty: bool,
    overlay_visible: bool,
    overlay_visible_dirty: bool,
    help_visible: bool,
    log_visible: bool,
    last_signal: Option<GestureSignal>,
    signal_count: usize,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mouse_capture_enabled: true,
            overlay_visible: true,
            log_visible: true,
            ..Self::default()
        }
    }

    pub fn mouse_capture_enabled(&self) -> bool {
        self.mouse_capture_enabled
    }

    pub fn set_mouse_capture_enabled(&mut self, enabled: bool) {
        if self.mouse_capture_enabled == enabled {
            return;
        }
        self.mouse_capture_enabled = enabled;
        self.mouse_capture_dirty = true;
    }

    pub fn toggle_mouse_capture(&mut self) {
        self.set_mouse_capture_enabled(!self.mouse_capture_enabled);
    }

    pub fn take_mouse_capture_change(&mut self) -> Option<bool> {
        if self.mouse_capture_dirty {
            self.mouse_capture_dirty = false;
            Some(self.mouse_capture_enabled)
        } else {
            None
        }
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn toggle_overlay_visible(&mut self) {
        self.overlay_visible = !self.overlay_visible;
        self.overlay_visible_dirty = true;
    }

    pub fn take_overlay_visible_change(&mut self) -> Option<bool> {
        if self.overlay_visible_dirty {
            self.overlay_visible_dirty = false;
            Some(self.overlay_visible)
        } else {
            None
        }
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn toggle_help_visible(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn log_visible(&self) -> bool {
        self.log_visible
    }

    pub fn toggle_log_visible(&mut self) {
        self.log_visible = !self.log_visible;
    }

    pub fn record_signals(&mut self, signals: &[GestureSignal]) {
        if let Some(last) = signals.last() {
            self.last_signal = Some(*last);
        }
        self.signal_count += signals.len();
    }

    pub fn last_signal(&self) -> Option<GestureSignal> {
        self.last_signal
    }

    pub fn signal_count(&self) -> usize {
        self.signal_count
    }
}
