use tracing::info;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Escape,
    ToggleOverlay,
    ToggleFullscreen,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

/// A discrete keyboard event drained from the window for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: ControlKey,
    pub action: KeyAction,
}

impl KeyInput {
    pub fn press(key: ControlKey) -> Self {
        Self {
            key,
            action: KeyAction::Press,
        }
    }
}

/// Window operations the controller needs.
///
/// The frame loop implements this over the live winit window; tests drive the
/// controller with an in-memory host.
pub trait DisplayHost {
    /// Outer window position in physical pixels.
    fn window_position(&self) -> (i32, i32);
    /// Inner window size in physical pixels.
    fn window_size(&self) -> (u32, u32);
    /// Switches to the primary display's native mode.
    fn enter_fullscreen(&mut self);
    /// Leaves fullscreen and places the window at `position` with `size`.
    fn restore_windowed(&mut self, position: (i32, i32), size: (u32, u32));
    /// Hides and locks the pointer when `captured`, releases it otherwise.
    fn set_cursor_captured(&mut self, captured: bool);
}

/// Whether the frame loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Running,
    Closing,
}

/// Mutable viewer state, changed only between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeState {
    is_fullscreen: bool,
    windowed_position: (i32, i32),
    windowed_size: (u32, u32),
    overlay_enabled: bool,
    close_requested: bool,
}

impl RuntimeState {
    pub fn new(windowed_position: (i32, i32), windowed_size: (u32, u32)) -> Self {
        Self {
            is_fullscreen: false,
            windowed_position,
            windowed_size,
            overlay_enabled: false,
            close_requested: false,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn windowed_position(&self) -> (i32, i32) {
        self.windowed_position
    }

    pub fn windowed_size(&self) -> (u32, u32) {
        self.windowed_size
    }

    pub fn overlay_enabled(&self) -> bool {
        self.overlay_enabled
    }

    pub fn phase(&self) -> LoopPhase {
        if self.close_requested {
            LoopPhase::Closing
        } else {
            LoopPhase::Running
        }
    }

    /// Records a close request from the window system.
    pub fn request_close(&mut self) {
        if !self.close_requested {
            info!("close requested");
        }
        self.close_requested = true;
    }

    /// Applies one key event. Repeats, releases and unbound keys are ignored.
    pub fn handle_key<H: DisplayHost + ?Sized>(&mut self, input: KeyInput, host: &mut H) {
        if input.action != KeyAction::Press {
            return;
        }
        match input.key {
            ControlKey::Escape => self.request_close(),
            ControlKey::ToggleOverlay => {
                self.overlay_enabled = !self.overlay_enabled;
                info!(enabled = self.overlay_enabled, "fps overlay toggled");
            }
            ControlKey::ToggleFullscreen => self.toggle_fullscreen(host),
            ControlKey::Other => {}
        }
    }

    fn toggle_fullscreen<H: DisplayHost + ?Sized>(&mut self, host: &mut H) {
        if self.is_fullscreen {
            host.restore_windowed(self.windowed_position, self.windowed_size);
            host.set_cursor_captured(false);
            self.is_fullscreen = false;
            info!(
                x = self.windowed_position.0,
                y = self.windowed_position.1,
                width = self.windowed_size.0,
                height = self.windowed_size.1,
                "left fullscreen"
            );
        } else {
            // Must be read before the mode switch changes the geometry.
            self.windowed_position = host.window_position();
            self.windowed_size = host.window_size();
            host.enter_fullscreen();
            host.set_cursor_captured(true);
            self.is_fullscreen = true;
            info!(
                saved_x = self.windowed_position.0,
                saved_y = self.windowed_position.1,
                saved_width = self.windowed_size.0,
                saved_height = self.windowed_size.1,
                "entered fullscreen"
            );
        }
    }
}
