use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, trace, warn};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::monitor::VideoMode;
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowBuilder};

use crate::animation::{aspect_ratio, compute_params};
use crate::fps::FpsOverlay;
use crate::gpu::{FrameRecovery, GpuState};
use crate::runtime::{BoxedTimeSource, SystemTimeSource};
use crate::state::{ControlKey, DisplayHost, KeyAction, KeyInput, LoopPhase, RuntimeState};
use crate::text::LabelRasterizer;
use crate::types::RendererConfig;

/// Upper bound on how long a minimised window blocks waiting for events.
const MINIMISED_PUMP_TIMEOUT: Duration = Duration::from_millis(16);

/// Window events the loop cares about, queued during a pump and applied in
/// arrival order afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingEvent {
    Close,
    Key(KeyInput),
}

/// The live winit window seen through [`DisplayHost`].
pub(crate) struct WindowHost {
    window: Arc<Window>,
    last_position: (i32, i32),
}

impl WindowHost {
    fn new(window: Arc<Window>, initial_position: (i32, i32)) -> Self {
        Self {
            window,
            last_position: initial_position,
        }
    }
}

impl DisplayHost for WindowHost {
    fn window_position(&self) -> (i32, i32) {
        match self.window.outer_position() {
            Ok(position) => (position.x, position.y),
            Err(err) => {
                // Wayland never reports window positions.
                debug!(error = %err, "window position unavailable; using last known");
                self.last_position
            }
        }
    }

    fn window_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn enter_fullscreen(&mut self) {
        let mode = self.window.primary_monitor().and_then(|monitor| {
            let modes: Vec<VideoMode> = monitor.video_modes().collect();
            let keys: Vec<_> = modes
                .iter()
                .map(|mode| (mode.size(), mode.refresh_rate_millihertz()))
                .collect();
            native_mode_index(&keys, monitor.size(), monitor.refresh_rate_millihertz())
                .and_then(|index| modes.into_iter().nth(index))
        });

        match mode {
            Some(mode) => {
                info!(
                    width = mode.size().width,
                    height = mode.size().height,
                    refresh_mhz = mode.refresh_rate_millihertz(),
                    "switching to exclusive fullscreen"
                );
                self.window
                    .set_fullscreen(Some(Fullscreen::Exclusive(mode)));
            }
            None => {
                warn!("no primary monitor video mode; using borderless fullscreen");
                self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }

    fn restore_windowed(&mut self, position: (i32, i32), size: (u32, u32)) {
        self.window.set_fullscreen(None);
        self.window
            .set_outer_position(PhysicalPosition::new(position.0, position.1));
        // Most platforms resize asynchronously and report it via `Resized`.
        if let Some(applied) = self
            .window
            .request_inner_size(PhysicalSize::new(size.0, size.1))
        {
            debug!(
                width = applied.width,
                height = applied.height,
                "window size applied immediately"
            );
        }
        self.last_position = position;
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        if captured {
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                warn!(error = %err, "failed to capture cursor");
            }
            self.window.set_cursor_visible(false);
        } else {
            if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
                warn!(error = %err, "failed to release cursor");
            }
            self.window.set_cursor_visible(true);
        }
    }
}

/// Picks the video mode matching the monitor's native size and its current
/// refresh rate. Falls back to the fastest native-size mode when the monitor
/// reports no rate or no mode carries it.
fn native_mode_index(
    modes: &[(PhysicalSize<u32>, u32)],
    native_size: PhysicalSize<u32>,
    current_refresh_mhz: Option<u32>,
) -> Option<usize> {
    let native = || {
        modes
            .iter()
            .enumerate()
            .filter(move |(_, (size, _))| *size == native_size)
    };
    current_refresh_mhz
        .and_then(|rate| native().find(|(_, (_, refresh))| *refresh == rate))
        .or_else(|| native().max_by_key(|(_, (_, refresh))| *refresh))
        .map(|(index, _)| index)
}

/// Pump timeout and control flow for the next iteration. A minimised window
/// waits for events instead of spinning.
fn pump_schedule(minimised: bool) -> (Duration, ControlFlow) {
    if minimised {
        (MINIMISED_PUMP_TIMEOUT, ControlFlow::Wait)
    } else {
        (Duration::ZERO, ControlFlow::Poll)
    }
}

/// Applies queued window events to the controller in arrival order.
///
/// Every event in the batch is applied even after a close request; the loop
/// checks the phase once the batch is drained.
fn apply_events<H: DisplayHost + ?Sized>(
    state: &mut RuntimeState,
    events: impl IntoIterator<Item = PendingEvent>,
    host: &mut H,
) {
    for event in events {
        match event {
            PendingEvent::Close => state.request_close(),
            PendingEvent::Key(input) => state.handle_key(input, host),
        }
    }
}

fn control_key(key: PhysicalKey) -> ControlKey {
    match key {
        PhysicalKey::Code(KeyCode::Escape) => ControlKey::Escape,
        PhysicalKey::Code(KeyCode::KeyS) => ControlKey::ToggleOverlay,
        PhysicalKey::Code(KeyCode::KeyF) => ControlKey::ToggleFullscreen,
        _ => ControlKey::Other,
    }
}

fn key_action(state: ElementState, repeat: bool) -> KeyAction {
    match state {
        ElementState::Pressed if repeat => KeyAction::Repeat,
        ElementState::Pressed => KeyAction::Press,
        ElementState::Released => KeyAction::Release,
    }
}

fn key_input(event: &KeyEvent) -> KeyInput {
    KeyInput {
        key: control_key(event.physical_key),
        action: key_action(event.state, event.repeat),
    }
}

/// Opens the window and drives frames until a close is requested.
pub(crate) fn run(config: RendererConfig) -> Result<()> {
    let mut event_loop = EventLoopBuilder::new()
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(
            config.window_size.0,
            config.window_size.1,
        ))
        .with_position(PhysicalPosition::new(
            config.window_position.0,
            config.window_position.1,
        ))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);
    let window_id = window.id();

    let mut gpu = GpuState::new(window.clone(), &config).context("failed to initialise renderer")?;
    let mut host = WindowHost::new(window.clone(), config.window_position);
    let mut state = RuntimeState::new(config.window_position, config.window_size);
    let mut fps = FpsOverlay::new(LabelRasterizer::load(&config.overlay), Instant::now());
    let mut clock: BoxedTimeSource = Box::new(SystemTimeSource::new());
    let mut pending = Vec::new();
    let mut minimised = false;

    info!(
        width = config.window_size.0,
        height = config.window_size.1,
        title = %config.title,
        "viewer running; Esc quits, S toggles FPS, F toggles fullscreen"
    );

    let result = loop {
        let (timeout, control_flow) = pump_schedule(minimised);
        let status = event_loop.pump_events(Some(timeout), |event, elwt| {
            elwt.set_control_flow(control_flow);
            if let Event::WindowEvent {
                window_id: id,
                event,
            } = event
            {
                if id != window_id {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        pending.push(PendingEvent::Close);
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        pending.push(PendingEvent::Key(key_input(&event)));
                    }
                    _ => {}
                }
            }
        });
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop exited");
            state.request_close();
        }

        apply_events(&mut state, pending.drain(..), &mut host);
        if state.phase() == LoopPhase::Closing {
            break Ok(());
        }

        let size = window.inner_size();
        minimised = size.width == 0 || size.height == 0;
        if minimised {
            trace!("framebuffer has zero area; skipping frame");
            continue;
        }
        gpu.resize(size);

        let frame = match gpu.acquire() {
            Ok(frame) => frame,
            Err(err) => match err.recovery() {
                FrameRecovery::Reconfigure => {
                    debug!(error = %err, "reconfiguring surface");
                    gpu.reconfigure();
                    continue;
                }
                FrameRecovery::Skip => {
                    warn!(error = %err, "skipping frame");
                    continue;
                }
                FrameRecovery::Fatal => {
                    break Err(anyhow::Error::new(err).context("failed to acquire frame"));
                }
            },
        };

        let sample = clock.sample();
        let params = compute_params(sample.seconds, aspect_ratio(size.width, size.height));
        let label = fps.tick(sample.now, state.overlay_enabled());
        gpu.render(frame, &params, label.as_ref(), state.overlay_enabled());
    };

    // The surface must go before the window it was created from.
    drop(gpu);
    drop(host);
    drop(window);
    info!("viewer closed");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_keys_map_to_controls() {
        assert_eq!(
            control_key(PhysicalKey::Code(KeyCode::Escape)),
            ControlKey::Escape
        );
        assert_eq!(
            control_key(PhysicalKey::Code(KeyCode::KeyS)),
            ControlKey::ToggleOverlay
        );
        assert_eq!(
            control_key(PhysicalKey::Code(KeyCode::KeyF)),
            ControlKey::ToggleFullscreen
        );
        assert_eq!(
            control_key(PhysicalKey::Code(KeyCode::Space)),
            ControlKey::Other
        );
    }

    #[test]
    fn held_keys_report_repeats() {
        assert_eq!(key_action(ElementState::Pressed, false), KeyAction::Press);
        assert_eq!(key_action(ElementState::Pressed, true), KeyAction::Repeat);
        assert_eq!(key_action(ElementState::Released, false), KeyAction::Release);
    }

    #[derive(Default)]
    struct FakeHost {
        position: (i32, i32),
        size: (u32, u32),
        fullscreen: bool,
        calls: Vec<&'static str>,
    }

    impl DisplayHost for FakeHost {
        fn window_position(&self) -> (i32, i32) {
            self.position
        }

        fn window_size(&self) -> (u32, u32) {
            self.size
        }

        fn enter_fullscreen(&mut self) {
            self.calls.push("enter");
            self.fullscreen = true;
            self.size = (1920, 1080);
        }

        fn restore_windowed(&mut self, position: (i32, i32), size: (u32, u32)) {
            self.calls.push("restore");
            self.fullscreen = false;
            self.position = position;
            self.size = size;
        }

        fn set_cursor_captured(&mut self, captured: bool) {
            self.calls.push(if captured { "capture" } else { "release" });
        }
    }

    fn press(key: ControlKey) -> PendingEvent {
        PendingEvent::Key(KeyInput::press(key))
    }

    #[test]
    fn events_apply_in_arrival_order() {
        let mut state = RuntimeState::new((100, 100), (800, 600));
        let mut host = FakeHost {
            position: (100, 100),
            size: (800, 600),
            ..FakeHost::default()
        };
        apply_events(
            &mut state,
            [
                press(ControlKey::ToggleFullscreen),
                press(ControlKey::ToggleOverlay),
                press(ControlKey::ToggleFullscreen),
            ],
            &mut host,
        );
        assert_eq!(host.calls, ["enter", "capture", "restore", "release"]);
        assert!(state.overlay_enabled());
        assert!(!state.is_fullscreen());
        assert_eq!(state.phase(), LoopPhase::Running);
    }

    #[test]
    fn close_mid_batch_moves_to_closing() {
        let mut state = RuntimeState::new((100, 100), (800, 600));
        let mut host = FakeHost::default();
        apply_events(
            &mut state,
            [
                press(ControlKey::ToggleOverlay),
                PendingEvent::Close,
                press(ControlKey::Other),
            ],
            &mut host,
        );
        assert_eq!(state.phase(), LoopPhase::Closing);
        assert!(state.overlay_enabled());
    }

    #[test]
    fn keys_after_close_in_same_batch_still_apply() {
        let mut state = RuntimeState::new((100, 100), (800, 600));
        let mut host = FakeHost {
            position: (100, 100),
            size: (800, 600),
            ..FakeHost::default()
        };
        apply_events(
            &mut state,
            [PendingEvent::Close, press(ControlKey::ToggleFullscreen)],
            &mut host,
        );
        assert_eq!(state.phase(), LoopPhase::Closing);
        assert!(state.is_fullscreen());
        assert!(host.fullscreen);
    }

    #[test]
    fn minimised_window_waits_for_events() {
        assert_eq!(
            pump_schedule(true),
            (MINIMISED_PUMP_TIMEOUT, ControlFlow::Wait)
        );
        assert!(MINIMISED_PUMP_TIMEOUT > Duration::ZERO);
        assert_eq!(pump_schedule(false), (Duration::ZERO, ControlFlow::Poll));
    }

    fn mode(width: u32, height: u32, refresh_mhz: u32) -> (PhysicalSize<u32>, u32) {
        (PhysicalSize::new(width, height), refresh_mhz)
    }

    #[test]
    fn fullscreen_keeps_current_refresh_rate() {
        let modes = [
            mode(1920, 1080, 144_000),
            mode(2560, 1440, 144_000),
            mode(2560, 1440, 60_000),
        ];
        let native = PhysicalSize::new(2560, 1440);
        assert_eq!(native_mode_index(&modes, native, Some(60_000)), Some(2));
    }

    #[test]
    fn unknown_refresh_rate_uses_fastest_native_mode() {
        let modes = [
            mode(2560, 1440, 60_000),
            mode(2560, 1440, 120_000),
            mode(3840, 2160, 240_000),
        ];
        let native = PhysicalSize::new(2560, 1440);
        assert_eq!(native_mode_index(&modes, native, None), Some(1));
        assert_eq!(native_mode_index(&modes, native, Some(75_000)), Some(1));
    }

    #[test]
    fn no_native_size_mode_means_borderless() {
        let modes = [mode(1280, 720, 60_000)];
        assert_eq!(
            native_mode_index(&modes, PhysicalSize::new(2560, 1440), Some(60_000)),
            None
        );
    }
}
