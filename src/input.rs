//! Input aggregation
//!
//! Merges keyboard state and (when present) the first connected gamepad into
//! one [`TickInput`] per simulation step. Keyboard works standalone; a missing
//! or disconnected gamepad is simply absent, never an error.

use glam::Vec2;

use crate::sim::TickInput;

/// Analog stick deflection below this is treated as centered
pub const STICK_DEADZONE: f32 = 0.2;
/// Right-stick deflection below this contributes no camera orbit
pub const ORBIT_DEADZONE: f32 = 0.1;
/// Right-stick horizontal to orbit-angle delta per tick
pub const ORBIT_X_RATE: f32 = 0.05;
/// Right-stick vertical to orbit-elevation delta per tick
pub const ORBIT_Y_RATE: f32 = 0.03;

/// Standard-mapping gamepad button indices
mod button {
    pub const A: u32 = 0;
    pub const B: u32 = 1;
    pub const Y: u32 = 3;
    pub const START: u32 = 9;
    pub const DPAD_UP: u32 = 12;
    pub const DPAD_DOWN: u32 = 13;
}

/// Digital controls read from one device. Keyboard and gamepad each fill one
/// of these; the aggregator ORs them together.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeldControls {
    pub throttle: bool,
    pub reverse: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub boost: bool,
    pub shift_gear: bool,
}

/// Accumulates device state between animation frames and produces the
/// merged control vector for each fixed step
#[derive(Debug, Default)]
pub struct InputAggregator {
    keyboard: HeldControls,
    gamepad: HeldControls,
    /// One-shots queued by event handlers, cleared after each tick
    pause: bool,
    respawn: bool,
    camera_reset: bool,
    /// Mouse-drag orbit deltas queued since the last tick
    orbit: Vec2,
    zoom: f32,
    /// Previous-frame gamepad buttons for edge detection
    prev_camera_reset_btn: bool,
    prev_pause_btn: bool,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a keyboard key transition. Unrecognized codes are ignored.
    /// Returns true if the code maps to a driving control (so the caller can
    /// suppress default browser behavior like page scroll).
    pub fn key_event(&mut self, code: &str, pressed: bool) -> bool {
        let k = &mut self.keyboard;
        match code {
            "KeyW" | "ArrowUp" => k.throttle = pressed,
            "KeyS" | "ArrowDown" => k.reverse = pressed,
            "Space" => k.brake = pressed,
            "KeyA" | "ArrowLeft" => k.steer_left = pressed,
            "KeyD" | "ArrowRight" => k.steer_right = pressed,
            "ControlLeft" | "ControlRight" => k.boost = pressed,
            "ShiftLeft" | "ShiftRight" => k.shift_gear = pressed,
            _ => return false,
        }
        true
    }

    /// Queue a pause toggle for the next tick
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Queue a manual respawn for the next tick
    pub fn request_respawn(&mut self) {
        self.respawn = true;
    }

    /// Queue a camera snap-behind for the next tick
    pub fn request_camera_reset(&mut self) {
        self.camera_reset = true;
    }

    /// Accumulate a mouse-drag orbit delta
    pub fn add_orbit(&mut self, delta: Vec2) {
        self.orbit += delta;
    }

    /// Accumulate a wheel zoom delta
    pub fn add_zoom(&mut self, delta: f32) {
        self.zoom += delta;
    }

    /// Feed one frame of standard-mapping gamepad state. `axes` is the
    /// four-axis layout (left x/y, right x/y); `button_pressed` indexes the
    /// standard button order.
    pub fn gamepad_frame(&mut self, axes: &[f64], button_pressed: impl Fn(u32) -> bool) {
        let axis = |i: usize| axes.get(i).copied().unwrap_or(0.0) as f32;

        self.gamepad = HeldControls {
            throttle: axis(1) < -STICK_DEADZONE,
            reverse: axis(1) > STICK_DEADZONE,
            brake: button_pressed(button::A),
            steer_left: axis(0) < -STICK_DEADZONE,
            steer_right: axis(0) > STICK_DEADZONE,
            boost: button_pressed(button::B),
            shift_gear: button_pressed(button::DPAD_UP) || button_pressed(button::DPAD_DOWN),
        };

        // Y and Start are one-shots, so edge-detect them here
        let camera_reset = button_pressed(button::Y);
        if camera_reset && !self.prev_camera_reset_btn {
            self.camera_reset = true;
        }
        self.prev_camera_reset_btn = camera_reset;

        let pause = button_pressed(button::START);
        if pause && !self.prev_pause_btn {
            self.pause = true;
        }
        self.prev_pause_btn = pause;

        // Right stick orbits the camera continuously
        let rx = axis(2);
        let ry = axis(3);
        if rx.abs() > ORBIT_DEADZONE {
            self.orbit.x += rx * ORBIT_X_RATE;
        }
        if ry.abs() > ORBIT_DEADZONE {
            self.orbit.y += ry * ORBIT_Y_RATE;
        }
    }

    /// Drop the gamepad contribution (device disconnected)
    pub fn clear_gamepad(&mut self) {
        self.gamepad = HeldControls::default();
        self.prev_camera_reset_btn = false;
        self.prev_pause_btn = false;
    }

    /// Merge all sources into the control vector for one tick
    pub fn tick_input(&self) -> TickInput {
        let k = self.keyboard;
        let g = self.gamepad;
        TickInput {
            throttle: k.throttle || g.throttle,
            reverse: k.reverse || g.reverse,
            brake: k.brake || g.brake,
            steer_left: k.steer_left || g.steer_left,
            steer_right: k.steer_right || g.steer_right,
            boost: k.boost || g.boost,
            shift_gear: k.shift_gear || g.shift_gear,
            pause: self.pause,
            respawn: self.respawn,
            camera_reset: self.camera_reset,
            orbit: self.orbit,
            zoom: self.zoom,
        }
    }

    /// Clear one-shots and accumulated camera deltas after a tick has
    /// consumed them
    pub fn end_tick(&mut self) {
        self.pause = false;
        self.respawn = false;
        self.camera_reset = false;
        self.orbit = Vec2::ZERO;
        self.zoom = 0.0;
    }
}
