//! Third-person follow camera
//!
//! User-driven orbit/zoom around the vehicle, smoothed toward targets each
//! tick. Purely cosmetic: nothing here feeds back into the dynamics.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::vehicle::Vehicle;
use crate::consts::*;

/// Smoothed orbit camera following the vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    /// Current orbit angle relative to the vehicle heading (radians)
    pub angle: f32,
    /// Current elevation factor
    pub elevation: f32,
    /// Distance from the vehicle
    pub distance: f32,
    target_angle: f32,
    target_elevation: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            angle: 0.0,
            elevation: CAMERA_ELEVATION,
            distance: CAMERA_DISTANCE,
            target_angle: 0.0,
            target_elevation: CAMERA_ELEVATION,
        }
    }
}

/// Eye and look-at points for the render boundary
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraRig {
    /// Apply orbit deltas from pointer drag or right analog stick
    pub fn orbit(&mut self, delta: Vec2) {
        self.target_angle += delta.x;
        self.target_elevation = (self.target_elevation - delta.y)
            .clamp(CAMERA_MIN_ELEVATION, CAMERA_MAX_ELEVATION);
    }

    /// Adjust follow distance (wheel scroll)
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    /// Restore the default behind-the-car view
    pub fn reset(&mut self) {
        self.target_angle = 0.0;
        self.target_elevation = CAMERA_ELEVATION;
        self.distance = CAMERA_DISTANCE;
    }

    /// Smooth current angle/elevation toward their targets (call once per tick)
    pub fn follow(&mut self) {
        self.angle += (self.target_angle - self.angle) * CAMERA_SMOOTHING;
        self.elevation += (self.target_elevation - self.elevation) * CAMERA_SMOOTHING;
    }

    /// Compute the camera pose for the current vehicle state
    pub fn pose(&self, vehicle: &Vehicle) -> CameraPose {
        let pos = vehicle.position;
        let view_angle = vehicle.heading + self.angle;

        let eye = Vec3::new(
            pos.x - view_angle.sin() * self.distance,
            pos.y + CAMERA_HEIGHT + self.elevation * 3.0,
            pos.z - view_angle.cos() * self.distance,
        );
        // Look slightly ahead of the car, not at its center
        let target = Vec3::new(
            pos.x + vehicle.heading.sin() * 2.0,
            pos.y + 1.0,
            pos.z + vehicle.heading.cos() * 2.0,
        );

        CameraPose { eye, target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_clamps_elevation() {
        let mut rig = CameraRig::default();
        rig.orbit(Vec2::new(0.0, 100.0));
        for _ in 0..200 {
            rig.follow();
        }
        assert!(rig.elevation >= CAMERA_MIN_ELEVATION - 1e-4);

        rig.orbit(Vec2::new(0.0, -200.0));
        for _ in 0..200 {
            rig.follow();
        }
        assert!(rig.elevation <= CAMERA_MAX_ELEVATION + 1e-4);
    }

    #[test]
    fn zoom_clamps_distance() {
        let mut rig = CameraRig::default();
        rig.zoom(100.0);
        assert_eq!(rig.distance, CAMERA_MAX_DISTANCE);
        rig.zoom(-100.0);
        assert_eq!(rig.distance, CAMERA_MIN_DISTANCE);
    }

    #[test]
    fn follow_converges_to_target() {
        let mut rig = CameraRig::default();
        rig.orbit(Vec2::new(1.0, 0.0));
        for _ in 0..500 {
            rig.follow();
        }
        assert!((rig.angle - 1.0).abs() < 1e-3);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut rig = CameraRig::default();
        rig.orbit(Vec2::new(2.0, 0.3));
        rig.zoom(4.0);
        rig.reset();
        for _ in 0..500 {
            rig.follow();
        }
        assert!((rig.angle).abs() < 1e-3);
        assert!((rig.elevation - CAMERA_ELEVATION).abs() < 1e-3);
        assert_eq!(rig.distance, CAMERA_DISTANCE);
    }
}
