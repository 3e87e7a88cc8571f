//! Vehicle dynamics
//!
//! Integrates driver input into position/heading/velocity each fixed tick.
//! Deliberately arcade-flavored: per-tick acceleration increments, a flat
//! friction multiplier, and no traction model.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::tick::TickInput;
use crate::consts::*;
use crate::heading_to_dir;

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// World position (y is height above ground)
    pub position: Vec3,
    /// Heading in radians; 0 faces +z, positive turns left
    pub heading: f32,
    /// Signed scalar speed along the heading (negative = reversing)
    pub speed: f32,
    /// World-space planar velocity; x maps to world x, y to world z
    pub velocity: Vec2,
    /// Current gear, 1..=5
    pub gear: u8,
    /// Boost charge in seconds, 0..=MAX_BOOST_SECS
    pub boost_charge: f32,
    /// Whether the boost bonus is currently applied
    pub boosting: bool,
    /// Suspends all dynamics and collision while true
    pub frozen: bool,
    /// Brake or reverse input held (drives brake lights at the render boundary)
    pub braking: bool,
    pub(crate) boost_was_held: bool,
    pub(crate) shift_was_held: bool,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            position: Vec3::from_array(SPAWN_POINT),
            heading: 0.0,
            speed: 0.0,
            velocity: Vec2::ZERO,
            gear: 1,
            boost_charge: 0.0,
            boosting: false,
            frozen: true,
            braking: false,
            boost_was_held: false,
            shift_was_held: false,
        }
    }
}

impl Vehicle {
    /// Max sustainable forward speed for the current gear
    pub fn gear_cap(&self) -> f32 {
        GEAR_SPEEDS[(self.gear - 1) as usize]
    }

    /// Speed used for velocity resolution (base speed plus boost bonus)
    pub fn effective_speed(&self) -> f32 {
        if self.boosting {
            self.speed + BOOST_BONUS
        } else {
            self.speed
        }
    }

    /// Replenish one unit of boost charge (awarded for breaking a tree)
    pub fn add_boost_charge(&mut self) {
        self.boost_charge = (self.boost_charge + 1.0).min(MAX_BOOST_SECS);
    }

    /// Integrate one tick of driver input into speed/heading/velocity.
    ///
    /// Position is advanced separately by [`Vehicle::integrate`], after
    /// collision resolution has had a chance to adjust the velocity.
    pub fn apply_controls(&mut self, input: &TickInput, dt: f32) {
        // Boost toggles on the rising edge, and only while charge remains
        if input.boost && !self.boost_was_held && self.boost_charge > 0.0 {
            self.boosting = !self.boosting;
        }
        self.boost_was_held = input.boost;

        if self.boosting {
            self.boost_charge -= dt;
            if self.boost_charge <= 0.0 {
                self.boosting = false;
                self.boost_charge = 0.0;
            }
        }

        // Gear shift on the rising edge: 1→2→3→4→5→1
        if input.shift_gear && !self.shift_was_held {
            self.gear = if self.gear >= 5 { 1 } else { self.gear + 1 };
        }
        self.shift_was_held = input.shift_gear;

        let cap = self.gear_cap();
        self.braking = input.brake || input.reverse;

        if input.throttle {
            self.speed = (self.speed + ACCELERATION).min(cap);
        } else if input.reverse {
            self.speed = (self.speed - DECELERATION).max(-cap * REVERSE_FACTOR);
        } else if input.brake {
            self.speed = (self.speed - DECELERATION * 2.0).max(0.0);
        } else {
            self.speed *= FRICTION;
            if self.speed.abs() < STOP_EPSILON {
                self.speed = 0.0;
            }
        }

        if input.steer_left {
            self.heading += TURN_RATE;
        }
        if input.steer_right {
            self.heading -= TURN_RATE;
        }

        self.velocity = heading_to_dir(self.heading) * self.effective_speed();
    }

    /// Advance position by the current velocity and check the play bounds.
    ///
    /// Returns true when the vehicle left the bounds and was respawned; the
    /// caller is responsible for starting the countdown sequence.
    pub fn integrate(&mut self) -> bool {
        self.position.x += self.velocity.x;
        self.position.z += self.velocity.y;

        if self.position.y < FALL_HEIGHT
            || self.position.x.abs() > BOUNDARY_HALF_SIZE
            || self.position.z.abs() > BOUNDARY_HALF_SIZE
        {
            self.respawn();
            return true;
        }
        false
    }

    /// Reset to the spawn point, zero motion, and freeze until unfrozen by
    /// the countdown sequence
    pub fn respawn(&mut self) {
        self.position = Vec3::from_array(SPAWN_POINT);
        self.velocity = Vec2::ZERO;
        self.speed = 0.0;
        self.heading = 0.0;
        self.frozen = true;
    }

    /// Planar (x,z) position for collision tests
    pub fn planar_pos(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }
}
