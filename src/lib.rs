//! Timber Rally - an arcade off-road driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle dynamics, collisions, levels)
//! - `input`: Keyboard/gamepad aggregation into a unified control vector
//! - `leaderboard`: Persisted local top-10 scores
//! - `hud`: Derived display values for the DOM HUD boundary

pub mod hud;
pub mod input;
pub mod leaderboard;
pub mod sim;

pub use leaderboard::Leaderboard;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; all per-tick constants assume this rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 6;

    /// Forward speed caps per gear (index 0 = gear 1)
    pub const GEAR_SPEEDS: [f32; 5] = [0.25, 0.5, 0.75, 1.0, 1.25];
    /// Reverse top speed as a fraction of the forward gear cap
    pub const REVERSE_FACTOR: f32 = 0.6;
    /// Throttle speed gain per tick
    pub const ACCELERATION: f32 = 0.03;
    /// Reverse speed gain per tick (braking uses double this)
    pub const DECELERATION: f32 = 0.02;
    /// Heading change per tick while a turn input is held (radians)
    pub const TURN_RATE: f32 = 0.04;
    /// Coasting speed multiplier per tick
    pub const FRICTION: f32 = 0.95;
    /// Below this magnitude, coasting speed snaps to exactly zero
    pub const STOP_EPSILON: f32 = 0.01;

    /// Boost charge capacity (seconds of boost)
    pub const MAX_BOOST_SECS: f32 = 10.0;
    /// Additive speed bonus while boosting (10 km/h on the HUD scale)
    pub const BOOST_BONUS: f32 = 10.0 / 80.0;

    /// Vehicle spawn point
    pub const SPAWN_POINT: [f32; 3] = [0.0, 0.5, 0.0];
    /// Half-extent of the drivable square; beyond this on x or z the car respawns
    pub const BOUNDARY_HALF_SIZE: f32 = 145.0;
    /// Falling below this height triggers a respawn
    pub const FALL_HEIGHT: f32 = -10.0;

    /// Obstacles are placed within this radius of the origin
    pub const FIELD_RADIUS: f32 = 140.0;
    /// Half-extent of the square spawn exclusion zone around the origin
    pub const SPAWN_EXCLUSION: f32 = 10.0;
    /// Minimum spacing between placed obstacles
    pub const MIN_OBSTACLE_SPACING: f32 = 8.0;
    /// Placement attempts before accepting a candidate as-is (best effort)
    pub const PLACEMENT_ATTEMPTS: u32 = 50;

    /// Tree collision radius
    pub const TREE_RADIUS: f32 = 2.2;
    /// Rock radius range (random per rock)
    pub const ROCK_MIN_RADIUS: f32 = 0.5;
    pub const ROCK_MAX_RADIUS: f32 = 1.5;
    /// Car half-extent added to rock radii for contact tests
    pub const CAR_HALF_EXTENT: f32 = 1.0;
    /// Push-out distance beyond the rock radius after a hit
    pub const ROCK_PUSH_MARGIN: f32 = 1.1;
    /// Seconds before the same rock can emit another scoring event
    pub const ROCK_HIT_COOLDOWN: f32 = 1.0;

    /// Tree count for a level: BASE + PER_LEVEL * level
    pub const BASE_TREES: u32 = 15;
    pub const TREES_PER_LEVEL: u32 = 5;
    /// Rock count for a level: BASE + PER_LEVEL * level
    pub const BASE_ROCKS: u32 = 10;
    pub const ROCKS_PER_LEVEL: u32 = 3;

    /// Starting time budget (seconds)
    pub const BASE_TIME_SECS: i32 = 60;
    /// Extra seconds granted per completed level, capped after this many
    pub const TIME_BONUS_PER_LEVEL: i32 = 4;
    pub const TIME_BONUS_LEVEL_CAP: i32 = 4;

    /// Countdown sequence timing
    pub const COUNTDOWN_STEP_SECS: f32 = 1.0;
    pub const COUNTDOWN_VISIBLE_SECS: f32 = 0.8;
    /// Total suspension from respawn to unfreeze ("3","2","1","GO!" + pad)
    pub const COUNTDOWN_TOTAL_SECS: f32 = 3.5;
    /// Level-up banner duration before the countdown begins
    pub const LEVEL_MESSAGE_SECS: f32 = 1.5;

    /// Simulation speed units to km/h for the HUD
    pub const KMH_SCALE: f32 = 80.0;

    /// Camera defaults
    pub const CAMERA_DISTANCE: f32 = 8.0;
    pub const CAMERA_HEIGHT: f32 = 4.0;
    pub const CAMERA_ELEVATION: f32 = 0.3;
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    pub const CAMERA_MIN_DISTANCE: f32 = 3.0;
    pub const CAMERA_MAX_DISTANCE: f32 = 15.0;
    pub const CAMERA_MIN_ELEVATION: f32 = -0.5;
    pub const CAMERA_MAX_ELEVATION: f32 = 1.2;
}

/// Unit direction on the ground plane for a heading angle.
///
/// Heading 0 faces +z; the velocity decomposition is
/// `vx = sin(h)·v, vz = cos(h)·v`.
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.sin(), heading.cos())
}

/// Planar (x,z) distance between two ground positions
#[inline]
pub fn planar_distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}
