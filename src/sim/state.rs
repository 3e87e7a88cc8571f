//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::{CameraPose, CameraRig};
use super::field::ObstacleField;
use super::level::{self, Sequence};
use super::vehicle::Vehicle;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Vehicle frozen while "3","2","1","GO!" runs
    Countdown,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level-up banner before the next countdown
    LevelComplete,
    /// Run ended (terminal)
    GameOver,
}

/// Events emitted by a simulation tick for the level controller and the
/// platform boundary (haptics, logging, leaderboard submission)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A tree was broken this tick (+1 score, +1 boost charge)
    TreeBroken { tree: usize },
    /// A rock was struck with its scoring cooldown clear (-1 score, rumble)
    RockHit { rock: usize },
    /// The vehicle left the play bounds or a manual respawn was requested
    Respawned,
    /// All trees broken; `level` is the new level number
    LevelComplete { level: u32 },
    /// Timer expired
    GameOver,
}

/// Complete game state, owned by the single simulation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed (obstacle placement is deterministic given this)
    pub seed: u64,
    pub phase: GamePhase,
    /// Level number, starts at 1 and only increases
    pub level: u32,
    /// May go negative; there is no floor
    pub score: i32,
    /// Seconds remaining on the countdown timer
    pub time_left: i32,
    /// Sum over levels 1..=level of the per-level tree count
    pub max_score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Real time elapsed this run (includes paused time, like a wall clock)
    pub elapsed_secs: f32,
    /// Fractional-second accumulator for the 1 Hz timer domain
    pub timer_accum: f32,
    pub vehicle: Vehicle,
    pub field: ObstacleField,
    pub camera: CameraRig,
    /// In-flight countdown or level-banner sequence, advanced each tick
    pub sequence: Option<Sequence>,
}

impl GameState {
    /// Create a fresh run: level 1, full timer, vehicle frozen behind the
    /// opening countdown
    pub fn new(seed: u64) -> Self {
        let field = ObstacleField::generate(1, &mut Self::level_rng(seed, 1));
        Self {
            seed,
            phase: GamePhase::Countdown,
            level: 1,
            score: 0,
            time_left: BASE_TIME_SECS,
            max_score: level::max_possible_score(1),
            time_ticks: 0,
            elapsed_secs: 0.0,
            timer_accum: 0.0,
            vehicle: Vehicle::default(),
            field,
            camera: CameraRig::default(),
            sequence: Some(Sequence::Countdown { elapsed: 0.0 }),
        }
    }

    /// Deterministic RNG for a level's obstacle placement
    pub fn level_rng(seed: u64, level: u32) -> Pcg32 {
        Pcg32::seed_from_u64(seed.wrapping_add(level as u64))
    }

    /// One-way projection for the render boundary. Simulation entities stay
    /// plain data; no visual handles live in this state.
    pub fn render_view(&self) -> RenderView {
        RenderView {
            vehicle: VehicleView {
                position: self.vehicle.position.to_array(),
                heading: self.vehicle.heading,
                braking: self.vehicle.braking,
                boosting: self.vehicle.boosting,
            },
            trees: self
                .field
                .trees
                .iter()
                .map(|t| TreeView {
                    x: t.pos.x,
                    z: t.pos.y,
                    broken: t.broken,
                })
                .collect(),
            rocks: self
                .field
                .rocks
                .iter()
                .map(|r| RockView {
                    x: r.pos.x,
                    z: r.pos.y,
                    radius: r.radius,
                    hit_recently: r.hit_cooldown > 0.0,
                })
                .collect(),
            camera: self.camera.pose(&self.vehicle),
        }
    }
}

/// Vehicle pose for the renderer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VehicleView {
    pub position: [f32; 3],
    pub heading: f32,
    pub braking: bool,
    pub boosting: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeView {
    pub x: f32,
    pub z: f32,
    pub broken: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RockView {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    pub hit_recently: bool,
}

/// Everything the external renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderView {
    pub vehicle: VehicleView,
    pub trees: Vec<TreeView>,
    pub rocks: Vec<RockView>,
    pub camera: CameraPose,
}
