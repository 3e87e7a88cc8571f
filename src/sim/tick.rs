//! Fixed timestep simulation tick
//!
//! Advances the whole game one step: input → vehicle dynamics → collision
//! resolution → level controller → camera. Returns the events the platform
//! layer reacts to (rumble, leaderboard submission, logging).

use glam::Vec2;

use super::collision;
use super::level;
use super::state::{GameEvent, GamePhase, GameState};

/// Unified control vector for a single tick, merged from keyboard and
/// gamepad by the input aggregator
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held controls
    pub throttle: bool,
    pub reverse: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Held; the vehicle edge-detects the toggle
    pub boost: bool,
    /// Held; the vehicle edge-detects the shift
    pub shift_gear: bool,
    /// One-shot: toggle pause (cleared by the platform layer after the tick)
    pub pause: bool,
    /// One-shot: manual respawn request
    pub respawn: bool,
    /// One-shot: snap the camera behind the car
    pub camera_reset: bool,
    /// Camera orbit deltas accumulated since the last tick
    pub orbit: Vec2,
    /// Camera zoom delta accumulated since the last tick
    pub zoom: f32,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Pause is a pure toggle between the two active phases; nothing resets
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return events;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
            }
            _ => {}
        }
    }

    // The run clock keeps counting while paused, like a wall clock
    state.elapsed_secs += dt;

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return events,
        _ => {}
    }

    state.time_ticks += 1;

    // Camera input is user-driven and works even while frozen
    if input.camera_reset {
        state.camera.reset();
    }
    if input.orbit != Vec2::ZERO {
        state.camera.orbit(input.orbit);
    }
    if input.zoom != 0.0 {
        state.camera.zoom(input.zoom);
    }

    if input.respawn && matches!(state.phase, GamePhase::Playing | GamePhase::Countdown) {
        state.vehicle.respawn();
        level::start_countdown(state);
        events.push(GameEvent::Respawned);
    }

    // Countdown / level banner sequencing (may unfreeze the vehicle)
    level::advance_sequence(state, dt);

    if !state.vehicle.frozen {
        state.vehicle.apply_controls(input, dt);
        collision::resolve(&mut state.vehicle, &mut state.field, &mut events);
        if state.vehicle.integrate() {
            level::start_countdown(state);
            events.push(GameEvent::Respawned);
        }
    }
    collision::tick_cooldowns(&mut state.field, dt);

    level::apply_events(state, &mut events);
    level::tick_timer(state, dt, &mut events);

    state.camera.follow();

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn run_ticks(state: &mut GameState, input: &TickInput, n: usize) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for _ in 0..n {
            all.extend(tick(state, input, SIM_DT));
        }
        all
    }

    /// Skip past the opening countdown so the vehicle is drivable
    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        run_ticks(&mut state, &TickInput::default(), 240);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.vehicle.frozen);
        state
    }

    #[test]
    fn opening_countdown_suspends_driving() {
        let mut state = GameState::new(1);
        let input = TickInput {
            throttle: true,
            ..TickInput::default()
        };

        // During the countdown the car cannot move
        run_ticks(&mut state, &input, 60);
        assert_eq!(state.vehicle.speed, 0.0);
        assert_eq!(state.vehicle.position.x, 0.0);

        // After ~3.5s it drives
        run_ticks(&mut state, &input, 180);
        assert!(state.vehicle.speed > 0.0);
    }

    #[test]
    fn throttle_reaches_gear_one_cap_end_to_end() {
        let mut state = playing_state(2);
        let input = TickInput {
            throttle: true,
            ..TickInput::default()
        };
        run_ticks(&mut state, &input, 120);
        assert_eq!(state.vehicle.speed, 0.25);
        assert_eq!(state.vehicle.heading, 0.0);
    }

    #[test]
    fn pause_toggle_suspends_timer_and_resumes_cleanly() {
        let mut state = playing_state(3);
        let before = state.time_left;
        let score_before = state.score;

        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        run_ticks(&mut state, &TickInput::default(), 300);
        assert_eq!(state.time_left, before, "timer must hold while paused");

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, score_before);

        // Timer resumes: after ~2s one or two seconds have elapsed
        run_ticks(&mut state, &TickInput::default(), 120);
        assert!(state.time_left < before);
    }

    #[test]
    fn manual_respawn_restarts_countdown() {
        let mut state = playing_state(4);
        state.vehicle.position.x = 50.0;

        let respawn = TickInput {
            respawn: true,
            ..TickInput::default()
        };
        let events = tick(&mut state, &respawn, SIM_DT);
        assert!(events.contains(&GameEvent::Respawned));
        assert_eq!(state.phase, GamePhase::Countdown);
        assert!(state.vehicle.frozen);
        assert_eq!(state.vehicle.position.x, 0.0);

        // Unfreezes again after the full sequence
        run_ticks(&mut state, &TickInput::default(), 240);
        assert!(!state.vehicle.frozen);
    }

    #[test]
    fn out_of_bounds_respawn_restarts_countdown() {
        let mut state = playing_state(5);
        state.vehicle.position.x = BOUNDARY_HALF_SIZE - 0.01;
        state.vehicle.speed = 1.0;
        state.vehicle.heading = std::f32::consts::FRAC_PI_2; // drive toward +x

        let input = TickInput {
            throttle: true,
            ..TickInput::default()
        };
        let mut respawned = false;
        for _ in 0..60 {
            let events = tick(&mut state, &input, SIM_DT);
            if events.contains(&GameEvent::Respawned) {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        assert_eq!(state.phase, GamePhase::Countdown);
        assert!(state.vehicle.frozen);
    }

    #[test]
    fn driving_through_a_tree_scores_and_charges_boost() {
        let mut state = playing_state(6);
        // Park a tree directly in front of the car, with nothing else nearby
        state.field.rocks.clear();
        state.field.trees[0].pos = glam::Vec2::new(0.0, 3.0);
        state.field.trees[0].broken = false;

        let input = TickInput {
            throttle: true,
            ..TickInput::default()
        };
        let events = run_ticks(&mut state, &input, 120);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::TreeBroken { .. }))
        );
        assert!(state.score >= 1);
        assert!(state.vehicle.boost_charge >= 1.0);
    }

    #[test]
    fn timer_expiry_ends_the_run_exactly_once() {
        let mut state = playing_state(7);
        state.time_left = 1;

        let events = run_ticks(&mut state, &TickInput::default(), 180);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver))
                .count(),
            1
        );

        // Further ticks are inert
        let events = run_ticks(&mut state, &TickInput::default(), 60);
        assert!(events.is_empty());
    }

    #[test]
    fn breaking_every_tree_advances_the_level() {
        let mut state = playing_state(8);
        for tree in state.field.trees.iter_mut().skip(1) {
            tree.broken = true;
        }
        state.field.trees[0].pos = glam::Vec2::new(0.0, 3.0);

        let input = TickInput {
            throttle: true,
            ..TickInput::default()
        };
        let events = run_ticks(&mut state, &input, 120);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelComplete { level: 2 }))
        );
        assert_eq!(state.level, 2);
        assert_eq!(state.field.trees.len(), 25);
        assert_eq!(state.field.rocks.len(), 16);

        // Banner then countdown then play again
        run_ticks(&mut state, &input, 330);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.vehicle.frozen);
    }
}
