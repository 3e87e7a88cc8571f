//! Level controller
//!
//! Score, timer, and level transitions, driven entirely by tick-time state.
//! The reference behavior here was a web of nested timeouts; instead every
//! delayed action is a [`Sequence`] advanced by the fixed step, so a fast
//! phase change can never be mutated by a stale callback.

use serde::{Deserialize, Serialize};

use super::field::ObstacleField;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// A time-driven overlay sequence, advanced each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sequence {
    /// "LEVEL N!" banner shown before the next countdown
    LevelMessage { elapsed: f32 },
    /// "3","2","1","GO!" at 1 s cadence; unfreezes the vehicle on completion
    Countdown { elapsed: f32 },
}

impl Sequence {
    /// Overlay text to display right now, if any
    pub fn overlay_text(&self, level: u32) -> Option<String> {
        match *self {
            Sequence::LevelMessage { .. } => Some(format!("LEVEL {level}!")),
            Sequence::Countdown { elapsed } => {
                let step = (elapsed / COUNTDOWN_STEP_SECS) as usize;
                let within = elapsed - step as f32 * COUNTDOWN_STEP_SECS;
                let labels = ["3", "2", "1", "GO!"];
                if step < labels.len() && within < COUNTDOWN_VISIBLE_SECS {
                    Some(labels[step].to_string())
                } else {
                    None
                }
            }
        }
    }
}

/// Sum over levels 1..=level of the per-level tree count
pub fn max_possible_score(level: u32) -> u32 {
    (1..=level).map(|i| BASE_TREES + TREES_PER_LEVEL * i).sum()
}

/// Begin (or restart) the respawn countdown. Re-triggering while a countdown
/// is already in flight restarts it from "3"; the vehicle stays frozen either
/// way.
pub fn start_countdown(state: &mut GameState) {
    state.sequence = Some(Sequence::Countdown { elapsed: 0.0 });
    state.phase = GamePhase::Countdown;
    state.vehicle.frozen = true;
}

/// Advance the in-flight sequence, unfreezing the vehicle when a countdown
/// completes
pub fn advance_sequence(state: &mut GameState, dt: f32) {
    match state.sequence.take() {
        None => {}
        Some(Sequence::LevelMessage { elapsed }) => {
            let elapsed = elapsed + dt;
            if elapsed >= LEVEL_MESSAGE_SECS {
                state.sequence = Some(Sequence::Countdown { elapsed: 0.0 });
                state.phase = GamePhase::Countdown;
            } else {
                state.sequence = Some(Sequence::LevelMessage { elapsed });
            }
        }
        Some(Sequence::Countdown { elapsed }) => {
            let elapsed = elapsed + dt;
            if elapsed >= COUNTDOWN_TOTAL_SECS {
                state.sequence = None;
                state.vehicle.frozen = false;
                state.phase = GamePhase::Playing;
            } else {
                state.sequence = Some(Sequence::Countdown { elapsed });
            }
        }
    }
}

/// Apply scoring events from collision resolution, then check for level
/// completion. Appends a `LevelComplete` event when the last tree breaks.
pub fn apply_events(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut tree_broken = false;
    for i in 0..events.len() {
        match events[i] {
            GameEvent::TreeBroken { .. } => {
                state.score += 1;
                state.vehicle.add_boost_charge();
                tree_broken = true;
            }
            GameEvent::RockHit { .. } => {
                state.score -= 1;
            }
            _ => {}
        }
    }

    if tree_broken && state.phase == GamePhase::Playing && state.field.all_trees_broken() {
        complete_level(state);
        events.push(GameEvent::LevelComplete { level: state.level });
    }
}

/// All trees broken: freeze, bank the remaining time, regenerate the field
/// for the next level, and queue the banner + countdown.
fn complete_level(state: &mut GameState) {
    state.vehicle.frozen = true;
    state.level += 1;

    let bonus_levels = ((state.level as i32) - 1).min(TIME_BONUS_LEVEL_CAP);
    state.time_left += BASE_TIME_SECS + TIME_BONUS_PER_LEVEL * bonus_levels;
    state.timer_accum = 0.0;

    state.field = ObstacleField::generate(state.level, &mut GameState::level_rng(state.seed, state.level));
    state.max_score = max_possible_score(state.level);
    state.phase = GamePhase::LevelComplete;
    state.sequence = Some(Sequence::LevelMessage { elapsed: 0.0 });

    log::info!(
        "Level {} - {} trees, {} rocks, {}s on the clock",
        state.level,
        state.field.trees.len(),
        state.field.rocks.len(),
        state.time_left
    );
}

/// Advance the 1 Hz timer domain. Decrements only while actively playing
/// and unfrozen; reaching zero ends the run exactly once.
pub fn tick_timer(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing || state.vehicle.frozen {
        return;
    }

    state.timer_accum += dt;
    while state.timer_accum >= 1.0 {
        state.timer_accum -= 1.0;
        state.time_left -= 1;
        if state.time_left <= 0 {
            state.time_left = 0;
            game_over(state);
            events.push(GameEvent::GameOver);
            break;
        }
    }
}

/// Terminal state: timer stopped, vehicle frozen
pub fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.vehicle.frozen = true;
    state.sequence = None;
    log::info!(
        "Game over - score {}/{} at level {}",
        state.score,
        state.max_score,
        state.level
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_score_accumulates_per_level_tree_counts() {
        assert_eq!(max_possible_score(1), 20);
        assert_eq!(max_possible_score(2), 45);
        assert_eq!(max_possible_score(3), 75);
    }

    #[test]
    fn countdown_unfreezes_after_full_sequence() {
        let mut state = GameState::new(1);
        assert!(state.vehicle.frozen);

        let mut ticks = 0;
        while state.sequence.is_some() {
            advance_sequence(&mut state, SIM_DT);
            ticks += 1;
            assert!(ticks < 600, "countdown never completed");
        }
        assert!(!state.vehicle.frozen);
        assert_eq!(state.phase, GamePhase::Playing);
        // Roughly 3.5 seconds of suspension
        assert!((ticks as f32 * SIM_DT - COUNTDOWN_TOTAL_SECS).abs() < 0.1);
    }

    #[test]
    fn countdown_overlay_cadence() {
        let seq = Sequence::Countdown { elapsed: 0.1 };
        assert_eq!(seq.overlay_text(1).as_deref(), Some("3"));
        let seq = Sequence::Countdown { elapsed: 0.9 };
        assert_eq!(seq.overlay_text(1), None);
        let seq = Sequence::Countdown { elapsed: 1.2 };
        assert_eq!(seq.overlay_text(1).as_deref(), Some("2"));
        let seq = Sequence::Countdown { elapsed: 3.1 };
        assert_eq!(seq.overlay_text(1).as_deref(), Some("GO!"));
        let seq = Sequence::Countdown { elapsed: 3.95 };
        assert_eq!(seq.overlay_text(1), None);
    }

    #[test]
    fn level_message_leads_into_countdown() {
        let mut state = GameState::new(1);
        state.sequence = Some(Sequence::LevelMessage { elapsed: 0.0 });
        state.phase = GamePhase::LevelComplete;

        let banner_ticks = (LEVEL_MESSAGE_SECS / SIM_DT) as u32 + 1;
        for _ in 0..banner_ticks {
            advance_sequence(&mut state, SIM_DT);
        }
        assert!(matches!(state.sequence, Some(Sequence::Countdown { .. })));
        assert_eq!(state.phase, GamePhase::Countdown);
    }

    #[test]
    fn breaking_last_tree_completes_level_once() {
        let mut state = GameState::new(9);
        state.phase = GamePhase::Playing;
        state.vehicle.frozen = false;
        state.time_left = 30;

        for tree in &mut state.field.trees {
            tree.broken = true;
        }
        let mut events = vec![GameEvent::TreeBroken { tree: 0 }];
        apply_events(&mut state, &mut events);

        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.vehicle.frozen);
        // 60 base + 4 bonus (new level 2 → one completed level) + 30 carried
        assert_eq!(state.time_left, 94);
        assert_eq!(state.field.trees.len(), 25);
        assert_eq!(state.field.rocks.len(), 16);
        assert_eq!(state.max_score, 45);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::LevelComplete { .. }))
                .count(),
            1
        );

        // Replaying the same events against the fresh field does nothing:
        // the new trees are unbroken
        let mut events = vec![GameEvent::TreeBroken { tree: 0 }];
        state.phase = GamePhase::Playing;
        apply_events(&mut state, &mut events);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn time_bonus_caps_after_four_completed_levels() {
        let mut state = GameState::new(9);
        state.phase = GamePhase::Playing;
        state.level = 7;
        state.time_left = 0;

        for tree in &mut state.field.trees {
            tree.broken = true;
        }
        let mut events = vec![GameEvent::TreeBroken { tree: 0 }];
        apply_events(&mut state, &mut events);
        assert_eq!(state.level, 8);
        assert_eq!(state.time_left, 60 + 4 * 4);
    }

    #[test]
    fn tree_and_rock_events_net_zero_score_and_add_boost() {
        let mut state = GameState::new(2);
        state.phase = GamePhase::Playing;
        let mut events = vec![
            GameEvent::TreeBroken { tree: 0 },
            GameEvent::RockHit { rock: 0 },
        ];
        apply_events(&mut state, &mut events);
        assert_eq!(state.score, 0);
        assert_eq!(state.vehicle.boost_charge, 1.0);
    }

    #[test]
    fn score_can_go_negative() {
        let mut state = GameState::new(2);
        state.phase = GamePhase::Playing;
        let mut events = vec![GameEvent::RockHit { rock: 0 }];
        apply_events(&mut state, &mut events);
        apply_events(&mut state, &mut vec![GameEvent::RockHit { rock: 0 }]);
        assert_eq!(state.score, -2);
    }

    #[test]
    fn timer_expiry_fires_game_over_exactly_once() {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Playing;
        state.vehicle.frozen = false;
        state.time_left = 1;

        let mut events = Vec::new();
        for _ in 0..120 {
            tick_timer(&mut state, SIM_DT, &mut events);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_left, 0);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver))
                .count(),
            1
        );
    }

    #[test]
    fn timer_holds_while_frozen() {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Playing;
        state.vehicle.frozen = true;
        state.time_left = 10;

        let mut events = Vec::new();
        for _ in 0..180 {
            tick_timer(&mut state, SIM_DT, &mut events);
        }
        assert_eq!(state.time_left, 10);
    }
}
