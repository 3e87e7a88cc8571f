//! HUD text formatting
//!
//! Pure string/number projection of game state for the DOM labels. The
//! platform layer writes these into elements; keeping the formatting here
//! makes it testable off-browser.

use crate::consts::*;
use crate::sim::{GamePhase, GameState};

const GAME_OVER_MESSAGES: [&str; 5] = [
    "Better luck next time!",
    "You gave your best!",
    "Keep trying, you'll get it!",
    "Practice makes perfect!",
    "Don't give up!",
];

/// Display speed in km/h (scaled from sim units, boost included)
pub fn speed_kmh(state: &GameState) -> f32 {
    (state.vehicle.effective_speed() * KMH_SCALE).abs()
}

/// "Speed: N km/h | Gear: G" with a boost suffix while boosting
pub fn speed_label(state: &GameState) -> String {
    let boost = if state.vehicle.boosting {
        " | BOOST!"
    } else {
        ""
    };
    format!(
        "Speed: {:.0} km/h | Gear: {}{boost}",
        speed_kmh(state),
        state.vehicle.gear
    )
}

/// Boost meter fill, 0..=100
pub fn boost_percent(state: &GameState) -> f32 {
    (state.vehicle.boost_charge / MAX_BOOST_SECS * 100.0).clamp(0.0, 100.0)
}

pub fn score_label(state: &GameState) -> String {
    format!("Score: {}", state.score)
}

pub fn level_label(state: &GameState) -> String {
    format!("Level: {}", state.level)
}

pub fn time_label(state: &GameState) -> String {
    format!("Time: {}s", state.time_left)
}

/// Big center-screen overlay text, if any is due this frame
pub fn overlay_text(state: &GameState) -> Option<String> {
    if state.phase == GamePhase::Paused {
        return Some("PAUSED".to_string());
    }
    state
        .sequence
        .as_ref()
        .and_then(|seq| seq.overlay_text(state.level))
}

/// Pick the end-of-run encouragement line for this run
pub fn game_over_message(seed: u64) -> &'static str {
    GAME_OVER_MESSAGES[(seed % GAME_OVER_MESSAGES.len() as u64) as usize]
}

/// "name: score / max" summary line for the game-over panel
pub fn game_over_summary(name: &str, state: &GameState) -> String {
    format!("{name}: {} / {}", state.score, state.max_score)
}
