//! Local leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 runs. Entries are keyed by
//! player name: a returning player's row is replaced only when the new run
//! beats their stored score, so the board never shows two rows for one name.

use serde::{Deserialize, Serialize};

/// Maximum number of leaderboard rows to keep
pub const MAX_ENTRIES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name chosen on the start screen
    pub name: String,
    /// Final score (can be negative)
    pub score: i32,
    /// Maximum score attainable across the levels reached
    pub max_score: u32,
    /// Wall-clock run length in whole seconds
    pub elapsed_secs: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Local top-10 leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "timber_rally_leaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// True when this run would improve (or create) the player's row
    pub fn is_personal_best(&self, name: &str, score: i32) -> bool {
        match self.entries.iter().find(|e| e.name == name) {
            Some(existing) => score > existing.score,
            None => score > 0,
        }
    }

    /// Record a finished run. The player's existing row is replaced only if
    /// this run beats it; first-time names always get a row. Returns the
    /// 1-indexed rank of the player's row afterwards, or None if the row
    /// fell off the board.
    pub fn submit(
        &mut self,
        name: &str,
        score: i32,
        max_score: u32,
        elapsed_secs: u32,
        timestamp: f64,
    ) -> Option<usize> {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => {
                if score > existing.score {
                    existing.score = score;
                    existing.max_score = max_score;
                    existing.elapsed_secs = elapsed_secs;
                    existing.timestamp = timestamp;
                }
            }
            None => {
                self.entries.push(LeaderboardEntry {
                    name: name.to_string(),
                    score,
                    max_score,
                    elapsed_secs,
                    timestamp,
                });
            }
        }

        // Sorted descending by score; ties keep insertion order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);

        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|i| i + 1)
    }

    /// Names already on the board, for the start-screen picker
    pub fn player_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<Leaderboard>(&json) {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    /// Save the leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Leaderboard saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Format a run length as m:ss
pub fn format_elapsed(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
