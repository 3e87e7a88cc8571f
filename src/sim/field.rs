//! Obstacle field generation
//!
//! Scatters destructible trees and solid rocks for a level. Placement is
//! best-effort: candidates that stay invalid after the attempt budget are
//! accepted as-is rather than looping forever.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::planar_distance;

/// A destructible tree. `broken` is one-way until the field is regenerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub pos: Vec2,
    pub radius: f32,
    pub broken: bool,
}

/// A solid rock. The cooldown dedupes scoring events from sustained contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rock {
    pub pos: Vec2,
    pub radius: f32,
    pub hit_cooldown: f32,
}

/// The per-level set of obstacles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    pub trees: Vec<Tree>,
    pub rocks: Vec<Rock>,
}

/// Tree count for a level
pub fn tree_count(level: u32) -> u32 {
    BASE_TREES + TREES_PER_LEVEL * level
}

/// Rock count for a level
pub fn rock_count(level: u32) -> u32 {
    BASE_ROCKS + ROCKS_PER_LEVEL * level
}

fn position_valid(pos: Vec2, occupied: &[Vec2]) -> bool {
    // Keep the spawn area clear
    if pos.x.abs() < SPAWN_EXCLUSION && pos.y.abs() < SPAWN_EXCLUSION {
        return false;
    }
    if pos.length() > FIELD_RADIUS {
        return false;
    }
    !occupied
        .iter()
        .any(|&p| planar_distance(pos, p) < MIN_OBSTACLE_SPACING)
}

fn sample_position(rng: &mut Pcg32, occupied: &[Vec2]) -> Vec2 {
    let mut pos = Vec2::ZERO;
    for _ in 0..PLACEMENT_ATTEMPTS {
        pos = Vec2::new(
            rng.random_range(-FIELD_RADIUS..FIELD_RADIUS),
            rng.random_range(-FIELD_RADIUS..FIELD_RADIUS),
        );
        if position_valid(pos, occupied) {
            return pos;
        }
    }
    // Attempts exhausted; accept the last candidate even if crowded
    pos
}

impl ObstacleField {
    /// Generate the full obstacle set for a level
    pub fn generate(level: u32, rng: &mut Pcg32) -> Self {
        let mut occupied: Vec<Vec2> = Vec::new();

        let trees = (0..tree_count(level))
            .map(|_| {
                let pos = sample_position(rng, &occupied);
                occupied.push(pos);
                Tree {
                    pos,
                    radius: TREE_RADIUS,
                    broken: false,
                }
            })
            .collect();

        let rocks = (0..rock_count(level))
            .map(|_| {
                let pos = sample_position(rng, &occupied);
                occupied.push(pos);
                Rock {
                    pos,
                    radius: rng.random_range(ROCK_MIN_RADIUS..ROCK_MAX_RADIUS),
                    hit_cooldown: 0.0,
                }
            })
            .collect();

        Self { trees, rocks }
    }

    /// Level completion trigger: every tree in the field is broken
    pub fn all_trees_broken(&self) -> bool {
        !self.trees.is_empty() && self.trees.iter().all(|t| t.broken)
    }

    /// Number of trees still standing
    pub fn unbroken_trees(&self) -> usize {
        self.trees.iter().filter(|t| !t.broken).count()
    }

    /// Re-arm every broken tree (explicit level reset)
    pub fn reset_trees(&mut self) {
        for tree in &mut self.trees {
            tree.broken = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn obstacle_counts_follow_level_formula() {
        let mut rng = Pcg32::seed_from_u64(7);
        for level in 1..=5 {
            let field = ObstacleField::generate(level, &mut rng);
            assert_eq!(field.trees.len() as u32, 15 + 5 * level);
            assert_eq!(field.rocks.len() as u32, 10 + 3 * level);
        }
    }

    #[test]
    fn placements_respect_constraints_for_seeded_runs() {
        // Level-1 fields are sparse enough that the attempt budget is never
        // exhausted for these seeds, so every constraint must hold exactly.
        for seed in [1u64, 42, 1234, 99999] {
            let mut rng = Pcg32::seed_from_u64(seed);
            let field = ObstacleField::generate(1, &mut rng);

            let positions: Vec<Vec2> = field
                .trees
                .iter()
                .map(|t| t.pos)
                .chain(field.rocks.iter().map(|r| r.pos))
                .collect();

            for (i, &pos) in positions.iter().enumerate() {
                assert!(
                    !(pos.x.abs() < SPAWN_EXCLUSION && pos.y.abs() < SPAWN_EXCLUSION),
                    "obstacle in spawn exclusion zone"
                );
                assert!(pos.length() <= FIELD_RADIUS);
                for &other in &positions[..i] {
                    assert!(
                        planar_distance(pos, other) >= MIN_OBSTACLE_SPACING,
                        "obstacles too close for seed {seed}"
                    );
                }
            }
        }
    }

    #[test]
    fn rock_radii_within_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        let field = ObstacleField::generate(2, &mut rng);
        for rock in &field.rocks {
            assert!(rock.radius >= ROCK_MIN_RADIUS && rock.radius < ROCK_MAX_RADIUS);
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = ObstacleField::generate(1, &mut Pcg32::seed_from_u64(5));
        let b = ObstacleField::generate(1, &mut Pcg32::seed_from_u64(5));
        assert_eq!(a.trees.len(), b.trees.len());
        for (ta, tb) in a.trees.iter().zip(&b.trees) {
            assert_eq!(ta.pos, tb.pos);
        }
        for (ra, rb) in a.rocks.iter().zip(&b.rocks) {
            assert_eq!(ra.pos, rb.pos);
            assert_eq!(ra.radius, rb.radius);
        }
    }

    #[test]
    fn all_trees_broken_detects_completion() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut field = ObstacleField::generate(1, &mut rng);
        assert!(!field.all_trees_broken());
        for tree in &mut field.trees {
            tree.broken = true;
        }
        assert!(field.all_trees_broken());
        assert_eq!(field.unbroken_trees(), 0);

        field.reset_trees();
        assert!(!field.all_trees_broken());
    }
}
