//! Collision detection and response
//!
//! Per-tick planar tests of the vehicle against the obstacle field. Trees are
//! resolved first, then rocks; rock pushes apply sequentially, so with
//! overlapping rocks the last processed one decides the final position. Good
//! enough for arcade feel, not physically consistent.

use glam::Vec2;

use super::field::ObstacleField;
use super::state::GameEvent;
use super::vehicle::Vehicle;
use crate::consts::*;
use crate::planar_distance;

/// Resolve the vehicle against every obstacle, mutating vehicle
/// position/velocity on rock contact and marking broken trees.
///
/// Events are appended for the level controller: one `TreeBroken` per newly
/// broken tree, one `RockHit` per rock whose scoring cooldown was clear.
pub fn resolve(vehicle: &mut Vehicle, field: &mut ObstacleField, events: &mut Vec<GameEvent>) {
    if vehicle.frozen {
        return;
    }

    let mut car = vehicle.planar_pos();

    for (i, tree) in field.trees.iter_mut().enumerate() {
        if tree.broken {
            continue;
        }
        if planar_distance(car, tree.pos) < tree.radius {
            tree.broken = true;
            events.push(GameEvent::TreeBroken { tree: i });
        }
    }

    for (i, rock) in field.rocks.iter_mut().enumerate() {
        let dist = planar_distance(car, rock.pos);
        if dist < rock.radius + CAR_HALF_EXTENT {
            // Push the car out along the rock→car normal and hard-stop it
            let push_dir = if dist > f32::EPSILON {
                (car - rock.pos) / dist
            } else {
                Vec2::Y
            };
            car = rock.pos + push_dir * (rock.radius + ROCK_PUSH_MARGIN);
            vehicle.velocity = Vec2::ZERO;

            if rock.hit_cooldown <= 0.0 {
                rock.hit_cooldown = ROCK_HIT_COOLDOWN;
                events.push(GameEvent::RockHit { rock: i });
            }
        }
    }

    vehicle.position.x = car.x;
    vehicle.position.z = car.y;
}

/// Decay rock scoring cooldowns. Runs every tick, including while the
/// vehicle is frozen, so the 1-second window tracks real time.
pub fn tick_cooldowns(field: &mut ObstacleField, dt: f32) {
    for rock in &mut field.rocks {
        if rock.hit_cooldown > 0.0 {
            rock.hit_cooldown = (rock.hit_cooldown - dt).max(0.0);
        }
    }
}
