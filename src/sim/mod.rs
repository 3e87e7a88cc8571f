//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The platform layer feeds a [`TickInput`] each fixed step and consumes the
//! returned [`GameEvent`]s plus the render projection from
//! [`GameState::render_view`].

pub mod camera;
pub mod collision;
pub mod field;
pub mod level;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use camera::CameraRig;
pub use field::{ObstacleField, Rock, Tree};
pub use state::{GameEvent, GamePhase, GameState, RenderView};
pub use tick::{TickInput, tick};
pub use vehicle::Vehicle;
