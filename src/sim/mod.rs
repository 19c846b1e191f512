//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer tick timebase only
//! - Seeded RNG only
//! - Stable iteration order (by pool, then by slot index)
//! - No rendering or platform dependencies

pub mod boundary;
pub mod collision;
pub mod motion;
pub mod pool;
pub mod state;
pub mod tick;

pub use boundary::{BoundaryPolicy, Edge, RespawnRule, Viewport};
pub use collision::{circle_circle, rect_circle, rect_gate, rect_rect, segment_circle};
pub use motion::{ControlScheme, MotionProfile};
pub use pool::{AllocationExhausted, FixedPool};
pub use state::{
    Beam, DrawCmd, Entity, EntityKind, EntityPool, Extent, Hitbox, Phase, Player, Session,
    SimEvent,
};
pub use tick::{TickInput, tick};

use thiserror::Error;

/// Construction-time configuration faults. All of these are fatal: a session
/// is never built from a config that fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("pool capacity must be at least 1")]
    ZeroCapacity,
    #[error("respawn spacing must be positive, got {0}")]
    InvalidSpacing(f32),
    #[error("viewport dimensions must be positive, got {0}x{1}")]
    InvalidViewport(f32, f32),
    #[error("chip amount must be positive, got {0}")]
    InvalidChip(f32),
    #[error("score interval must be at least one tick")]
    ZeroScoreInterval,
}
