//! Arcade Pool - a fixed-pool 2D arcade simulation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, motion, boundaries, collisions, lifecycle)
//! - `tuning`: Data-driven game balance and per-variant presets
//!
//! The engine is headless. A host loop samples input into a [`sim::TickInput`],
//! calls [`sim::tick`] once per frame, and renders from
//! [`sim::Session::draw_list`]. Rendering, audio and raw event wiring live in
//! the host, never here.

pub mod sim;
pub mod tuning;

pub use sim::{Session, TickInput, tick};
pub use tuning::{SessionConfig, Variant};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate. One `tick()` per rendered frame; velocities
    /// are per-tick and timers are integer tick countdowns.
    pub const SIM_TICK_HZ: u32 = 60;

    /// Default invulnerability window after taking a hit (ticks)
    pub const I_FRAME_TICKS: u32 = 100;
    /// Default ticks between shots
    pub const FIRE_COOLDOWN_TICKS: u32 = 10;
    /// Default projectile lifetime (ticks)
    pub const PROJECTILE_TTL_TICKS: u32 = 100;

    /// Money floor below which a session ends in bankruptcy.
    /// The beta builds disagreed on this one (-2000 vs -2500); both are
    /// exposed so a variant can pick either.
    pub const BANKRUPTCY_FLOOR: i64 = -2000;
    pub const BANKRUPTCY_FLOOR_BETA: i64 = -2500;

    /// Radius shaved off a target per projectile hit
    pub const CHIP_RADIUS: f32 = 5.0;
    /// Targets at or below this radius respawn
    pub const MIN_TARGET_RADIUS: f32 = 5.0;
    /// Reward range (inclusive low, exclusive high) per chip
    pub const CHIP_REWARD: (i64, i64) = (5, 100);

    /// Off-screen parking spot for inactive slots
    pub const PARK_POS: glam::Vec2 = glam::Vec2::new(-100.0, -100.0);
}

/// Unit vector for a heading in degrees, 0 = up, clockwise positive.
///
/// Screen coordinates: y grows downward, so "up" is -y.
#[inline]
pub fn heading_vector(deg: f32) -> Vec2 {
    let r = deg.to_radians();
    Vec2::new(r.sin(), -r.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_vector_cardinals() {
        let up = heading_vector(0.0);
        assert!(up.x.abs() < 1e-6 && (up.y + 1.0).abs() < 1e-6);

        let right = heading_vector(90.0);
        assert!((right.x - 1.0).abs() < 1e-6 && right.y.abs() < 1e-6);

        let down = heading_vector(180.0);
        assert!(down.x.abs() < 1e-5 && (down.y - 1.0).abs() < 1e-6);
    }
}
