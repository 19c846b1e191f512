//! Per-tick motion integration
//!
//! Velocities are per-tick deltas; there is no dt. Each integrator applies,
//! in order: heading update, thrust/drag, position. Heading must change
//! before the thrust vector is computed from it or trajectories drift from
//! the source games.

use serde::{Deserialize, Serialize};

use super::state::{Entity, Player};
use super::tick::TickInput;
use crate::heading_vector;

/// Passive acceleration terms applied to every active entity in a pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Fraction of velocity shed per tick (0 = none)
    pub drag: f32,
}

/// How input steers the player, one scheme per game variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlScheme {
    /// Asteroids ship: turn in place, thrust along the heading, coast with
    /// drag when the thruster is off
    Rotational {
        /// Degrees per tick
        turn_rate: f32,
        /// Thrust acceleration per tick
        thrust: f32,
        drag: f32,
    },
    /// Flappy heli: a flap replaces vertical velocity, gravity pulls back
    Lift { gravity: f32, impulse: f32 },
    /// UFO: direct four-way movement at constant speed
    FourWay { speed: f32 },
    /// Ski slalom: horizontal steering only, the world scrolls past
    Slalom { speed: f32 },
}

/// Advance one pooled entity by one tick.
pub fn integrate(e: &mut Entity, profile: &MotionProfile) {
    e.vel.y += profile.gravity;
    e.vel *= 1.0 - profile.drag;
    e.pos += e.vel;
}

/// Steer and advance the player by one tick.
pub fn steer_player(p: &mut Player, scheme: &ControlScheme, input: &TickInput) {
    match *scheme {
        ControlScheme::Rotational {
            turn_rate,
            thrust,
            drag,
        } => {
            if input.move_right {
                p.heading += turn_rate;
            }
            if input.move_left {
                p.heading -= turn_rate;
            }
            if input.thrust {
                p.vel += heading_vector(p.heading) * thrust;
            } else {
                p.vel *= 1.0 - drag;
            }
            p.pos += p.vel;
        }
        ControlScheme::Lift { gravity, impulse } => {
            // Flap is edge-triggered by the host; it replaces vertical
            // velocity rather than adding to it.
            if input.thrust {
                p.vel.y = impulse;
            }
            p.vel.y += gravity;
            p.pos += p.vel;
        }
        ControlScheme::FourWay { speed } => {
            let mut dir = glam::Vec2::ZERO;
            if input.move_left {
                dir.x -= 1.0;
            }
            if input.move_right {
                dir.x += 1.0;
            }
            if input.move_up {
                dir.y -= 1.0;
            }
            if input.move_down {
                dir.y += 1.0;
            }
            p.vel = dir * speed;
            p.pos += p.vel;
        }
        ControlScheme::Slalom { speed } => {
            p.vel.x = if input.move_left {
                -speed
            } else if input.move_right {
                speed
            } else {
                0.0
            };
            p.vel.y = 0.0;
            p.pos += p.vel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Extent, Hitbox};
    use glam::Vec2;

    fn player() -> Player {
        Player {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            heading: 0.0,
            hitbox: Hitbox::circle(15.0),
            lives: 3,
            money: 0,
            score: 0,
            i_frames: 0,
        }
    }

    fn entity(vel: Vec2) -> Entity {
        Entity {
            pos: Vec2::new(50.0, 50.0),
            vel,
            extent: Extent::Circle { radius: 10.0 },
            ttl: 0,
            scored: false,
        }
    }

    #[test]
    fn test_integrate_plain_velocity() {
        let mut e = entity(Vec2::new(3.0, -2.0));
        integrate(&mut e, &MotionProfile::default());
        assert_eq!(e.pos, Vec2::new(53.0, 48.0));
    }

    #[test]
    fn test_integrate_gravity_applies_before_position() {
        let mut e = entity(Vec2::ZERO);
        let profile = MotionProfile {
            gravity: 0.5,
            drag: 0.0,
        };
        integrate(&mut e, &profile);
        // Velocity gained this tick already moves the entity this tick.
        assert!((e.pos.y - 50.5).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_drag_decays_velocity() {
        let mut e = entity(Vec2::new(10.0, 0.0));
        let profile = MotionProfile {
            gravity: 0.0,
            drag: 0.1,
        };
        integrate(&mut e, &profile);
        assert!((e.vel.x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotational_heading_updates_before_thrust() {
        let mut p = player();
        let scheme = ControlScheme::Rotational {
            turn_rate: 90.0,
            thrust: 1.0,
            drag: 0.0,
        };
        let input = TickInput {
            move_right: true,
            thrust: true,
            ..Default::default()
        };
        steer_player(&mut p, &scheme, &input);
        // Turned to 90 degrees first, so thrust points +x, not up.
        assert!((p.vel.x - 1.0).abs() < 1e-5);
        assert!(p.vel.y.abs() < 1e-5);
    }

    #[test]
    fn test_rotational_drag_only_when_coasting() {
        let mut p = player();
        p.vel = Vec2::new(10.0, 0.0);
        let scheme = ControlScheme::Rotational {
            turn_rate: 5.0,
            thrust: 0.15,
            drag: 0.5,
        };
        steer_player(&mut p, &scheme, &TickInput::default());
        assert!((p.vel.x - 5.0).abs() < 1e-5);

        let mut p2 = player();
        p2.vel = Vec2::new(10.0, 0.0);
        let input = TickInput {
            thrust: true,
            ..Default::default()
        };
        steer_player(&mut p2, &scheme, &input);
        // Thrusting: no drag, thrust added along heading (up).
        assert!((p2.vel.x - 10.0).abs() < 1e-5);
        assert!((p2.vel.y + 0.15).abs() < 1e-5);
    }

    #[test]
    fn test_lift_flap_replaces_vertical_velocity() {
        let mut p = player();
        p.vel.y = 7.0; // falling
        let scheme = ControlScheme::Lift {
            gravity: 0.5,
            impulse: -10.0,
        };
        let input = TickInput {
            thrust: true,
            ..Default::default()
        };
        steer_player(&mut p, &scheme, &input);
        assert!((p.vel.y + 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_four_way_stops_without_input() {
        let mut p = player();
        p.vel = Vec2::new(5.0, 5.0);
        steer_player(&mut p, &ControlScheme::FourWay { speed: 5.0 }, &TickInput::default());
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.pos, Vec2::new(100.0, 100.0));
    }
}
