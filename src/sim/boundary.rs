//! Viewport boundary policies
//!
//! Evaluated after motion, once per active entity. Four policies cover the
//! source games: toroidal wrap (ship, rocks, lasers), clamp into a lane
//! (heli, UFO), elastic bounce (UFO rock), and recycle-with-respawn
//! (pipes, trees). Comparisons are strict so an entity sitting exactly on
//! an edge is still in play.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::FixedPool;
use super::state::{Entity, Extent};

/// Playfield dimensions. The origin is the top-left corner; y grows down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub w: f32,
    pub h: f32,
}

impl Viewport {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.w / 2.0, self.h / 2.0)
    }
}

/// Which edge counts as "gone" for a recycling pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// How a recycled slot re-enters play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RespawnRule {
    /// Fresh randomized placement, size and velocity (rocks, trees, coins).
    /// All ranges are inclusive.
    Scatter {
        x: (f32, f32),
        y: (f32, f32),
        radius: (f32, f32),
        speed_x: (f32, f32),
        speed_y: (f32, f32),
    },
    /// Reposition just past the furthest sibling so spacing stays even
    /// (flappy pipes): new x = max(active sibling x) + spacing.
    TrailingGap {
        spacing: f32,
        width: f32,
        y: (f32, f32),
        gap: (f32, f32),
    },
}

/// Per-pool edge behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Toroidal space: crossing one edge teleports to the opposite edge
    Wrap,
    /// Constrain position into a sub-rect
    Clamp { min: Vec2, max: Vec2 },
    /// Pin to the crossed edge and invert that velocity component
    Bounce,
    /// Once fully past `exit`, respawn via `rule`
    Recycle { exit: Edge, rule: RespawnRule },
}

/// Wrap/clamp/bounce for a single point body (also used for the player).
/// `Recycle` is a no-op here; it only makes sense pool-wide.
pub fn apply_to_point(policy: &BoundaryPolicy, pos: &mut Vec2, vel: &mut Vec2, vp: Viewport) {
    match policy {
        BoundaryPolicy::Wrap => {
            if pos.x < 0.0 {
                pos.x = vp.w;
            } else if pos.x > vp.w {
                pos.x = 0.0;
            }
            if pos.y < 0.0 {
                pos.y = vp.h;
            } else if pos.y > vp.h {
                pos.y = 0.0;
            }
        }
        BoundaryPolicy::Clamp { min, max } => {
            *pos = pos.clamp(*min, *max);
        }
        BoundaryPolicy::Bounce => {
            if pos.x < 0.0 {
                pos.x = 0.0;
                vel.x = -vel.x;
            } else if pos.x > vp.w {
                pos.x = vp.w;
                vel.x = -vel.x;
            }
            if pos.y < 0.0 {
                pos.y = 0.0;
                vel.y = -vel.y;
            } else if pos.y > vp.h {
                pos.y = vp.h;
                vel.y = -vel.y;
            }
        }
        BoundaryPolicy::Recycle { .. } => {}
    }
}

/// Apply a pool's boundary policy to every active entity.
pub fn apply_to_pool(
    slots: &mut FixedPool<Entity>,
    policy: &BoundaryPolicy,
    vp: Viewport,
    rng: &mut Pcg32,
) {
    match policy {
        BoundaryPolicy::Recycle { exit, rule } => {
            for idx in 0..slots.capacity() {
                let gone = slots
                    .get(idx)
                    .map(|e| fully_past(e, *exit, vp))
                    .unwrap_or(false);
                if gone {
                    respawn(slots, idx, rule, rng);
                }
            }
        }
        _ => {
            for (_, e) in slots.iter_active_mut() {
                apply_to_point(policy, &mut e.pos, &mut e.vel, vp);
            }
        }
    }
}

/// Respawn the entity in slot `idx` according to `rule`. Also called by the
/// collision resolver when a chipped target drops below its minimum size.
pub fn respawn(slots: &mut FixedPool<Entity>, idx: usize, rule: &RespawnRule, rng: &mut Pcg32) {
    match rule {
        RespawnRule::Scatter {
            x,
            y,
            radius,
            speed_x,
            speed_y,
        } => {
            if let Some(e) = slots.get_mut(idx) {
                e.pos = Vec2::new(rng.random_range(x.0..=x.1), rng.random_range(y.0..=y.1));
                e.extent = Extent::Circle {
                    radius: rng.random_range(radius.0..=radius.1),
                };
                e.vel = Vec2::new(
                    rng.random_range(speed_x.0..=speed_x.1),
                    rng.random_range(speed_y.0..=speed_y.1),
                );
                e.ttl = 0;
                e.scored = false;
            }
        }
        RespawnRule::TrailingGap {
            spacing,
            width,
            y,
            gap,
        } => {
            // The recycling entity is far negative by now, so including it in
            // the max is harmless -- same as the source's rightmost-pipe scan.
            let max_x = slots
                .iter_active()
                .map(|(_, e)| e.pos.x)
                .fold(f32::NEG_INFINITY, f32::max);
            if let Some(e) = slots.get_mut(idx) {
                let base = if max_x.is_finite() { max_x } else { 0.0 };
                e.pos = Vec2::new(base + spacing, rng.random_range(y.0..=y.1));
                e.extent = Extent::Gate {
                    width: *width,
                    gap: rng.random_range(gap.0..=gap.1),
                };
                e.ttl = 0;
                e.scored = false;
            }
        }
    }
}

/// True once no part of the entity remains on-screen past `edge`.
fn fully_past(e: &Entity, edge: Edge, vp: Viewport) -> bool {
    let (reach_x, reach_y) = match e.extent {
        Extent::Circle { radius } => (radius, radius),
        Extent::Rect { half } => (half.x, half.y),
        // A gate's position is its left edge: its horizontal span is
        // [pos.x, pos.x + width]. It covers the full viewport height, so it
        // never exits vertically.
        Extent::Gate { width, .. } => {
            return match edge {
                Edge::Left => e.pos.x + width < 0.0,
                Edge::Right => e.pos.x > vp.w,
                Edge::Top | Edge::Bottom => false,
            };
        }
    };
    match edge {
        Edge::Left => e.pos.x + reach_x < 0.0,
        Edge::Right => e.pos.x - reach_x > vp.w,
        Edge::Top => e.pos.y + reach_y < 0.0,
        Edge::Bottom => e.pos.y - reach_y > vp.h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn vp() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn circle_at(x: f32, y: f32, radius: f32) -> Entity {
        Entity {
            pos: Vec2::new(x, y),
            vel: Vec2::new(-5.0, 0.0),
            extent: Extent::Circle { radius },
            ttl: 0,
            scored: false,
        }
    }

    fn gate_at(x: f32) -> Entity {
        Entity {
            pos: Vec2::new(x, 300.0),
            vel: Vec2::new(-5.0, 0.0),
            extent: Extent::Gate {
                width: 100.0,
                gap: 300.0,
            },
            ttl: 0,
            scored: true,
        }
    }

    #[test]
    fn test_wrap_is_exact() {
        let mut pos = Vec2::new(-0.1, 300.0);
        let mut vel = Vec2::new(-2.0, 0.0);
        apply_to_point(&BoundaryPolicy::Wrap, &mut pos, &mut vel, vp());
        // Trailing edge crossed -> exactly the leading edge, no overshoot.
        assert_eq!(pos.x, 800.0);
        assert_eq!(pos.y, 300.0);
        assert_eq!(vel, Vec2::new(-2.0, 0.0));

        let mut pos = Vec2::new(400.0, 600.3);
        let mut vel = Vec2::ZERO;
        apply_to_point(&BoundaryPolicy::Wrap, &mut pos, &mut vel, vp());
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn test_wrap_leaves_on_screen_positions_alone() {
        let mut pos = Vec2::new(0.0, 600.0); // exactly on the edges
        let mut vel = Vec2::ZERO;
        apply_to_point(&BoundaryPolicy::Wrap, &mut pos, &mut vel, vp());
        assert_eq!(pos, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_bounce_pins_and_inverts() {
        let mut pos = Vec2::new(805.0, -3.0);
        let mut vel = Vec2::new(4.0, -2.0);
        apply_to_point(&BoundaryPolicy::Bounce, &mut pos, &mut vel, vp());
        assert_eq!(pos, Vec2::new(800.0, 0.0));
        assert_eq!(vel, Vec2::new(-4.0, 2.0));
    }

    #[test]
    fn test_clamp_constrains_into_lane() {
        let policy = BoundaryPolicy::Clamp {
            min: Vec2::new(0.0, 50.0),
            max: Vec2::new(800.0, 500.0),
        };
        let mut pos = Vec2::new(400.0, 700.0);
        let mut vel = Vec2::new(0.0, 9.0);
        apply_to_point(&policy, &mut pos, &mut vel, vp());
        assert_eq!(pos, Vec2::new(400.0, 500.0));
        // Velocity survives; next flap still has to fight it.
        assert_eq!(vel.y, 9.0);
    }

    #[test]
    fn test_trailing_gap_respawn_spacing_is_exact() {
        // Scenario: siblings at 100/250/400, spacing 450, one gate fully
        // past the left edge -> respawns at 400 + 450 = 850.
        let mut rng = Pcg32::seed_from_u64(1);
        let mut slots = FixedPool::new(4, |_| Entity::parked()).unwrap();
        for x in [100.0, 250.0, 400.0, -100.5] {
            slots.allocate(gate_at(x)).unwrap();
        }
        let policy = BoundaryPolicy::Recycle {
            exit: Edge::Left,
            rule: RespawnRule::TrailingGap {
                spacing: 450.0,
                width: 100.0,
                y: (200.0, 400.0),
                gap: (250.0, 400.0),
            },
        };
        apply_to_pool(&mut slots, &policy, vp(), &mut rng);

        let e = slots.get(3).unwrap();
        assert_eq!(e.pos.x, 850.0);
        assert!(!e.scored, "respawn must clear the scored flag");
        // The on-screen siblings did not move.
        assert_eq!(slots.get(0).unwrap().pos.x, 100.0);
    }

    #[test]
    fn test_gate_at_exactly_minus_width_is_not_recycled() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut slots = FixedPool::new(1, |_| Entity::parked()).unwrap();
        slots.allocate(gate_at(-100.0)).unwrap();
        let policy = BoundaryPolicy::Recycle {
            exit: Edge::Left,
            rule: RespawnRule::TrailingGap {
                spacing: 450.0,
                width: 100.0,
                y: (200.0, 400.0),
                gap: (250.0, 400.0),
            },
        };
        apply_to_pool(&mut slots, &policy, vp(), &mut rng);
        // Strict comparison: x + width == 0 is still in play.
        assert_eq!(slots.get(0).unwrap().pos.x, -100.0);
    }

    #[test]
    fn test_gate_past_the_right_edge_is_recycled() {
        // The gate's pos is its left edge, so pos.x just past the viewport
        // width means the whole gate is off-screen to the right.
        let mut rng = Pcg32::seed_from_u64(1);
        let mut slots = FixedPool::new(2, |_| Entity::parked()).unwrap();
        slots.allocate(gate_at(700.0)).unwrap();
        slots.allocate(gate_at(800.5)).unwrap();
        let policy = BoundaryPolicy::Recycle {
            exit: Edge::Right,
            rule: RespawnRule::TrailingGap {
                spacing: 450.0,
                width: 100.0,
                y: (200.0, 400.0),
                gap: (250.0, 400.0),
            },
        };
        apply_to_pool(&mut slots, &policy, vp(), &mut rng);

        // Still partly on-screen at 700..800: stays put.
        assert_eq!(slots.get(0).unwrap().pos.x, 700.0);
        // Fully past: respawned one spacing behind the furthest gate
        // (itself, at 800.5, being the furthest here).
        assert_eq!(slots.get(1).unwrap().pos.x, 800.5 + 450.0);
    }

    #[test]
    fn test_scatter_respawn_lands_in_ranges() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut slots = FixedPool::new(1, |_| Entity::parked()).unwrap();
        let mut e = circle_at(400.0, -30.0, 20.0);
        e.scored = true;
        slots.allocate(e).unwrap();

        let rule = RespawnRule::Scatter {
            x: (0.0, 800.0),
            y: (600.0, 800.0),
            radius: (15.0, 50.0),
            speed_x: (-5.0, 5.0),
            speed_y: (-6.0, -6.0),
        };
        let policy = BoundaryPolicy::Recycle {
            exit: Edge::Top,
            rule: rule.clone(),
        };
        apply_to_pool(&mut slots, &policy, vp(), &mut rng);

        let e = slots.get(0).unwrap();
        assert!((0.0..=800.0).contains(&e.pos.x));
        assert!((600.0..=800.0).contains(&e.pos.y));
        assert!(e.radius() >= 15.0 && e.radius() <= 50.0);
        assert_eq!(e.vel.y, -6.0);
        assert!(!e.scored);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wrap_always_lands_inside(x in -1000.0f32..2000.0, y in -1000.0f32..2000.0) {
                let mut pos = Vec2::new(x, y);
                let mut vel = Vec2::ZERO;
                apply_to_point(&BoundaryPolicy::Wrap, &mut pos, &mut vel, Viewport::new(800.0, 600.0));
                prop_assert!((0.0..=800.0).contains(&pos.x));
                prop_assert!((0.0..=600.0).contains(&pos.y));
            }

            #[test]
            fn trailing_gap_equals_max_plus_spacing(
                xs in proptest::collection::vec(0.0f32..2000.0, 1..6),
                spacing in 1.0f32..1000.0,
            ) {
                let mut rng = Pcg32::seed_from_u64(9);
                let mut slots = FixedPool::new(xs.len() + 1, |_| Entity::parked()).unwrap();
                for &x in &xs {
                    slots.allocate(gate_at(x)).unwrap();
                }
                slots.allocate(gate_at(-200.0)).unwrap();
                let rule = RespawnRule::TrailingGap {
                    spacing,
                    width: 100.0,
                    y: (200.0, 400.0),
                    gap: (250.0, 400.0),
                };
                respawn(&mut slots, xs.len(), &rule, &mut rng);
                let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                prop_assert_eq!(slots.get(xs.len()).unwrap().pos.x, max + spacing);
            }
        }
    }
}
