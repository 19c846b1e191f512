//! Collision detection and response
//!
//! Geometry tests use strict inequalities throughout: two shapes exactly
//! touching do not collide. That matches the source games and keeps
//! boundary-sitting entities (and tests) deterministic.
//!
//! Resolution order is pool order, then slot order. The first overlapping
//! entity wins; reproducible runs depend on never reordering these scans.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::boundary::respawn;
use super::state::{EntityPool, Extent, Player, SimEvent};
use crate::tuning::{ChipRule, PlayerImpact, PoolRole, SessionConfig};

/// Circle vs circle: center distance strictly under the radius sum.
#[inline]
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Axis-aligned rect (center + half extents) vs circle.
#[inline]
pub fn rect_circle(rect_center: Vec2, half: Vec2, c: Vec2, r: f32) -> bool {
    let closest = c.clamp(rect_center - half, rect_center + half);
    closest.distance_squared(c) < r * r
}

/// Axis-aligned rect vs rect.
#[inline]
pub fn rect_rect(ac: Vec2, ah: Vec2, bc: Vec2, bh: Vec2) -> bool {
    (ac.x - bc.x).abs() < ah.x + bh.x && (ac.y - bc.y).abs() < ah.y + bh.y
}

/// Line segment vs circle: closest point on the segment strictly inside.
pub fn segment_circle(p0: Vec2, p1: Vec2, c: Vec2, r: f32) -> bool {
    let seg = p1 - p0;
    let len_sq = seg.length_squared();
    if len_sq < 1e-8 {
        return circle_circle(p0, 0.0, c, r);
    }
    let t = ((c - p0).dot(seg) / len_sq).clamp(0.0, 1.0);
    let closest = p0 + seg * t;
    closest.distance_squared(c) < r * r
}

/// Rect vs a gate: a full-height obstacle pair with an opening of height
/// `gap` ending at `gate_pos.y`. `gate_pos.x` is the gate's left edge.
pub fn rect_gate(rect_center: Vec2, half: Vec2, gate_pos: Vec2, width: f32, gap: f32) -> bool {
    let over_gate = rect_center.x + half.x > gate_pos.x && rect_center.x - half.x < gate_pos.x + width;
    if !over_gate {
        return false;
    }
    // Hit if any part pokes above the opening or below it.
    rect_center.y - half.y < gate_pos.y - gap || rect_center.y + half.y > gate_pos.y
}

/// Shape-dispatching overlap test.
pub fn overlaps(ap: Vec2, ae: Extent, bp: Vec2, be: Extent) -> bool {
    use Extent::*;
    match (ae, be) {
        (Circle { radius: ra }, Circle { radius: rb }) => circle_circle(ap, ra, bp, rb),
        (Circle { radius }, Rect { half }) => rect_circle(bp, half, ap, radius),
        (Rect { half }, Circle { radius }) => rect_circle(ap, half, bp, radius),
        (Rect { half: ah }, Rect { half: bh }) => rect_rect(ap, ah, bp, bh),
        (Rect { half }, Gate { width, gap }) => rect_gate(ap, half, bp, width, gap),
        (Gate { width, gap }, Rect { half }) => rect_gate(bp, half, ap, width, gap),
        // A circle against a gate collides as its bounding square.
        (Circle { radius }, Gate { width, gap }) => {
            rect_gate(ap, Vec2::splat(radius), bp, width, gap)
        }
        (Gate { width, gap }, Circle { radius }) => {
            rect_gate(bp, Vec2::splat(radius), ap, width, gap)
        }
        (Gate { .. }, Gate { .. }) => false,
    }
}

/// Player vs every obstacle pool, in pool order. Skipped entirely during
/// i-frames. The first damaging hit wins and stops the scan; collects
/// (coins) keep scanning.
pub(crate) fn resolve_player_obstacles(
    player: &mut Player,
    pools: &mut [EntityPool],
    cfg: &SessionConfig,
    rng: &mut Pcg32,
    events: &mut Vec<SimEvent>,
) {
    if player.i_frames > 0 {
        return;
    }

    for (spec, pool) in cfg.pools.iter().zip(pools.iter_mut()) {
        let PoolRole::Obstacle { impact, chip, .. } = &spec.role else {
            continue;
        };
        for idx in 0..pool.slots.capacity() {
            let Some(e) = pool.slots.get(idx).copied() else {
                continue;
            };
            // Freshly depleted targets are out of play until they respawn.
            if let Some(chip) = chip {
                if e.radius() <= chip.min_radius {
                    continue;
                }
            }
            if !overlaps(player.hit_pos(), player.hitbox.extent, e.pos, e.extent) {
                continue;
            }
            match impact {
                PlayerImpact::Collect {
                    reward,
                    score,
                    respawn: rule,
                } => {
                    let amount = rng.random_range(reward.0..reward.1);
                    player.money += amount;
                    player.score += *score;
                    events.push(SimEvent::Collected {
                        kind: pool.kind,
                        reward: amount,
                    });
                    respawn(&mut pool.slots, idx, rule, rng);
                }
                PlayerImpact::LoseLife => {
                    player.lives -= 1;
                    log::debug!(
                        "player hit by {:?}[{idx}], lives now {}",
                        pool.kind,
                        player.lives
                    );
                    events.push(SimEvent::PlayerHit { kind: pool.kind });
                    apply_hit_feedback(player, cfg);
                    return;
                }
                PlayerImpact::MoneyPenalty { amount } => {
                    player.money -= amount;
                    log::debug!(
                        "player hit by {:?}[{idx}], money now {}",
                        pool.kind,
                        player.money
                    );
                    events.push(SimEvent::PlayerHit { kind: pool.kind });
                    apply_hit_feedback(player, cfg);
                    return;
                }
            }
        }
    }
}

fn apply_hit_feedback(player: &mut Player, cfg: &SessionConfig) {
    player.i_frames = cfg.i_frame_ticks;
    if cfg.recoil_to_start {
        player.vel = -player.vel;
        player.pos = cfg.player_start;
    }
}

/// Every active projectile vs every chippable target pool. A projectile is
/// single-use: its first hit deactivates it and ends its scan.
pub(crate) fn resolve_projectiles(
    pools: &mut [EntityPool],
    player: &mut Player,
    cfg: &SessionConfig,
    rng: &mut Pcg32,
    events: &mut Vec<SimEvent>,
) {
    let projectile_pools: Vec<usize> = cfg
        .pools
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s.role, PoolRole::Projectile))
        .map(|(i, _)| i)
        .collect();
    let target_pools: Vec<usize> = cfg
        .pools
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            matches!(
                s.role,
                PoolRole::Obstacle { chip: Some(_), .. }
            )
        })
        .map(|(i, _)| i)
        .collect();

    for &pi in &projectile_pools {
        for slot in 0..pools[pi].slots.capacity() {
            'targets: for &ti in &target_pools {
                let (proj_pool, target_pool) = pair_mut(pools, pi, ti);
                let Some(p) = proj_pool.slots.get(slot).copied() else {
                    // Inactive (or already spent this tick): nothing to scan.
                    break 'targets;
                };
                let PoolRole::Obstacle {
                    chip: Some(chip), ..
                } = &cfg.pools[ti].role
                else {
                    continue 'targets;
                };

                for t_idx in 0..target_pool.slots.capacity() {
                    let Some(t) = target_pool.slots.get(t_idx).copied() else {
                        continue;
                    };
                    if t.radius() <= 0.0 {
                        continue;
                    }
                    if !circle_circle(p.pos, p.radius(), t.pos, t.radius()) {
                        continue;
                    }

                    proj_pool.slots.deactivate(slot);
                    chip_target(target_pool, t_idx, chip, player, rng, events);
                    break 'targets;
                }
            }
        }
    }
}

/// Shave one hit off the target in `pool[t_idx]`, pay the reward, and
/// respawn it once it drops to the minimum size.
fn chip_target(
    pool: &mut EntityPool,
    t_idx: usize,
    chip: &ChipRule,
    player: &mut Player,
    rng: &mut Pcg32,
    events: &mut Vec<SimEvent>,
) {
    let kind = pool.kind;
    let reward = rng.random_range(chip.reward.0..chip.reward.1);
    player.money += reward;
    events.push(SimEvent::TargetChipped {
        kind,
        slot: t_idx,
        reward,
    });

    let mut depleted = false;
    if let Some(t) = pool.slots.get_mut(t_idx) {
        if let Extent::Circle { radius } = &mut t.extent {
            *radius -= chip.chip;
            depleted = *radius <= chip.min_radius;
        }
    }
    if depleted {
        respawn(&mut pool.slots, t_idx, &chip.respawn, rng);
        events.push(SimEvent::TargetRespawned { kind, slot: t_idx });
    }
}

/// An active beam against every chippable target pool. The segment runs
/// from the player to the fire-time aim point and wears down the first
/// target it crosses, once per tick it stays lit.
pub(crate) fn resolve_beam(
    player: &mut Player,
    beam_end: Vec2,
    pools: &mut [EntityPool],
    cfg: &SessionConfig,
    rng: &mut Pcg32,
    events: &mut Vec<SimEvent>,
) {
    for (spec, pool) in cfg.pools.iter().zip(pools.iter_mut()) {
        let PoolRole::Obstacle {
            chip: Some(chip), ..
        } = &spec.role
        else {
            continue;
        };
        for t_idx in 0..pool.slots.capacity() {
            let Some(t) = pool.slots.get(t_idx).copied() else {
                continue;
            };
            if t.radius() <= 0.0 {
                continue;
            }
            if !segment_circle(player.pos, beam_end, t.pos, t.radius()) {
                continue;
            }
            chip_target(pool, t_idx, chip, player, rng, events);
            return;
        }
    }
}

/// Disjoint mutable borrows of two pool slots.
fn pair_mut<T>(xs: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = xs.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = xs.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}
