//! Per-tick session update
//!
//! One call to [`tick`] advances the session by exactly one simulation tick.
//! The update order inside a running tick is fixed; collision runs on
//! post-move positions, so a hit and the move that caused it land on the
//! same tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boundary::{self, BoundaryPolicy, RespawnRule, Viewport, respawn};
use super::collision;
use super::motion;
use super::state::{Beam, Entity, EntityPool, Extent, Phase, Session, SimEvent};
use crate::heading_vector;
use crate::tuning::{FireMode, PoolRole, PoolSpec, SeedRule};

/// Edge-triggered and held input for one tick. The host owns key repeat and
/// edge detection; the sim just reads flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Thrust (rotational) or flap (lift); ignored by the other schemes
    pub thrust: bool,
    pub fire: bool,
    /// Pointer position for aimed (beam) fire; `None` leaves the trigger
    /// dead in beam variants
    pub aim: Option<Vec2>,
    /// Start a run from Idle, or restart after the grace period in Ended
    pub start_or_restart: bool,
    pub debug_toggle: bool,
}

/// Advance the session by one tick.
pub fn tick(s: &mut Session, input: &TickInput) {
    s.events.clear();
    if input.debug_toggle {
        s.debug = !s.debug;
    }
    s.time_ticks += 1;

    match s.phase {
        Phase::Idle => {
            s.ticks_in_phase += 1;
            if input.start_or_restart {
                start_run(s);
            }
        }
        Phase::Running => {
            s.ticks_in_phase += 1;
            run_tick(s, input);
        }
        Phase::Ended => {
            // Gate on the tick count from before this tick: with a grace of
            // N, the first tick that can restart is the one after N idle
            // Ended ticks.
            let grace_over = s.ticks_in_phase >= s.config.restart_grace_ticks;
            let auto = s
                .config
                .auto_restart_ticks
                .is_some_and(|t| s.ticks_in_phase >= t);
            if (grace_over && input.start_or_restart) || auto {
                s.set_phase(Phase::Idle);
            } else {
                s.ticks_in_phase += 1;
            }
        }
    }
}

/// Reset the player, roll the initial entity layout and enter Running.
fn start_run(s: &mut Session) {
    s.player.pos = s.config.player_start;
    s.player.vel = Vec2::ZERO;
    s.player.heading = 0.0;
    s.player.lives = s.config.starting_lives;
    s.player.money = 0;
    s.player.score = 0;
    s.player.i_frames = s.config.spawn_i_frames;
    s.fire_cooldown = 0;
    s.beam = None;
    s.final_score = 0;

    let vp = s.config.viewport;
    for (spec, pool) in s.config.pools.iter().zip(s.pools.iter_mut()) {
        seed_pool(spec, pool, vp, &mut s.rng);
    }
    s.set_phase(Phase::Running);
}

fn seed_pool(spec: &PoolSpec, pool: &mut EntityPool, vp: Viewport, rng: &mut Pcg32) {
    match &spec.seed {
        SeedRule::Parked => {
            for idx in 0..pool.slots.capacity() {
                pool.slots.deactivate(idx);
            }
        }
        SeedRule::Scatter(rule) => {
            for idx in 0..pool.slots.capacity() {
                pool.slots.activate(idx, Entity::parked());
                respawn(&mut pool.slots, idx, rule, rng);
            }
        }
        SeedRule::Staggered { lead_in, vel } => {
            let BoundaryPolicy::Recycle {
                rule:
                    RespawnRule::TrailingGap {
                        spacing,
                        width,
                        y,
                        gap,
                    },
                ..
            } = &spec.boundary
            else {
                log::warn!(
                    "{:?} pool: staggered seeding without a trailing-gap recycle",
                    pool.kind
                );
                for idx in 0..pool.slots.capacity() {
                    pool.slots.deactivate(idx);
                }
                return;
            };
            for idx in 0..pool.slots.capacity() {
                let e = Entity {
                    pos: Vec2::new(
                        vp.w + lead_in + idx as f32 * spacing,
                        rng.random_range(y.0..=y.1),
                    ),
                    vel: *vel,
                    extent: Extent::Gate {
                        width: *width,
                        gap: rng.random_range(gap.0..=gap.1),
                    },
                    ttl: 0,
                    scored: false,
                };
                pool.slots.activate(idx, e);
            }
        }
    }
}

fn run_tick(s: &mut Session, input: &TickInput) {
    s.fire_cooldown = s.fire_cooldown.saturating_sub(1);
    s.player.i_frames = s.player.i_frames.saturating_sub(1);
    if let Some(b) = &mut s.beam {
        b.ticks_left -= 1;
    }
    if s.beam.is_some_and(|b| b.ticks_left == 0) {
        s.beam = None;
    }

    // Survival pay: a point every interval spent in Running.
    if let Some(interval) = s.config.score_interval_ticks {
        if s.ticks_in_phase % interval == 0 {
            s.player.score += 1;
        }
    }

    // Player moves first, pools after; both settle against their
    // boundaries before collision looks at anything.
    motion::steer_player(&mut s.player, &s.config.control, input);
    boundary::apply_to_point(
        &s.config.player_boundary,
        &mut s.player.pos,
        &mut s.player.vel,
        s.config.viewport,
    );

    let vp = s.config.viewport;
    for (spec, pool) in s.config.pools.iter().zip(s.pools.iter_mut()) {
        for (_, e) in pool.slots.iter_active_mut() {
            motion::integrate(e, &spec.motion);
        }
        if matches!(spec.role, PoolRole::Projectile) {
            for idx in 0..pool.slots.capacity() {
                // ttl 0 means no lifetime; only a timer that was running
                // can expire.
                let expired = pool
                    .slots
                    .get_mut(idx)
                    .map(|e| {
                        if e.ttl == 0 {
                            return false;
                        }
                        e.ttl -= 1;
                        e.ttl == 0
                    })
                    .unwrap_or(false);
                if expired {
                    pool.slots.deactivate(idx);
                }
            }
        }
        boundary::apply_to_pool(&mut pool.slots, &spec.boundary, vp, &mut s.rng);
    }

    handle_fire(s, input);
    score_passes(s);

    collision::resolve_player_obstacles(
        &mut s.player,
        &mut s.pools,
        &s.config,
        &mut s.rng,
        &mut s.events,
    );
    collision::resolve_projectiles(
        &mut s.pools,
        &mut s.player,
        &s.config,
        &mut s.rng,
        &mut s.events,
    );
    if let Some(beam) = s.beam {
        collision::resolve_beam(
            &mut s.player,
            beam.end,
            &mut s.pools,
            &s.config,
            &mut s.rng,
            &mut s.events,
        );
    }

    let out_of_lives = s.config.lives_floor.is_some_and(|f| s.player.lives <= f);
    let bankrupt = s.config.bankruptcy_floor.is_some_and(|f| s.player.money < f);
    if out_of_lives || bankrupt {
        s.final_score = s.player.score;
        log::info!(
            "run over at tick {}: score {}, money {}",
            s.time_ticks,
            s.final_score,
            s.player.money
        );
        s.set_phase(Phase::Ended);
    }
}

/// Resolve a fire request into a pooled projectile or a lit beam,
/// depending on the variant's fire mode. A full projectile pool drops the
/// shot; a beam without money (or without an aim point) stays dark.
fn handle_fire(s: &mut Session, input: &TickInput) {
    let Some(mode) = s.config.fire else { return };
    if !input.fire || s.fire_cooldown > 0 {
        return;
    }
    match mode {
        FireMode::Projectile(fire) => {
            let Some(pi) = s
                .config
                .pools
                .iter()
                .position(|spec| matches!(spec.role, PoolRole::Projectile))
            else {
                return;
            };
            let shot = Entity {
                pos: s.player.pos,
                vel: heading_vector(s.player.heading) * fire.speed,
                extent: Extent::Circle {
                    radius: fire.radius,
                },
                ttl: fire.ttl_ticks,
                scored: false,
            };
            match s.pools[pi].slots.allocate(shot) {
                Ok(slot) => {
                    s.fire_cooldown = fire.cooldown_ticks;
                    s.events.push(SimEvent::Fired { slot });
                }
                Err(e) => log::debug!("shot dropped: {e}"),
            }
        }
        FireMode::Beam(beam) => {
            let Some(aim) = input.aim else { return };
            if s.player.money < beam.cost {
                return;
            }
            s.player.money -= beam.cost;
            s.beam = Some(Beam {
                end: aim,
                ticks_left: beam.duration_ticks,
            });
            s.fire_cooldown = beam.duration_ticks;
            s.events.push(SimEvent::BeamFired);
        }
    }
}

/// Award a point the first time the player clears a scoring gate.
fn score_passes(s: &mut Session) {
    for (spec, pool) in s.config.pools.iter().zip(s.pools.iter_mut()) {
        if !matches!(
            spec.role,
            PoolRole::Obstacle {
                score_on_pass: true,
                ..
            }
        ) {
            continue;
        }
        for (idx, e) in pool.slots.iter_active_mut() {
            let Extent::Gate { width, .. } = e.extent else {
                continue;
            };
            if !e.scored && s.player.pos.x > e.pos.x + width {
                e.scored = true;
                s.player.score += 1;
                s.events.push(SimEvent::PassScored { slot: idx });
            }
        }
    }
}
