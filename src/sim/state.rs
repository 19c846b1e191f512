//! Game state and core simulation types
//!
//! Everything the host needs to snapshot, serialize or replay a run lives
//! here. State is mutated by `tick` only; the render side gets read-only
//! draw commands.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::FixedPool;
use super::{ConfigError, Viewport};
use crate::consts::PARK_POS;
use crate::tuning::SessionConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Awaiting start input
    Idle,
    /// Simulation active
    Running,
    /// Run over; restart gated by a grace period
    Ended,
}

/// What a pool holds, used to route draw commands and collision behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Rock,
    DebtRock,
    Laser,
    Pipe,
    Tree,
    Coin,
}

/// Collision footprint of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    Circle { radius: f32 },
    Rect { half: Vec2 },
    /// Vertical obstacle pair with an opening: spans the full viewport height
    /// except for a `gap` ending at the entity's y (flappy pipes). The
    /// entity position is the left edge / top of the lower obstacle.
    Gate { width: f32, gap: f32 },
}

/// One pooled game object. Slot index is its identity; slots are recycled in
/// place, so none of this is stable across a respawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Vec2,
    pub vel: Vec2,
    pub extent: Extent,
    /// Ticks left before a projectile burns out (0 = no lifetime)
    pub ttl: u32,
    /// Set once the player has been awarded a pass-score for this entity;
    /// cleared on every respawn
    pub scored: bool,
}

impl Entity {
    /// Inactive placeholder, parked off-screen like the source's laser slots.
    pub fn parked() -> Self {
        Self {
            pos: PARK_POS,
            vel: Vec2::ZERO,
            extent: Extent::Circle { radius: 0.0 },
            ttl: 0,
            scored: false,
        }
    }

    /// Collision radius for circular entities (0 for other shapes).
    pub fn radius(&self) -> f32 {
        match self.extent {
            Extent::Circle { radius } => radius,
            _ => 0.0,
        }
    }
}

/// Player hitbox: a shape deliberately smaller than (and offset from) the
/// sprite, tuned per variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub extent: Extent,
    pub offset: Vec2,
}

impl Hitbox {
    pub fn circle(radius: f32) -> Self {
        Self {
            extent: Extent::Circle { radius },
            offset: Vec2::ZERO,
        }
    }

    pub fn rect(half: Vec2, offset: Vec2) -> Self {
        Self {
            extent: Extent::Rect { half },
            offset,
        }
    }
}

/// The player craft (ship, heli, UFO or skier, depending on variant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in degrees, 0 = up, clockwise positive
    pub heading: f32,
    pub hitbox: Hitbox,
    pub lives: i32,
    pub money: i64,
    pub score: u64,
    /// Invulnerability countdown; collisions are suppressed while > 0
    pub i_frames: u32,
}

impl Player {
    /// Hitbox center in world space.
    pub fn hit_pos(&self) -> Vec2 {
        self.pos + self.hitbox.offset
    }
}

/// An aimed laser in flight. The near end is the player's position each
/// tick; the far end stays where the shot was aimed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// Fire-time aim point
    pub end: Vec2,
    pub ticks_left: u32,
}

/// One entity kind's runtime slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool {
    pub kind: EntityKind,
    pub slots: FixedPool<Entity>,
}

/// Things that happened during a tick, drained by the host for sound/UI.
/// Purely informational; gameplay never reads these back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    PhaseChanged { from: Phase, to: Phase },
    PlayerHit { kind: EntityKind },
    Collected { kind: EntityKind, reward: i64 },
    TargetChipped { kind: EntityKind, slot: usize, reward: i64 },
    TargetRespawned { kind: EntityKind, slot: usize },
    PassScored { slot: usize },
    Fired { slot: usize },
    BeamFired,
}

/// One draw call's worth of state, handed to the render collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmd {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub extent: Extent,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub config: SessionConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: Phase,
    /// Ticks spent in the current phase; zeroed on every transition
    pub ticks_in_phase: u32,
    /// Total ticks since session creation
    pub time_ticks: u64,
    pub player: Player,
    /// One pool per `config.pools` entry, same order
    pub pools: Vec<EntityPool>,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    /// Active aimed laser, if the variant fires beams. The host draws the
    /// segment from `player.pos` to `beam.end` itself; `draw_list` only
    /// covers pooled shapes.
    pub beam: Option<Beam>,
    /// Score captured when the run ended
    pub final_score: u64,
    pub debug: bool,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl Session {
    /// Validate `config` and build an idle session. Pools start with every
    /// slot inactive; the initial layout is rolled when a run starts.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut pools = Vec::with_capacity(config.pools.len());
        for spec in &config.pools {
            pools.push(EntityPool {
                kind: spec.kind,
                slots: FixedPool::new(spec.capacity, |_| Entity::parked())?,
            });
        }

        let player = Player {
            pos: config.player_start,
            vel: Vec2::ZERO,
            heading: 0.0,
            hitbox: config.player_hitbox,
            lives: config.starting_lives,
            money: 0,
            score: 0,
            i_frames: 0,
        };

        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Idle,
            ticks_in_phase: 0,
            time_ticks: 0,
            player,
            pools,
            fire_cooldown: 0,
            beam: None,
            final_score: 0,
            debug: false,
            events: Vec::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    /// Whether the player sprite should be drawn this tick. During i-frames
    /// the sprite flickers on a 10-tick cycle, exactly as the source games
    /// did it.
    pub fn player_visible(&self) -> bool {
        self.player.i_frames == 0 || self.player.i_frames % 10 < 5
    }

    /// Per-tick draw snapshot: every active entity in pool order, then the
    /// player (when visible). The core never draws; the host consumes this.
    pub fn draw_list(&self) -> Vec<DrawCmd> {
        let mut cmds = Vec::new();
        for pool in &self.pools {
            for (_, e) in pool.slots.iter_active() {
                cmds.push(DrawCmd {
                    kind: pool.kind,
                    pos: e.pos,
                    extent: e.extent,
                });
            }
        }
        if self.player_visible() {
            cmds.push(DrawCmd {
                kind: EntityKind::Player,
                pos: self.player.pos,
                extent: self.player.hitbox.extent,
            });
        }
        cmds
    }

    pub(crate) fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from != to {
            log::info!("phase {from:?} -> {to:?} (tick {})", self.time_ticks);
            self.events.push(SimEvent::PhaseChanged { from, to });
            self.phase = to;
            self.ticks_in_phase = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Variant;

    fn session() -> Session {
        let config = Variant::DebtCollector.config(Viewport::new(800.0, 600.0));
        Session::new(config, 7).unwrap()
    }

    #[test]
    fn test_new_session_is_idle_and_parked() {
        let s = session();
        assert_eq!(s.phase, Phase::Idle);
        for pool in &s.pools {
            assert_eq!(pool.slots.active_count(), 0);
        }
        // No entities drawn yet, just the player.
        let cmds = s.draw_list();
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].kind, EntityKind::Player);
    }

    #[test]
    fn test_player_flicker_during_i_frames() {
        let mut s = session();
        s.player.i_frames = 0;
        assert!(s.player_visible());
        s.player.i_frames = 13; // 13 % 10 = 3 < 5 -> drawn
        assert!(s.player_visible());
        s.player.i_frames = 17; // 17 % 10 = 7 -> hidden
        assert!(!s.player_visible());
    }

    #[test]
    fn test_session_serde_round_trip() {
        let s = session();
        let json = serde_json::to_string(&s).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, s.phase);
        assert_eq!(back.seed, s.seed);
        assert_eq!(back.pools.len(), s.pools.len());
    }
}
