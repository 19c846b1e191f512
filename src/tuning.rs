//! Data-driven game balance
//!
//! Every number the source games hardcoded lives here as a config field or a
//! named constant, including the ones the builds disagreed on (bankruptcy
//! floor, chip amount). A [`SessionConfig`] fully describes one game variant;
//! [`Variant`] builds the four shipped ones from a viewport.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ConfigError;
use crate::sim::boundary::{BoundaryPolicy, Edge, RespawnRule, Viewport};
use crate::sim::motion::{ControlScheme, MotionProfile};
use crate::sim::state::{EntityKind, Hitbox};

/// How projectiles wear a target down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipRule {
    /// Radius removed per hit
    pub chip: f32,
    /// At or below this radius the target respawns
    pub min_radius: f32,
    /// Money awarded per chip, uniform in `reward.0..reward.1`
    pub reward: (i64, i64),
    /// How the depleted target re-enters play
    pub respawn: RespawnRule,
}

/// What touching the player does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerImpact {
    /// Costs a life, starts i-frames
    LoseLife,
    /// Costs money, starts i-frames (debt rocks)
    MoneyPenalty { amount: i64 },
    /// Pays out and respawns the entity; no i-frames (coins)
    Collect {
        reward: (i64, i64),
        /// Points per pickup (ski coins score, UFO coins only pay)
        score: u64,
        respawn: RespawnRule,
    },
}

/// Collision role of a pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PoolRole {
    Obstacle {
        impact: PlayerImpact,
        /// `Some` makes the pool a projectile target
        chip: Option<ChipRule>,
        /// Award a point when the player passes the entity (pipes)
        score_on_pass: bool,
    },
    Projectile,
}

/// Initial layout when a run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeedRule {
    /// All slots inactive (projectiles)
    Parked,
    /// Every slot activated via a scatter respawn
    Scatter(RespawnRule),
    /// Slot `i` at `x = viewport.w + lead_in + i * spacing`, moving at `vel`;
    /// lane and gap come from the pool's `TrailingGap` boundary rule
    Staggered { lead_in: f32, vel: Vec2 },
}

/// Static description of one entity pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub kind: EntityKind,
    pub capacity: usize,
    pub motion: MotionProfile,
    pub boundary: BoundaryPolicy,
    pub role: PoolRole,
    pub seed: SeedRule,
}

/// Projectile spawning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireConfig {
    /// Muzzle speed along the player's heading
    pub speed: f32,
    pub ttl_ticks: u32,
    pub cooldown_ticks: u32,
    /// Collision radius of a projectile
    pub radius: f32,
}

/// Aimed beam parameters (UFO laser)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Ticks the beam stays lit; doubles as the refire cooldown
    pub duration_ticks: u32,
    /// Money spent per shot; firing with less is ignored
    pub cost: i64,
}

/// The player's offensive option, if any
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FireMode {
    /// Pooled shot launched along the player's heading (asteroids lasers)
    Projectile(FireConfig),
    /// Instant segment from the player to the aim point, chipping the first
    /// target it crosses every tick it stays lit (UFO laser)
    Beam(BeamConfig),
}

/// Complete static description of a game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub viewport: Viewport,
    pub control: ControlScheme,
    pub player_start: Vec2,
    pub player_hitbox: Hitbox,
    pub player_boundary: BoundaryPolicy,
    pub starting_lives: i32,
    /// I-frames granted at run start
    pub spawn_i_frames: u32,
    /// I-frames granted on a damaging hit
    pub i_frame_ticks: u32,
    /// On a damaging hit, snap back to `player_start` with inverted velocity
    pub recoil_to_start: bool,
    pub fire: Option<FireMode>,
    /// Award a point every this many running ticks (ski survival score)
    pub score_interval_ticks: Option<u32>,
    /// Run ends when lives drop to this floor (usually 0)
    pub lives_floor: Option<i32>,
    /// Run ends when money drops strictly below this floor
    pub bankruptcy_floor: Option<i64>,
    /// Ended phase ignores restart input for this many ticks
    pub restart_grace_ticks: u32,
    /// Ended phase returns to Idle by itself after this many ticks
    pub auto_restart_ticks: Option<u32>,
    pub pools: Vec<PoolSpec>,
}

impl SessionConfig {
    /// Fail-fast construction-time checks. Per-tick code assumes these hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.w <= 0.0 || self.viewport.h <= 0.0 {
            return Err(ConfigError::InvalidViewport(
                self.viewport.w,
                self.viewport.h,
            ));
        }
        if self.score_interval_ticks == Some(0) {
            return Err(ConfigError::ZeroScoreInterval);
        }
        for spec in &self.pools {
            if spec.capacity == 0 {
                return Err(ConfigError::ZeroCapacity);
            }
            if let BoundaryPolicy::Recycle { rule, .. } = &spec.boundary {
                check_rule(rule)?;
            }
            if let PoolRole::Obstacle { impact, chip, .. } = &spec.role {
                if let PlayerImpact::Collect { respawn, .. } = impact {
                    check_rule(respawn)?;
                }
                if let Some(chip) = chip {
                    if chip.chip <= 0.0 {
                        return Err(ConfigError::InvalidChip(chip.chip));
                    }
                    check_rule(&chip.respawn)?;
                }
            }
            if let SeedRule::Scatter(rule) = &spec.seed {
                check_rule(rule)?;
            }
        }
        Ok(())
    }
}

fn check_rule(rule: &RespawnRule) -> Result<(), ConfigError> {
    if let RespawnRule::TrailingGap { spacing, .. } = rule {
        if *spacing <= 0.0 {
            return Err(ConfigError::InvalidSpacing(*spacing));
        }
    }
    Ok(())
}

/// The four game sketches this engine grew out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Flappy-style helicopter threading pipe gaps
    HeliFlappy,
    /// Asteroids with cash rocks, debt rocks and a bankruptcy floor
    DebtCollector,
    /// Four-way UFO dodging a bouncing rock, grabbing coins
    UfoSurvival,
    /// Downhill slalom between trees and rocks
    SkiSlalom,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::HeliFlappy => "heli-flappy",
            Variant::DebtCollector => "debt-collector",
            Variant::UfoSurvival => "ufo-survival",
            Variant::SkiSlalom => "ski-slalom",
        }
    }

    /// Build the variant's full config for a playfield of the given size.
    pub fn config(self, vp: Viewport) -> SessionConfig {
        match self {
            Variant::HeliFlappy => heli_flappy(vp),
            Variant::DebtCollector => debt_collector(vp),
            Variant::UfoSurvival => ufo_survival(vp),
            Variant::SkiSlalom => ski_slalom(vp),
        }
    }
}

fn heli_flappy(vp: Viewport) -> SessionConfig {
    let heli_x = 150.0;
    SessionConfig {
        viewport: vp,
        control: ControlScheme::Lift {
            gravity: 0.5,
            impulse: -10.0,
        },
        player_start: Vec2::new(heli_x, vp.h / 2.0),
        // Sprite is 250x250 but the craft only occupies 170x75 of it.
        player_hitbox: Hitbox::rect(Vec2::new(85.0, 37.5), Vec2::new(-15.0, 4.0)),
        player_boundary: BoundaryPolicy::Clamp {
            min: Vec2::new(heli_x, -62.5),
            max: Vec2::new(heli_x, vp.h - 187.5),
        },
        starting_lives: 1,
        spawn_i_frames: 0,
        i_frame_ticks: 0,
        recoil_to_start: false,
        fire: None,
        score_interval_ticks: None,
        lives_floor: Some(0),
        bankruptcy_floor: None,
        restart_grace_ticks: 180,
        auto_restart_ticks: None,
        pools: vec![PoolSpec {
            kind: EntityKind::Pipe,
            capacity: 3,
            motion: MotionProfile::default(),
            boundary: BoundaryPolicy::Recycle {
                exit: Edge::Left,
                rule: RespawnRule::TrailingGap {
                    spacing: 450.0,
                    width: 100.0,
                    y: (200.0, vp.h - 200.0),
                    gap: (250.0, 400.0),
                },
            },
            role: PoolRole::Obstacle {
                impact: PlayerImpact::LoseLife,
                chip: None,
                score_on_pass: true,
            },
            seed: SeedRule::Staggered {
                lead_in: 200.0,
                vel: Vec2::new(-5.0, 0.0),
            },
        }],
    }
}

fn debt_collector(vp: Viewport) -> SessionConfig {
    let scatter = |radius: (f32, f32), speed: f32| RespawnRule::Scatter {
        x: (0.0, vp.w),
        y: (0.0, vp.h),
        radius,
        speed_x: (-speed, speed),
        speed_y: (-speed, speed),
    };
    SessionConfig {
        viewport: vp,
        control: ControlScheme::Rotational {
            turn_rate: 5.0,
            thrust: 0.15,
            drag: 0.015,
        },
        player_start: vp.center(),
        player_hitbox: Hitbox::circle(15.0),
        player_boundary: BoundaryPolicy::Wrap,
        starting_lives: 3,
        spawn_i_frames: I_FRAME_TICKS,
        i_frame_ticks: I_FRAME_TICKS,
        recoil_to_start: true,
        fire: Some(FireMode::Projectile(FireConfig {
            speed: 30.0,
            ttl_ticks: PROJECTILE_TTL_TICKS,
            cooldown_ticks: FIRE_COOLDOWN_TICKS,
            radius: 5.0,
        })),
        score_interval_ticks: None,
        lives_floor: Some(0),
        bankruptcy_floor: Some(BANKRUPTCY_FLOOR),
        restart_grace_ticks: 60,
        auto_restart_ticks: None,
        pools: vec![
            PoolSpec {
                kind: EntityKind::Rock,
                capacity: 5,
                motion: MotionProfile::default(),
                boundary: BoundaryPolicy::Wrap,
                role: PoolRole::Obstacle {
                    impact: PlayerImpact::LoseLife,
                    chip: Some(ChipRule {
                        chip: CHIP_RADIUS,
                        min_radius: MIN_TARGET_RADIUS,
                        reward: CHIP_REWARD,
                        respawn: scatter((15.0, 50.0), 5.0),
                    }),
                    score_on_pass: false,
                },
                seed: SeedRule::Scatter(scatter((10.0, 40.0), 5.0)),
            },
            PoolSpec {
                kind: EntityKind::DebtRock,
                capacity: 5,
                motion: MotionProfile::default(),
                boundary: BoundaryPolicy::Wrap,
                role: PoolRole::Obstacle {
                    impact: PlayerImpact::MoneyPenalty { amount: 100 },
                    chip: Some(ChipRule {
                        chip: CHIP_RADIUS,
                        min_radius: MIN_TARGET_RADIUS,
                        reward: CHIP_REWARD,
                        respawn: scatter((15.0, 50.0), 7.0),
                    }),
                    score_on_pass: false,
                },
                seed: SeedRule::Scatter(scatter((15.0, 50.0), 7.0)),
            },
            PoolSpec {
                kind: EntityKind::Laser,
                capacity: 5,
                motion: MotionProfile::default(),
                boundary: BoundaryPolicy::Wrap,
                role: PoolRole::Projectile,
                seed: SeedRule::Parked,
            },
        ],
    }
}

fn ufo_survival(vp: Viewport) -> SessionConfig {
    let rock_scatter = RespawnRule::Scatter {
        x: (vp.w * 0.25, vp.w * 0.75),
        y: (vp.h * 0.25, vp.h * 0.75),
        radius: (40.0, 40.0),
        speed_x: (3.0, 3.0),
        speed_y: (3.0, 3.0),
    };
    SessionConfig {
        viewport: vp,
        control: ControlScheme::FourWay { speed: 5.0 },
        player_start: Vec2::new(100.0, 100.0),
        player_hitbox: Hitbox::circle(25.0),
        player_boundary: BoundaryPolicy::Clamp {
            min: Vec2::ZERO,
            max: Vec2::new(vp.w, vp.h),
        },
        starting_lives: 3,
        spawn_i_frames: 120,
        i_frame_ticks: 120,
        recoil_to_start: false,
        // The laser is coin-powered: each shot burns one collected coin.
        fire: Some(FireMode::Beam(BeamConfig {
            duration_ticks: 25,
            cost: 1,
        })),
        score_interval_ticks: None,
        lives_floor: Some(0),
        bankruptcy_floor: None,
        restart_grace_ticks: 120,
        auto_restart_ticks: None,
        pools: vec![
            PoolSpec {
                kind: EntityKind::Rock,
                capacity: 1,
                motion: MotionProfile::default(),
                boundary: BoundaryPolicy::Bounce,
                role: PoolRole::Obstacle {
                    impact: PlayerImpact::LoseLife,
                    // Worn down by the beam; no payout for the grind.
                    chip: Some(ChipRule {
                        chip: 2.0,
                        min_radius: 10.0,
                        reward: (0, 1),
                        respawn: rock_scatter.clone(),
                    }),
                    score_on_pass: false,
                },
                seed: SeedRule::Scatter(rock_scatter),
            },
            PoolSpec {
                kind: EntityKind::Coin,
                capacity: 1,
                motion: MotionProfile::default(),
                boundary: BoundaryPolicy::Clamp {
                    min: Vec2::ZERO,
                    max: Vec2::new(vp.w, vp.h),
                },
                role: PoolRole::Obstacle {
                    impact: PlayerImpact::Collect {
                        reward: (1, 2),
                        score: 0,
                        respawn: RespawnRule::Scatter {
                            x: (0.0, vp.w),
                            y: (0.0, vp.h),
                            radius: (15.0, 15.0),
                            speed_x: (0.0, 0.0),
                            speed_y: (0.0, 0.0),
                        },
                    },
                    chip: None,
                    score_on_pass: false,
                },
                seed: SeedRule::Scatter(RespawnRule::Scatter {
                    x: (0.0, vp.w),
                    y: (0.0, vp.h),
                    radius: (15.0, 15.0),
                    speed_x: (0.0, 0.0),
                    speed_y: (0.0, 0.0),
                }),
            },
        ],
    }
}

fn ski_slalom(vp: Viewport) -> SessionConfig {
    // Obstacles scroll uphill past the skier and re-enter from below.
    let uphill = |x: (f32, f32), radius: (f32, f32), speed: f32| RespawnRule::Scatter {
        x,
        y: (vp.h, vp.h + 400.0),
        radius,
        speed_x: (0.0, 0.0),
        speed_y: (-speed, -speed),
    };
    SessionConfig {
        viewport: vp,
        control: ControlScheme::Slalom { speed: 5.0 },
        player_start: Vec2::new(vp.w / 2.0, 200.0),
        player_hitbox: Hitbox::rect(Vec2::new(50.0, 87.5), Vec2::new(-2.0, 5.0)),
        player_boundary: BoundaryPolicy::Clamp {
            min: Vec2::new(0.0, 200.0),
            max: Vec2::new(vp.w, 200.0),
        },
        starting_lives: 5,
        spawn_i_frames: 180,
        i_frame_ticks: 180,
        recoil_to_start: false,
        fire: None,
        // Survival pays by itself: a point every five seconds on the slope.
        score_interval_ticks: Some(300),
        lives_floor: Some(0),
        bankruptcy_floor: None,
        restart_grace_ticks: 120,
        auto_restart_ticks: Some(1800),
        pools: vec![
            PoolSpec {
                kind: EntityKind::Tree,
                capacity: 5,
                motion: MotionProfile::default(),
                boundary: BoundaryPolicy::Recycle {
                    exit: Edge::Top,
                    rule: uphill((0.0, vp.w), (20.0, 60.0), 6.0),
                },
                role: PoolRole::Obstacle {
                    impact: PlayerImpact::LoseLife,
                    chip: None,
                    score_on_pass: false,
                },
                seed: SeedRule::Scatter(uphill((0.0, vp.w), (20.0, 60.0), 6.0)),
            },
            PoolSpec {
                kind: EntityKind::Rock,
                capacity: 1,
                motion: MotionProfile::default(),
                boundary: BoundaryPolicy::Recycle {
                    exit: Edge::Top,
                    rule: uphill((0.0, vp.w), (75.0, 100.0), 6.0),
                },
                role: PoolRole::Obstacle {
                    impact: PlayerImpact::LoseLife,
                    chip: None,
                    score_on_pass: false,
                },
                seed: SeedRule::Scatter(uphill((0.0, vp.w), (75.0, 100.0), 6.0)),
            },
            PoolSpec {
                kind: EntityKind::Coin,
                capacity: 1,
                motion: MotionProfile::default(),
                boundary: BoundaryPolicy::Recycle {
                    exit: Edge::Top,
                    rule: uphill((0.0, vp.w), (25.0, 25.0), 4.0),
                },
                role: PoolRole::Obstacle {
                    impact: PlayerImpact::Collect {
                        reward: (0, 1),
                        score: 1,
                        respawn: uphill((0.0, vp.w), (25.0, 25.0), 4.0),
                    },
                    chip: None,
                    score_on_pass: false,
                },
                seed: SeedRule::Scatter(uphill((0.0, vp.w), (25.0, 25.0), 4.0)),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_variants_validate() {
        let vp = Viewport::new(1280.0, 720.0);
        for variant in [
            Variant::HeliFlappy,
            Variant::DebtCollector,
            Variant::UfoSurvival,
            Variant::SkiSlalom,
        ] {
            variant.config(vp).validate().unwrap_or_else(|e| {
                panic!("{} failed validation: {e}", variant.as_str());
            });
        }
    }

    #[test]
    fn test_ufo_beam_targets_the_rock() {
        let cfg = Variant::UfoSurvival.config(Viewport::new(800.0, 600.0));
        assert!(matches!(cfg.fire, Some(FireMode::Beam(_))));
        assert!(matches!(
            cfg.pools[0].role,
            PoolRole::Obstacle { chip: Some(_), .. }
        ));
    }

    #[test]
    fn test_ski_scores_passively_and_on_coins() {
        let cfg = Variant::SkiSlalom.config(Viewport::new(800.0, 600.0));
        assert_eq!(cfg.score_interval_ticks, Some(300));
        let coins = cfg
            .pools
            .iter()
            .find(|p| p.kind == EntityKind::Coin)
            .unwrap();
        assert!(matches!(
            coins.role,
            PoolRole::Obstacle {
                impact: PlayerImpact::Collect { score: 1, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_zero_capacity_fails_validation() {
        let mut cfg = Variant::DebtCollector.config(Viewport::new(800.0, 600.0));
        cfg.pools[0].capacity = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_non_positive_spacing_fails_validation() {
        let mut cfg = Variant::HeliFlappy.config(Viewport::new(800.0, 600.0));
        if let BoundaryPolicy::Recycle { rule, .. } = &mut cfg.pools[0].boundary {
            if let RespawnRule::TrailingGap { spacing, .. } = rule {
                *spacing = 0.0;
            }
        }
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidSpacing(0.0)));
    }

    #[test]
    fn test_zero_score_interval_fails_validation() {
        let mut cfg = Variant::SkiSlalom.config(Viewport::new(800.0, 600.0));
        cfg.score_interval_ticks = Some(0);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroScoreInterval));
    }

    #[test]
    fn test_bad_viewport_fails_validation() {
        let cfg = Variant::UfoSurvival.config(Viewport::new(800.0, 0.0));
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidViewport(_, _))
        ));
    }
}
