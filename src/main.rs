//! Headless demo driver
//!
//! Runs a scripted session of one of the built-in variants and logs a HUD
//! line once per simulated second. Useful for eyeballing balance changes and
//! for profiling the tick loop without a renderer in the way.
//!
//! Usage: arcade-pool [variant] [seed] [seconds]
//! where variant is one of heli-flappy, debt-collector, ufo-survival,
//! ski-slalom (default debt-collector).

use arcade_pool::consts::SIM_TICK_HZ;
use arcade_pool::sim::{Phase, Session, TickInput, Viewport, tick};
use arcade_pool::tuning::Variant;

fn parse_variant(name: &str) -> Option<Variant> {
    [
        Variant::HeliFlappy,
        Variant::DebtCollector,
        Variant::UfoSurvival,
        Variant::SkiSlalom,
    ]
    .into_iter()
    .find(|v| v.as_str() == name)
}

/// A canned pilot: enough input to keep a run interesting without a human.
fn scripted_input(t: u64) -> TickInput {
    TickInput {
        thrust: t % 90 < 30,
        move_right: t % 150 < 40,
        move_left: (60..100).contains(&(t % 150)),
        move_up: t % 70 < 20,
        move_down: (35..55).contains(&(t % 70)),
        fire: t % 15 == 0,
        // Aimed (beam) variants shoot at the middle of the playfield.
        aim: Some(glam::Vec2::new(640.0, 360.0)),
        start_or_restart: true,
        debug_toggle: false,
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let variant = match args.next() {
        Some(name) => match parse_variant(&name) {
            Some(v) => v,
            None => {
                eprintln!("unknown variant {name:?}");
                std::process::exit(2);
            }
        },
        None => Variant::DebtCollector,
    };
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(30);

    let config = variant.config(Viewport::new(1280.0, 720.0));
    let mut session = match Session::new(config, seed) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("bad config for {}: {e}", variant.as_str());
            std::process::exit(1);
        }
    };

    log::info!(
        "running {} for {seconds}s at {SIM_TICK_HZ} Hz (seed {seed})",
        variant.as_str()
    );

    let total = seconds * SIM_TICK_HZ as u64;
    let mut runs = 0u32;
    for t in 0..total {
        let input = scripted_input(t);
        tick(&mut session, &input);

        for event in &session.events {
            log::debug!("t={t} {event:?}");
        }
        if session
            .events
            .iter()
            .any(|e| matches!(e, arcade_pool::sim::SimEvent::PhaseChanged { to: Phase::Ended, .. }))
        {
            runs += 1;
            log::info!(
                "run {runs} over: score {}, money {}, lives {}",
                session.final_score,
                session.player.money,
                session.player.lives
            );
        }

        if t % SIM_TICK_HZ as u64 == 0 {
            log::info!(
                "t={:>5} phase {:?} pos ({:6.1},{:6.1}) score {} money {} lives {} entities {}",
                t,
                session.phase,
                session.player.pos.x,
                session.player.pos.y,
                session.player.score,
                session.player.money,
                session.player.lives,
                session.pools.iter().map(|p| p.slots.active_count()).sum::<usize>(),
            );
        }
    }

    println!(
        "{}: {} run(s) in {seconds}s, last score {}, money {}",
        variant.as_str(),
        runs,
        session.player.score,
        session.player.money
    );
}
