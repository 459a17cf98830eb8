//! Star Drift entry point
//!
//! Headless native runner: plays one session with a simple autopilot and
//! logs what the HUD and speakers would have shown.
//!
//! Usage: `star-drift [seed] [tuning.json]`

use std::process::ExitCode;

use star_drift::audio::LogAudio;
use star_drift::consts::SIM_DT;
use star_drift::hud::TextHud;
use star_drift::sim::{EntityKind, GamePhase, GameState, TickInput, tick};
use star_drift::{Sinks, Tuning, dispatch};

/// Simulated seconds to play before stopping
const RUN_SECONDS: f32 = 120.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Star Drift (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                log::error!("Seed must be an unsigned integer, got '{}'", raw);
                return ExitCode::FAILURE;
            }
        },
        None => 0x5EED,
    };
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let mut state = GameState::new(seed, tuning);
    let mut hud = TextHud::new();
    let mut audio = LogAudio::new();
    state.start_session();

    let max_ticks = (RUN_SECONDS / SIM_DT) as u64;
    while state.time_ticks < max_ticks && state.phase != GamePhase::GameOver {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT);

        let mut sinks = Sinks::new(Some(&mut hud), Some(&mut audio));
        dispatch(state.drain_events(), &mut sinks);
        hud.update(SIM_DT);
    }
    // Death events raised on the final tick
    let mut sinks = Sinks::new(Some(&mut hud), Some(&mut audio));
    dispatch(state.drain_events(), &mut sinks);

    println!("Seed:        {}", state.seed);
    println!("Time:        {:.1}s", state.time_ticks as f32 * SIM_DT);
    println!("Wave:        {}", hud.wave);
    println!("Score:       {}", hud.score);
    println!("Multiplier:  {}", hud.multiplier);
    println!("Stars:       {}", hud.stars);
    println!("Health:      {}", hud.health);
    println!("Sounds:      {}", audio.played.len());
    if state.phase == GamePhase::GameOver {
        println!("Result:      destroyed");
    } else {
        println!("Result:      survived");
    }
    ExitCode::SUCCESS
}

/// Line up with the nearest enemy or star ahead of the ship and keep firing
fn autopilot(state: &GameState) -> TickInput {
    let ship = state.ship.pos;
    let target = state
        .world
        .iter()
        .filter(|e| e.is_live() && e.pos.x > ship.x)
        .filter(|e| matches!(e.kind, EntityKind::Enemy(_) | EntityKind::Star(_)))
        .min_by(|a, b| {
            a.pos
                .distance_squared(ship)
                .partial_cmp(&b.pos.distance_squared(ship))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos.y);

    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };
    if let Some(y) = target {
        input.up = y > ship.y + 0.1;
        input.down = y < ship.y - 0.1;
    }
    input
}
