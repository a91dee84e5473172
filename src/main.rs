use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::{debug, info};

use crosswalk::simulation::{
    Collaborators, MemorySettings, PedestrianId, PedestrianState, Settings, SimConfig, SimEvent, SimWorld,
};

/// Horizontal extent of the two lanes, widest vehicle included
const ROAD_MIN_X: f32 = 110.0;
const ROAD_MAX_X: f32 = 250.0;
/// How far from the road a pedestrian counts as standing at the curb
const CURB_DEPTH: f32 = 45.0;
/// A vehicle this close behind its front bumper makes the autopilot sprint
const DANGER_DISTANCE: f32 = 250.0;

#[derive(Parser)]
#[command(name = "crosswalk")]
#[command(about = "Headless street crossing simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Difficulty tier to start at
    #[arg(long, default_value = "0")]
    tier: usize,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Let a simple bot tap pedestrians
    #[arg(long)]
    autopilot: bool,

    /// Wall-clock milliseconds to wait after each simulated second
    #[arg(long, default_value = "0")]
    pace_ms: u64,

    /// Only print the final state
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,crosswalk=info")).init();

    let cli = Cli::parse();
    ensure!(
        cli.delta > 0.0 && cli.delta.is_finite(),
        "--delta must be a positive number of seconds, got {}",
        cli.delta
    );

    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    println!("Running crossing simulation in headless mode...");
    println!("Ticks: {}, Delta: {}s, Start tier: {}", cli.ticks, cli.delta, cli.tier);

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = (1.0 / cli.delta).ceil() as u32;
    println!("Running {} ticks per second (simulated time)", ticks_per_second);
    println!();

    let collaborators = Collaborators {
        settings: Box::new(MemorySettings::new(Settings {
            difficulty_start_tier: cli.tier,
            high_score: 0,
        })),
        ..Collaborators::default()
    };
    let config = SimConfig::default();
    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(seed, config, collaborators),
        None => SimWorld::new(config, collaborators),
    };
    world
        .start_session()
        .with_context(|| format!("Failed to start a session at tier {}", cli.tier))?;

    let mut tick = 0;
    let mut highest_tier = world.session.tier.index();
    while tick < cli.ticks {
        // Run ticks_per_second ticks (or remaining ticks if fewer)
        let ticks_to_run = ticks_per_second.min(cli.ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            if cli.autopilot {
                autopilot(&mut world);
            }
            world.tick(cli.delta);

            for event in world.drain_events() {
                if let SimEvent::RoundStarted { tier } = event {
                    highest_tier = highest_tier.max(tier);
                }
                debug!("{:?}", event);
            }
        }

        if !cli.quiet {
            println!("--- After tick {} ({:.1}s simulated time) ---", tick, tick as f32 * cli.delta);
            world.print_summary();
            world.draw_map();
            println!();
        }

        if tick < cli.ticks && cli.pace_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(cli.pace_ms));
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();

    let session = world.session();
    let resolved = session.pedestrians_crossed + session.pedestrians_hit;
    let success_rate = if resolved > 0 {
        session.pedestrians_crossed as f32 / resolved as f32 * 100.0
    } else {
        0.0
    };

    info!("=== SIMULATION COMPLETE ===");
    info!("Highest tier reached: {}", highest_tier);
    info!("Final score: {}", session.score);
    info!("Life left: {}", session.life);
    info!("Game over: {}", session.game_over);
    if let Some(outcome) = session.outcome {
        info!("Outcome: {}", outcome);
    }
    info!("Pedestrians spawned: {}", session.pedestrians_spawned);
    info!("Pedestrians crossed: {}", session.pedestrians_crossed);
    info!("Pedestrians hit: {}", session.pedestrians_hit);
    info!("Vehicles spawned: {}", session.vehicles_spawned);
    info!("Vehicle spawns skipped: {}", session.vehicle_spawns_skipped);
    info!("Success rate: {:.1}%", success_rate);
    Ok(())
}

/// Stop pedestrians at the curb while cars have green, and sprint the ones
/// caught in a lane with a vehicle closing in
fn autopilot(world: &mut SimWorld) {
    let now = world.input_time();
    let car_green = world.signal.car_green();

    let mut to_stop: Vec<PedestrianId> = Vec::new();
    let mut to_sprint: Vec<PedestrianId> = Vec::new();
    for pedestrian in world.pedestrians.values() {
        if !pedestrian.is_grounded() || pedestrian.state == PedestrianState::Sprinting {
            continue;
        }
        let x = pedestrian.position.x;

        let on_road = (ROAD_MIN_X..=ROAD_MAX_X).contains(&x);
        if on_road {
            let body = pedestrian.body();
            let threatened = world.vehicles.values().any(|vehicle| {
                let vehicle_body = vehicle.body();
                let same_lane = vehicle_body.min.x <= body.max.x && vehicle_body.max.x >= body.min.x;
                let gap = body.min.y - vehicle.front().y;
                same_lane && (0.0..DANGER_DISTANCE).contains(&gap)
            });
            if threatened {
                to_sprint.push(pedestrian.id);
            }
            continue;
        }

        let at_curb = if pedestrian.direction > 0.0 {
            x < ROAD_MIN_X && x > ROAD_MIN_X - CURB_DEPTH
        } else {
            x > ROAD_MAX_X && x < ROAD_MAX_X + CURB_DEPTH
        };
        if at_curb && car_green && pedestrian.state == PedestrianState::Walking && pedestrian.can_be_stopped() {
            to_stop.push(pedestrian.id);
        }
    }

    for id in to_stop {
        world.tap_pedestrian(id, now);
    }
    for id in to_sprint {
        // Two taps inside the double-tap window
        world.tap_pedestrian(id, now);
        world.tap_pedestrian(id, now);
    }
}
