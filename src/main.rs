use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossroads_sim::{
    config::ScenarioCatalog,
    simulation::{ControlCommand, Simulation},
};

#[derive(Parser)]
#[command(name = "crossroads-sim")]
#[command(about = "Traffic simulation of a four-way signalised intersection")]
struct Args {
    /// Scenario catalog file
    #[arg(long, default_value = "scenarios.toml")]
    scenarios: String,

    /// Scenario to start with (defaults to the catalog's default)
    #[arg(long)]
    scenario: Option<String>,

    /// Number of ticks to run; 0 runs until stopped
    #[arg(short, long, default_value_t = 3000)]
    ticks: u64,

    /// Wall-clock milliseconds per tick
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,

    /// Random seed for reproducible simulations
    #[arg(short, long)]
    seed: Option<u64>,

    /// Read operator commands (play, pause, stop, reset, scenario <name>, flip, spawn [dir]) from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Enable verbose logging for detailed simulation progress
    #[arg(short, long)]
    verbose: bool,
}

fn spawn_command_reader() -> Receiver<ControlCommand> {
    let (sender, receiver) = mpsc::channel();

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<ControlCommand>() {
                Ok(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
    });

    receiver
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
    info!("Starting Intersection Simulator (Console Mode)");

    let mut catalog = ScenarioCatalog::load_or_builtin(&args.scenarios)?;
    if args.seed.is_some() {
        catalog.seed = args.seed;
    }
    info!("Loaded {} scenarios: {}", catalog.scenarios.len(), catalog.keys().collect::<Vec<_>>().join(", "));

    let mut simulation = Simulation::new(catalog)?;
    if let Some(key) = &args.scenario {
        simulation.select_scenario(key)?;
    }

    let commands = if args.interactive {
        info!("Interactive mode: type commands on stdin");
        Some(spawn_command_reader())
    } else {
        None
    };

    let tick_duration = Duration::from_millis(args.tick_ms);
    let report_every = (1000 / args.tick_ms.max(1)).max(1);
    let start_time = Instant::now();
    let mut frame_count: u64 = 0;

    while simulation.is_running() && (args.ticks == 0 || simulation.ticks() < args.ticks) {
        let frame_start = Instant::now();

        if let Some(receiver) = &commands {
            loop {
                match receiver.try_recv() {
                    Ok(command) => match simulation.apply(command) {
                        Ok(outcome) => info!("{:?}", outcome),
                        Err(e) => warn!("Command had no effect: {}", e),
                    },
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                }
            }
        }

        simulation.step();
        frame_count += 1;

        if frame_count % report_every == 0 {
            info!("{}", simulation.snapshot());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < tick_duration {
            std::thread::sleep(tick_duration - elapsed);
        }
    }

    let traffic = simulation.traffic();
    info!("Simulation completed!");
    info!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    info!("Ticks simulated: {}", simulation.ticks());
    info!("Vehicles: {} active, {} spawned, {} exited",
          traffic.active_count(),
          traffic.total_spawned(),
          traffic.total_exited());

    Ok(())
}
