//! combat_sim - Auto-played encounters against the combat engine
//!
//! Run with: `cargo run -p combat_sim -- --encounters 50 --level 3 --seed 7`

mod roster;
mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use combat_core::combat::SessionEnv;
use combat_core::config::{default_skills, load_skill_catalog, CombatConstants};
use combat_core::registry::SessionRegistry;
use combat_core::store::InMemoryStore;
use combat_core::turn::ManualClock;
use simulation::{run_encounter, SimulationSummary};
use std::path::PathBuf;
use std::sync::Arc;

/// Auto-battle simulator for combat_core
#[derive(Parser)]
#[command(name = "combat_sim")]
#[command(about = "Run auto-played encounters and report outcomes", long_about = None)]
#[command(version)]
struct Cli {
    /// Combat constants TOML file (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skill catalog TOML file (built-in catalog when omitted)
    #[arg(long)]
    skills: Option<PathBuf>,

    /// Number of encounters to fight
    #[arg(long, default_value_t = 20)]
    encounters: u32,

    /// Base seed for session randomness (fresh entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Level of the simulated hero
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut constants = match &cli.config {
        Some(path) => CombatConstants::load(path)
            .with_context(|| format!("loading combat constants from {}", path.display()))?,
        None => CombatConstants::default(),
    };
    // Simulated encounters have no second player to take the monster's turn
    constants.sessions.auto_monster_turn = true;

    let skills = match &cli.skills {
        Some(path) => load_skill_catalog(path)
            .with_context(|| format!("loading skill catalog from {}", path.display()))?,
        None => default_skills(),
    };

    let hero = roster::hero(cli.level, &skills);
    let monsters = roster::monsters();

    let store = Arc::new(InMemoryStore::new());
    store.insert_character(hero.clone());
    for monster in &monsters {
        store.insert_monster(monster.clone());
    }

    // Simulated time never advances, so no turn expires
    let env = SessionEnv::new(Arc::new(skills), constants, store, Arc::new(ManualClock::new()));
    let mut registry = match cli.seed {
        Some(seed) => SessionRegistry::with_seed(env, seed),
        None => SessionRegistry::new(env),
    };

    tracing::info!(
        level = hero.level,
        skills = hero.known_skills.len(),
        encounters = cli.encounters,
        "starting simulation"
    );

    let mut summary = SimulationSummary::default();
    let mut reports = Vec::new();
    for (_, monster) in (0..cli.encounters).zip(monsters.iter().cycle()) {
        let report = run_encounter(&mut registry, &hero, monster)?;
        summary.record(&report);
        reports.push(report);
    }

    if cli.json {
        let output = serde_json::json!({ "summary": summary, "encounters": reports });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for report in &reports {
        println!(
            "{:<14} winner={:<9} turns={:<3} dealt={:<4} taken={:<4} healed={:<3} crits={} skills={}",
            report.monster,
            report.winner.as_str(),
            report.turns,
            report.damage_dealt,
            report.damage_taken,
            report.healed,
            report.crits,
            report.skills_used
        );
    }
    println!();
    println!(
        "{} encounters: {} won, {} lost ({:.1}% win rate)",
        summary.encounters,
        summary.wins,
        summary.losses,
        summary.win_rate()
    );
    println!(
        "avg turns {:.1}, avg damage dealt {:.1}, crits {}, skills used {}",
        summary.avg_turns(),
        summary.avg_damage_dealt(),
        summary.crits,
        summary.skills_used
    );

    Ok(())
}
