use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use menagerie_core::brain::BrainRegistry;
use menagerie_core::config::EngineConfig;
use menagerie_core::entity::Record;
use menagerie_core::simulation::{Simulation, Standing};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "menagerie")]
#[command(about = "Headless runner for grid arena matches and round-robin tournaments")]
#[command(version)]
struct Cli {
    /// JSON file with engine config overrides
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered brains
    Brains,

    /// Put every listed brain in one arena and play a match
    Match {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Play every pairing of the listed brains
    Tournament {
        #[command(flatten)]
        run: RunArgs,

        /// Run this many independent tournaments (seeds seed, seed+1, ..)
        /// in parallel and sum the standings
        #[arg(long, default_value_t = 1)]
        seeds: u64,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Brain to enrol; repeat for each competitor
    #[arg(short, long = "brain", required = true)]
    brains: Vec<String>,

    /// Master seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Challenge mode: 1 single prize, 2 plus sign, 3 standard
    #[arg(short, long)]
    mode: Option<u8>,

    /// Rounds per match
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Moves per round
    #[arg(long)]
    moves: Option<u32>,
}

impl RunArgs {
    fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(mode) = self.mode {
            config.play_mode = mode;
        }
        if let Some(rounds) = self.rounds {
            config.rounds_per_match = rounds;
        }
        if let Some(moves) = self.moves {
            config.moves_per_round = moves;
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = BrainRegistry::with_builtins();
    let base = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Brains => {
            for name in registry.names() {
                println!("{name}");
            }
        }

        Commands::Match { run } => {
            let config = run.apply(base);
            let mut sim = Simulation::new(config, run.seed)?;
            for name in &run.brains {
                sim.add_brain(&registry, name)?;
            }
            sim.run_match()?;
            print_table("Match results", &roster_table(&sim), true);
        }

        Commands::Tournament { run, seeds } => {
            if run.brains.len() < 2 {
                bail!("a tournament needs at least two brains");
            }
            let config = run.apply(base);
            let tables = (0..seeds.max(1))
                .into_par_iter()
                .map(|offset| {
                    run_tournament(&config, &registry, &run.brains, run.seed.wrapping_add(offset))
                })
                .collect::<Result<Vec<_>>>()?;

            let mut totals = tables.first().cloned().unwrap_or_default();
            for table in tables.iter().skip(1) {
                for (total, standing) in totals.iter_mut().zip(table) {
                    add_record(&mut total.record, standing.record);
                }
            }
            rank(&mut totals);

            let title = if seeds > 1 {
                format!("Standings over {seeds} tournaments")
            } else {
                "Final standings".to_string()
            };
            print_table(&title, &totals, false);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let config = EngineConfig::from_json_str(&json)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Runs one tournament and returns the table in roster order, so tables from
/// different seeds line up row for row.
fn run_tournament(
    config: &EngineConfig,
    registry: &BrainRegistry,
    brains: &[String],
    seed: u64,
) -> Result<Vec<Standing>> {
    let mut sim = Simulation::new(config.clone(), seed)?;
    for name in brains {
        sim.enroll_brain(registry, name)?;
    }
    sim.run_tournament()
        .with_context(|| format!("tournament with seed {seed} failed"))?;
    Ok(roster_table(&sim))
}

fn roster_table(sim: &Simulation) -> Vec<Standing> {
    let standings = sim.standings();
    sim.roster()
        .iter()
        .filter_map(|id| standings.iter().find(|s| s.id == *id).cloned())
        .collect()
}

fn add_record(total: &mut Record, other: Record) {
    total.rounds_won += other.rounds_won;
    total.matches_won += other.matches_won;
    total.matches_tied += other.matches_tied;
    total.matches_lost += other.matches_lost;
    total.total_score += other.total_score;
}

fn rank(table: &mut [Standing]) {
    table.sort_by(|a, b| a.record.standing_order(&b.record));
}

fn print_table(title: &str, table: &[Standing], rounds: bool) {
    println!("{title}");
    if rounds {
        println!("{:<16} {:>8} {:>12}", "name", "rounds", "total");
        for s in table {
            println!(
                "{:<16} {:>8} {:>12}",
                s.name, s.record.rounds_won, s.record.total_score
            );
        }
    } else {
        println!(
            "{:<16} {:>5} {:>5} {:>5} {:>12}",
            "name", "won", "tied", "lost", "total"
        );
        for s in table {
            println!(
                "{:<16} {:>5} {:>5} {:>5} {:>12}",
                s.name,
                s.record.matches_won,
                s.record.matches_tied,
                s.record.matches_lost,
                s.record.total_score
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_repeated_brains() {
        let cli = Cli::parse_from([
            "menagerie", "tournament", "-b", "random", "-b", "finder", "--seeds", "4",
        ]);
        let Commands::Tournament { run, seeds } = cli.command else {
            panic!("expected tournament");
        };
        assert_eq!(run.brains, vec!["random", "finder"]);
        assert_eq!(seeds, 4);
    }

    #[test]
    fn overrides_replace_config_fields() {
        let cli = Cli::parse_from([
            "menagerie", "match", "-b", "darter", "--mode", "2", "--rounds", "7",
        ]);
        let Commands::Match { run } = cli.command else {
            panic!("expected match");
        };
        let config = run.apply(EngineConfig::default());
        assert_eq!(config.play_mode, 2);
        assert_eq!(config.rounds_per_match, 7);
        assert_eq!(config.moves_per_round, 500);
    }

    #[test]
    fn summed_tables_rank_like_single_standings() {
        let config = EngineConfig {
            moves_per_round: 20,
            rounds_per_match: 2,
            ..EngineConfig::default()
        };
        let registry = BrainRegistry::with_builtins();
        let brains = vec!["random".to_string(), "finder".to_string(), "darter".to_string()];

        let mut sim = Simulation::new(config.clone(), 3).unwrap();
        for name in &brains {
            sim.enroll_brain(&registry, name).unwrap();
        }
        let expected = sim.run_tournament().unwrap();

        let mut table = run_tournament(&config, &registry, &brains, 3).unwrap();
        rank(&mut table);
        let names = |t: &[Standing]| t.iter().map(|s| s.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&table), names(&expected));
        assert!(table
            .windows(2)
            .all(|w| w[0].record.standing_order(&w[1].record).is_le()));
    }

    #[test]
    fn tables_from_different_seeds_line_up() {
        let config = EngineConfig {
            moves_per_round: 20,
            rounds_per_match: 2,
            ..EngineConfig::default()
        };
        let registry = BrainRegistry::with_builtins();
        let brains = vec!["finder".to_string(), "random".to_string()];
        let a = run_tournament(&config, &registry, &brains, 1).unwrap();
        let b = run_tournament(&config, &registry, &brains, 2).unwrap();
        assert_eq!(a[0].name, b[0].name);
        assert_eq!(a[0].name, "FinderAnimal");
    }
}
