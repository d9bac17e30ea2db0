use climber_core::config::ClimberConfig;
use climber_core::observer::{NoOpObserver, ProgressLogger, SearchObserver};
use climber_core::report::{format_result, render_ratio_chart};
use climber_core::search::{
    BruteForceSearcher, HillClimbingSearcher, SearchBudget, SearchError, Searcher,
};
use climber_core::sequence::Sequence;
use climber_core::simulation::{LengthTrial, Simulation, TrialOutcome};
use climber_core::Alphabet;

use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::path::PathBuf;

const CHART_WIDTH: usize = 50;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(short, long, value_parser, global = true)]
    config_file: Option<PathBuf>,
    /// Seed for the random number generator; a random one is chosen and logged when unset
    #[clap(long, global = true)]
    seed: Option<u64>,
    #[clap(long, global = true)]
    max_attempts: Option<u64>,
    #[clap(long, global = true)]
    timeout_ms: Option<u64>,
    /// Symbols guesses are drawn from, e.g. "AB"
    #[clap(long, global = true)]
    alphabet: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Guess one password with brute force, then with hill climbing
    Run {
        password: String,
        #[clap(long)]
        skip_brute_force: bool,
        /// Log progress every N attempts (visible with RUST_LOG=debug)
        #[clap(long)]
        progress_every: Option<u64>,
    },
    /// Compare both strategies on random passwords of length 1 up to N
    Simulate {
        #[clap(short, long)]
        max_length: Option<usize>,
        /// Print the full report as JSON instead of a chart
        #[clap(long)]
        json: bool,
    },
}

/// Folds command-line flags over whatever the config file provided.
fn apply_overrides(cli: &Cli, config: &mut ClimberConfig) {
    let search = config.search.get_or_insert_with(Default::default);
    if let Some(seed) = cli.seed {
        search.seed = Some(seed);
    }
    if let Some(max_attempts) = cli.max_attempts {
        search.max_attempts = Some(max_attempts);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        search.timeout_ms = Some(timeout_ms);
    }
    if let Some(alphabet) = &cli.alphabet {
        search.alphabet = Some(alphabet.clone());
    }
    if let Command::Simulate {
        max_length: Some(max_length),
        ..
    } = cli.command
    {
        config
            .simulation
            .get_or_insert_with(Default::default)
            .max_length = max_length;
    }
}

fn select_observer(progress_every: Option<u64>) -> Box<dyn SearchObserver> {
    let observer: Box<dyn SearchObserver> = match progress_every {
        Some(every) => Box::new(ProgressLogger::new(every)),
        None => Box::new(NoOpObserver),
    };
    info!("Observing searches with {}", observer.name());
    observer
}

fn describe_outcome(name: &str, outcome: &TrialOutcome) -> String {
    if outcome.exhausted {
        format!(
            "{name} gave up after {} attempts in {:.3}s",
            outcome.attempts, outcome.elapsed_secs
        )
    } else {
        format!(
            "{name} {} attempts in {:.3}s",
            outcome.attempts, outcome.elapsed_secs
        )
    }
}

/// One console line per simulated length.
fn describe_trial(trial: &LengthTrial) -> String {
    let attempt_ratio = trial.attempt_ratio();
    let attempt_ratio = if attempt_ratio.is_finite() {
        format!("{attempt_ratio:.1}x")
    } else {
        "n/a".to_string()
    };
    format!(
        "Length {}: {}, {} (attempt ratio {attempt_ratio})",
        trial.length,
        describe_outcome("brute force", &trial.brute_force),
        describe_outcome("hill climbing", &trial.hill_climbing),
    )
}

fn run_password(
    password: &str,
    alphabet: Alphabet,
    budget: SearchBudget,
    skip_brute_force: bool,
    observer: &mut dyn SearchObserver,
    rng: &mut ChaCha8Rng,
) -> Result<(), anyhow::Error> {
    alphabet
        .validate(password.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid password {password:?}: {e}"))?;
    let target = Sequence::from(password);

    if skip_brute_force {
        info!("Skipping brute force search");
    } else {
        let mut brute = BruteForceSearcher::new(alphabet.clone()).with_budget(budget);
        match brute.search_observed(&target, rng, observer) {
            Ok(result) => println!("{}\n\n", format_result("Brute force algorithm", &result, false)),
            Err(e @ SearchError::BudgetExhausted { .. }) => {
                println!("Brute force algorithm\n\nGave up: {e}\n\n");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let mut climber = HillClimbingSearcher::new(alphabet).with_budget(budget);
    let result = climber.search_observed(&target, rng, observer)?;
    println!("{}", format_result("Hill climbing algorithm", &result, true));
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config_file {
        Some(config_path) => {
            info!("Loading configuration from specified path: {config_path:?}");
            ClimberConfig::load_from_file(config_path)?
        }
        None => ClimberConfig::resolve(None)?,
    };
    apply_overrides(&cli, &mut config);
    debug!("Effective configuration: {config:#?}");

    let search_settings = config.search();
    let alphabet = search_settings.alphabet()?;
    let budget = search_settings.budget();
    if budget.is_unlimited() {
        warn!("No attempt or time limit set; each search runs until it succeeds");
    }

    let seed = search_settings.seed.unwrap_or_else(rand::random);
    info!("Using seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    match cli.command {
        Command::Run {
            password,
            skip_brute_force,
            progress_every,
        } => {
            let mut observer = select_observer(progress_every);
            run_password(
                &password,
                alphabet,
                budget,
                skip_brute_force,
                observer.as_mut(),
                &mut rng,
            )?;
        }
        Command::Simulate { json, .. } => {
            let max_length = config.simulation().max_length;
            info!("Simulating password lengths 1 to {max_length}");
            let report = Simulation::new(alphabet)
                .with_budget(budget)
                .run(max_length, &mut rng)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for trial in &report.trials {
                    println!("{}", describe_trial(trial));
                }
                println!();
                print!("{}", render_ratio_chart(&report.ratios(), CHART_WIDTH));
            }
        }
    }

    Ok(())
}
