use crate::alphabet::Alphabet;
use crate::search::{
    BruteForceSearcher, HillClimbingSearcher, SearchBudget, SearchError, SearchResult, Searcher,
};
use crate::sequence::Sequence;
use log::{info, warn};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

/// Floor applied to a hill-climbing time before it is used as a divisor.
const MIN_DIVISOR: Duration = Duration::from_nanos(1);

/// Attempts and wall-clock time of one searcher on one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialOutcome {
    pub attempts: u64,
    pub elapsed_secs: f64,
    /// The search hit its budget; `attempts` and `elapsed_secs` are what it used before giving up.
    pub exhausted: bool,
}

impl TrialOutcome {
    /// Turns a search outcome into a trial record, keeping budget exhaustion as data.
    ///
    /// Any other error is passed through.
    pub fn from_search(
        result: Result<SearchResult, SearchError>,
    ) -> Result<Self, SearchError> {
        match result {
            Ok(result) => Ok(Self::from(&result)),
            Err(SearchError::BudgetExhausted {
                attempts, elapsed, ..
            }) => Ok(Self {
                attempts,
                elapsed_secs: elapsed.as_secs_f64(),
                exhausted: true,
            }),
            Err(e) => Err(e),
        }
    }
}

impl From<&SearchResult> for TrialOutcome {
    fn from(result: &SearchResult) -> Self {
        Self {
            attempts: result.attempts,
            elapsed_secs: result.elapsed_secs(),
            exhausted: false,
        }
    }
}

/// Both searchers run against the same random target of a given length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthTrial {
    pub length: usize,
    pub target: Sequence,
    pub brute_force: TrialOutcome,
    pub hill_climbing: TrialOutcome,
}

impl LengthTrial {
    pub fn completed(&self) -> bool {
        !self.brute_force.exhausted && !self.hill_climbing.exhausted
    }

    /// Brute-force time divided by hill-climbing time.
    ///
    /// A hill-climbing time of zero is clamped to one nanosecond so the ratio stays finite.
    /// NaN when either search ran out of budget.
    pub fn time_ratio(&self) -> f64 {
        if !self.completed() {
            return f64::NAN;
        }
        let divisor = self
            .hill_climbing
            .elapsed_secs
            .max(MIN_DIVISOR.as_secs_f64());
        self.brute_force.elapsed_secs / divisor
    }

    /// Brute-force attempts divided by hill-climbing attempts, with the divisor floored at one.
    /// NaN when either search ran out of budget.
    pub fn attempt_ratio(&self) -> f64 {
        if !self.completed() {
            return f64::NAN;
        }
        self.brute_force.attempts as f64 / self.hill_climbing.attempts.max(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Ordered by length, starting at 1.
    pub trials: Vec<LengthTrial>,
}

impl SimulationReport {
    /// Time ratios in length order, ready for charting.
    pub fn ratios(&self) -> Vec<f64> {
        self.trials.iter().map(LengthTrial::time_ratio).collect()
    }
}

/// Runs both searchers over targets of every length from 1 up to a maximum.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    alphabet: Alphabet,
    budget: SearchBudget,
}

impl Simulation {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            budget: SearchBudget::unlimited(),
        }
    }

    /// Applies `budget` to every individual search in the run.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Draws a random target for each length in `1..=max_length` and times both searchers on it.
    ///
    /// A search that runs out of budget is recorded as an exhausted outcome and the
    /// run moves on to the next length. Any other search error aborts the run.
    pub fn run<R: Rng + ?Sized>(
        &self,
        max_length: usize,
        rng: &mut R,
    ) -> Result<SimulationReport, SearchError> {
        let mut brute = BruteForceSearcher::new(self.alphabet.clone()).with_budget(self.budget);
        let mut climber = HillClimbingSearcher::new(self.alphabet.clone()).with_budget(self.budget);
        let mut trials = Vec::with_capacity(max_length);

        for length in 1..=max_length {
            let target = self.alphabet.random_sequence(length, rng);
            info!("length {length}: target {target}");

            let brute_force = TrialOutcome::from_search(brute.search(&target, rng))?;
            log_outcome(length, Searcher::<R>::name(&brute), &brute_force);
            let hill_climbing = TrialOutcome::from_search(climber.search(&target, rng))?;
            log_outcome(length, Searcher::<R>::name(&climber), &hill_climbing);

            trials.push(LengthTrial {
                length,
                target,
                brute_force,
                hill_climbing,
            });
        }

        Ok(SimulationReport { trials })
    }
}

fn log_outcome(length: usize, searcher: &str, outcome: &TrialOutcome) {
    if outcome.exhausted {
        warn!(
            "length {length}: {searcher} gave up after {} attempts in {:.3}s",
            outcome.attempts, outcome.elapsed_secs
        );
    } else {
        info!(
            "length {length}: {searcher} took {} attempts in {:.3}s",
            outcome.attempts, outcome.elapsed_secs
        );
    }
}
