use crate::alphabet::{Alphabet, AlphabetError};
use crate::fitness::{FitnessError, measure_fitness};
use crate::mutator::{MutationError, Mutator, ResampleMutator, SinglePositionMutator};
use crate::observer::{NoOpObserver, SearchObserver};
use crate::sequence::Sequence;
use log::{debug, warn};
use rand::Rng;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that stop a search before it reproduces the target.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The target was empty or used symbols outside the searcher's alphabet.
    #[error("Invalid target: {0}")]
    InvalidTarget(#[from] AlphabetError),
    /// A candidate could not be scored against the target.
    #[error("Scoring failed: {0}")]
    Fitness(#[from] FitnessError),
    /// The mutator could not produce a candidate.
    #[error("Mutation failed: {0}")]
    Mutation(#[from] MutationError),
    /// The configured attempt or time limit was reached before a match.
    #[error(
        "Search budget exhausted after {attempts} attempts ({:.3}s) on a target of length {target_len}",
        .elapsed.as_secs_f64()
    )]
    BudgetExhausted {
        attempts: u64,
        elapsed: Duration,
        /// Fitness of the retained guess, for strategies that keep one.
        best_score: Option<usize>,
        target_len: usize,
    },
}

/// Upper bounds on how long a single search may run.
///
/// The default is unlimited: the search loops until it reproduces the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_attempts: Option<u64>,
    pub timeout: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_attempts.is_none() && self.timeout.is_none()
    }

    /// Whether another attempt may be made after `attempts` attempts, `start` being when the search began.
    fn allows(&self, attempts: u64, start: Instant) -> bool {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return false;
        }
        !self.timeout.is_some_and(|timeout| start.elapsed() >= timeout)
    }
}

/// Outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Candidates generated and compared after the starting guess.
    pub attempts: u64,
    pub elapsed: Duration,
    /// Equal to the target.
    pub final_guess: Sequence,
}

impl SearchResult {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// A strategy that reconstructs a hidden target sequence by guessing.
pub trait Searcher<R: Rng + ?Sized> {
    fn name(&self) -> &'static str;

    /// Searches for `target`, reporting progress to `observer`.
    fn search_observed(
        &mut self,
        target: &Sequence,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchResult, SearchError>;

    /// Searches for `target` without observation.
    fn search(&mut self, target: &Sequence, rng: &mut R) -> Result<SearchResult, SearchError> {
        self.search_observed(target, rng, &mut NoOpObserver)
    }
}

/// Guesses by drawing a completely new random sequence every attempt.
///
/// Nothing learned from one attempt is carried into the next.
#[derive(Debug, Clone, Default)]
pub struct BruteForceSearcher {
    alphabet: Alphabet,
    budget: SearchBudget,
}

impl BruteForceSearcher {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            budget: SearchBudget::unlimited(),
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }
}

impl<R: Rng + ?Sized> Searcher<R> for BruteForceSearcher {
    fn name(&self) -> &'static str {
        "Brute force"
    }

    fn search_observed(
        &mut self,
        target: &Sequence,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchResult, SearchError> {
        self.alphabet.validate(target)?;
        debug!(
            "brute force: searching for a length-{} target over {} symbols",
            target.len(),
            self.alphabet.len()
        );

        let start = Instant::now();
        let mut resample = ResampleMutator::new(target.len());
        observer.on_start(target.len(), None);

        let mut guess = resample.mutate(None, &self.alphabet, rng)?;
        let mut attempts = 0u64;
        while guess != *target {
            if !self.budget.allows(attempts, start) {
                let elapsed = start.elapsed();
                warn!("brute force: budget exhausted after {attempts} attempts");
                return Err(SearchError::BudgetExhausted {
                    attempts,
                    elapsed,
                    best_score: None,
                    target_len: target.len(),
                });
            }
            guess = resample.mutate(None, &self.alphabet, rng)?;
            attempts += 1;
            observer.on_attempt(attempts);
        }

        let result = SearchResult {
            attempts,
            elapsed: start.elapsed(),
            final_guess: guess,
        };
        observer.on_finish(&result);
        debug!(
            "brute force: matched after {} attempts in {:.3}s",
            result.attempts,
            result.elapsed_secs()
        );
        Ok(result)
    }
}

/// Guesses by mutating a retained best guess and keeping only strict improvements.
///
/// The retained fitness never decreases: a candidate replaces the guess only
/// when it scores strictly higher, so ties and regressions are discarded.
#[derive(Debug, Clone)]
pub struct HillClimbingSearcher<M = SinglePositionMutator> {
    alphabet: Alphabet,
    budget: SearchBudget,
    mutator: M,
}

impl HillClimbingSearcher<SinglePositionMutator> {
    pub fn new(alphabet: Alphabet) -> Self {
        Self::with_mutator(alphabet, SinglePositionMutator)
    }
}

impl Default for HillClimbingSearcher<SinglePositionMutator> {
    fn default() -> Self {
        Self::new(Alphabet::default())
    }
}

impl<M> HillClimbingSearcher<M> {
    pub fn with_mutator(alphabet: Alphabet, mutator: M) -> Self {
        Self {
            alphabet,
            budget: SearchBudget::unlimited(),
            mutator,
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Climbs from an explicit starting guess instead of a random one.
    ///
    /// Both `initial` and `target` are validated against the alphabet, and they must
    /// have the same length.
    pub fn climb_from<R: Rng + ?Sized>(
        &mut self,
        initial: Sequence,
        target: &Sequence,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchResult, SearchError>
    where
        M: Mutator<R>,
    {
        self.alphabet.validate(target)?;
        self.alphabet.validate(&initial)?;
        self.climb(initial, target, rng, observer, Instant::now())
    }

    fn climb<R: Rng + ?Sized>(
        &mut self,
        initial: Sequence,
        target: &Sequence,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
        start: Instant,
    ) -> Result<SearchResult, SearchError>
    where
        M: Mutator<R>,
    {
        let mut guess = initial;
        let mut fitness = measure_fitness(&guess, target)?;
        observer.on_start(target.len(), Some(fitness));
        debug!(
            "hill climbing: length-{} target, starting score {fitness}",
            target.len()
        );

        let mut attempts = 0u64;
        while guess != *target {
            if !self.budget.allows(attempts, start) {
                warn!(
                    "hill climbing: budget exhausted after {attempts} attempts at score {fitness}/{}",
                    target.len()
                );
                return Err(SearchError::BudgetExhausted {
                    attempts,
                    elapsed: start.elapsed(),
                    best_score: Some(fitness),
                    target_len: target.len(),
                });
            }

            let candidate = self.mutator.mutate(Some(&guess), &self.alphabet, rng)?;
            let candidate_fitness = measure_fitness(&candidate, target)?;
            attempts += 1;
            observer.on_attempt(attempts);

            if candidate_fitness > fitness {
                guess = candidate;
                fitness = candidate_fitness;
                observer.on_accept(attempts, fitness);
            }
        }

        let result = SearchResult {
            attempts,
            elapsed: start.elapsed(),
            final_guess: guess,
        };
        observer.on_finish(&result);
        debug!(
            "hill climbing: matched after {} attempts in {:.3}s",
            result.attempts,
            result.elapsed_secs()
        );
        Ok(result)
    }
}

impl<R, M> Searcher<R> for HillClimbingSearcher<M>
where
    R: Rng + ?Sized,
    M: Mutator<R>,
{
    fn name(&self) -> &'static str {
        "Hill climbing"
    }

    fn search_observed(
        &mut self,
        target: &Sequence,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchResult, SearchError> {
        self.alphabet.validate(target)?;
        let start = Instant::now();
        let initial = self.alphabet.random_sequence(target.len(), rng);
        self.climb(initial, target, rng, observer, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutator::test_utils::ScriptedMutator;
    use crate::observer::AcceptanceRecorder;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    const LONG_TARGET: &str = "rs2b324nh23ne4hnh23bpnnh23nefwt32423vtstsd34td34d23";

    #[test]
    fn brute_force_reproduces_short_targets() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let mut searcher = BruteForceSearcher::new(Alphabet::new(b"abcd").unwrap());
        for target in ["a", "dc", "bad", "cabd"] {
            let target = Sequence::from(target);
            let result = searcher.search(&target, &mut rng).unwrap();
            assert_eq!(result.final_guess, target);
        }
    }

    #[test]
    fn brute_force_handles_single_symbol_over_full_alphabet() {
        let mut rng = ChaCha8Rng::from_seed([5u8; 32]);
        let mut searcher = BruteForceSearcher::new(Alphabet::alphanumeric());
        let target = Sequence::from("Q");
        let result = searcher.search(&target, &mut rng).unwrap();
        assert_eq!(result.final_guess, target);
    }

    #[test]
    fn brute_force_counts_every_resample() {
        let mut rng = ChaCha8Rng::from_seed([9u8; 32]);
        let mut searcher = BruteForceSearcher::new(Alphabet::new(b"01").unwrap());
        let mut recorder = AcceptanceRecorder::new();
        let target = Sequence::from("0110");
        let result = searcher
            .search_observed(&target, &mut rng, &mut recorder)
            .unwrap();
        assert_eq!(recorder.attempts_seen, result.attempts);
        assert!(recorder.accepted.is_empty());
        assert!(recorder.finished);
    }

    #[test]
    fn invalid_targets_fail_before_searching() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let mut brute = BruteForceSearcher::new(Alphabet::alphanumeric());
        let mut climber = HillClimbingSearcher::new(Alphabet::alphanumeric());

        for target in [Sequence::default(), Sequence::from("pass word"), Sequence::from("é")] {
            assert!(matches!(
                brute.search(&target, &mut rng),
                Err(SearchError::InvalidTarget(_))
            ));
            assert!(matches!(
                climber.search(&target, &mut rng),
                Err(SearchError::InvalidTarget(_))
            ));
        }
    }

    #[test]
    fn brute_force_stops_at_attempt_limit() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let mut searcher = BruteForceSearcher::new(Alphabet::alphanumeric())
            .with_budget(SearchBudget::unlimited().with_max_attempts(10));
        let target = Sequence::from("Zq81xP");
        match searcher.search(&target, &mut rng) {
            Err(SearchError::BudgetExhausted {
                attempts,
                best_score,
                target_len,
                ..
            }) => {
                assert_eq!(attempts, 10);
                assert_eq!(best_score, None);
                assert_eq!(target_len, 6);
            }
            other => panic!("expected BudgetExhausted, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_stops_both_searchers_immediately() {
        let mut rng = ChaCha8Rng::from_seed([2u8; 32]);
        let budget = SearchBudget::unlimited().with_timeout(Duration::ZERO);
        let target = Sequence::from(LONG_TARGET);

        let mut brute = BruteForceSearcher::new(Alphabet::alphanumeric()).with_budget(budget);
        assert!(matches!(
            brute.search(&target, &mut rng),
            Err(SearchError::BudgetExhausted { attempts: 0, .. })
        ));

        let mut climber = HillClimbingSearcher::new(Alphabet::alphanumeric()).with_budget(budget);
        assert!(matches!(
            climber.search(&target, &mut rng),
            Err(SearchError::BudgetExhausted { attempts: 0, .. })
        ));
    }

    #[test]
    fn brute_force_returns_zero_attempts_on_matching_first_draw() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let mut searcher = BruteForceSearcher::new(Alphabet::new(b"A").unwrap());
        let mut recorder = AcceptanceRecorder::new();
        let target = Sequence::from("AAA");
        let result = searcher
            .search_observed(&target, &mut rng, &mut recorder)
            .unwrap();
        assert_eq!(result.attempts, 0);
        assert_eq!(result.final_guess, target);
        assert_eq!(recorder.attempts_seen, 0);
        assert!(recorder.finished);
    }

    #[test]
    fn hill_climbing_from_the_target_makes_no_attempts() {
        let mut searcher = HillClimbingSearcher::new(Alphabet::alphanumeric());
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let mut recorder = AcceptanceRecorder::new();
        let target = Sequence::from("sr2");
        let result = searcher
            .climb_from(target.clone(), &target, &mut rng, &mut recorder)
            .unwrap();
        assert_eq!(result.attempts, 0);
        assert_eq!(result.final_guess, target);
        assert_eq!(recorder.initial_score, Some(3));
        assert!(recorder.accepted.is_empty());
        assert!(recorder.finished);
    }

    #[test]
    fn hill_climbing_reproduces_long_target() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let mut searcher = HillClimbingSearcher::new(Alphabet::alphanumeric());
        let target = Sequence::from(LONG_TARGET);
        let result = searcher.search(&target, &mut rng).unwrap();
        assert_eq!(result.final_guess, target);
        assert!(result.attempts > 0);
    }

    #[test]
    fn hill_climbing_handles_single_symbol() {
        let mut rng = ChaCha8Rng::from_seed([4u8; 32]);
        let mut searcher = HillClimbingSearcher::new(Alphabet::alphanumeric());
        let target = Sequence::from("7");
        let result = searcher.search(&target, &mut rng).unwrap();
        assert_eq!(result.final_guess, target);
    }

    #[test]
    fn hill_climbing_scores_only_ratchet_upwards() {
        let target = Sequence::from("HillClimb3r");
        for seed in 0..8u8 {
            let mut rng = ChaCha8Rng::from_seed([seed; 32]);
            let mut searcher = HillClimbingSearcher::new(Alphabet::alphanumeric());
            let mut recorder = AcceptanceRecorder::new();
            let result = searcher
                .search_observed(&target, &mut rng, &mut recorder)
                .unwrap();

            assert!(recorder.is_strictly_increasing(), "seed {seed}: {recorder:?}");
            assert!(recorder.scores().iter().all(|&s| s <= target.len()));
            assert!(recorder.accepted.len() <= target.len());
            let final_score = recorder
                .scores()
                .last()
                .copied()
                .or(recorder.initial_score)
                .unwrap();
            assert_eq!(final_score, target.len());
            assert_eq!(recorder.attempts_seen, result.attempts);
        }
    }

    #[test]
    fn hill_climbing_follows_fixed_schedule_on_two_symbols() {
        let alphabet = Alphabet::new(b"AB").unwrap();
        // Tie at 0, accept "AA" at 1, reject "BA" at 0, accept "AB" at 2.
        let schedule = ScriptedMutator::new([(0, b'B'), (0, b'A'), (0, b'B'), (1, b'B')]);
        let mut searcher = HillClimbingSearcher::with_mutator(alphabet, schedule);
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let mut recorder = AcceptanceRecorder::new();
        let target = Sequence::from("AB");

        let result = searcher
            .climb_from(Sequence::from("BA"), &target, &mut rng, &mut recorder)
            .unwrap();

        assert_eq!(result.final_guess, target);
        assert_eq!(result.attempts, 4);
        assert_eq!(recorder.initial_score, Some(0));
        assert_eq!(recorder.accepted, vec![(2, 1), (4, 2)]);
        assert!(recorder.accepted.len() <= target.len());
    }

    #[test]
    fn hill_climbing_reports_best_score_when_exhausted() {
        let alphabet = Alphabet::new(b"AB").unwrap();
        let schedule = ScriptedMutator::new([(0, b'A')]);
        let mut searcher = HillClimbingSearcher::with_mutator(alphabet, schedule)
            .with_budget(SearchBudget::unlimited().with_max_attempts(3));
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);

        let err = searcher
            .climb_from(
                Sequence::from("BBB"),
                &Sequence::from("AAA"),
                &mut rng,
                &mut NoOpObserver,
            )
            .unwrap_err();
        match err {
            SearchError::BudgetExhausted {
                attempts,
                best_score,
                ..
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(best_score, Some(1));
            }
            other => panic!("expected BudgetExhausted, got {other:?}"),
        }
    }

    #[test]
    fn climb_from_rejects_mismatched_start() {
        let mut searcher = HillClimbingSearcher::new(Alphabet::alphanumeric());
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let err = searcher
            .climb_from(
                Sequence::from("ab"),
                &Sequence::from("abc"),
                &mut rng,
                &mut NoOpObserver,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::Fitness(FitnessError::LengthMismatch {
                attempt: 2,
                original: 3
            })
        ));
    }

    #[test]
    fn same_seed_gives_same_result() {
        let target = Sequence::from("sr2");
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut searcher = HillClimbingSearcher::new(Alphabet::alphanumeric());
            searcher.search(&target, &mut rng).unwrap().attempts
        };
        assert_eq!(run(42), run(42));
    }
}
