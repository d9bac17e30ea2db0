use crate::search::SearchResult;
use log::debug;

/// A `SearchObserver` watches a single search run from start to finish.
///
/// Searchers call into the observer at fixed points of their loop: once before
/// the first attempt, after every attempt, whenever a hill-climbing candidate is
/// accepted, and once more on success. Observers only watch; they cannot steer
/// the search.
///
/// All methods have empty default bodies so implementations override only what
/// they need.
pub trait SearchObserver {
    /// A static name identifying the observer in logs.
    fn name(&self) -> &'static str;

    /// Called once before the first attempt.
    ///
    /// # Arguments
    /// * `target_len`: The length of the sequence being searched for.
    /// * `initial_score`: The fitness of the starting guess, when the strategy tracks one.
    fn on_start(&mut self, _target_len: usize, _initial_score: Option<usize>) {}

    /// Called after each counted attempt, with the running attempt total.
    fn on_attempt(&mut self, _attempts: u64) {}

    /// Called when a candidate strictly improves the retained guess.
    fn on_accept(&mut self, _attempts: u64, _score: usize) {}

    /// Called once when the target has been reproduced.
    fn on_finish(&mut self, _result: &SearchResult) {}
}

/// Observes nothing. The default observer for every searcher.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoOpObserver;

impl SearchObserver for NoOpObserver {
    fn name(&self) -> &'static str {
        "NoOpObserver"
    }
}

/// Records the score of the starting guess and of every accepted candidate.
#[derive(Default, Debug, Clone)]
pub struct AcceptanceRecorder {
    pub initial_score: Option<usize>,
    /// `(attempt, score)` pairs in the order they were accepted.
    pub accepted: Vec<(u64, usize)>,
    pub attempts_seen: u64,
    pub finished: bool,
}

impl AcceptanceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scores(&self) -> Vec<usize> {
        self.accepted.iter().map(|&(_, score)| score).collect()
    }

    /// True when the starting score followed by every accepted score is strictly increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        let mut trail: Vec<usize> = self.initial_score.into_iter().collect();
        trail.extend(self.scores());
        trail.windows(2).all(|pair| pair[0] < pair[1])
    }
}

impl SearchObserver for AcceptanceRecorder {
    fn name(&self) -> &'static str {
        "AcceptanceRecorder"
    }

    fn on_start(&mut self, _target_len: usize, initial_score: Option<usize>) {
        self.initial_score = initial_score;
        self.accepted.clear();
        self.attempts_seen = 0;
        self.finished = false;
    }

    fn on_attempt(&mut self, attempts: u64) {
        self.attempts_seen = attempts;
    }

    fn on_accept(&mut self, attempts: u64, score: usize) {
        self.accepted.push((attempts, score));
    }

    fn on_finish(&mut self, _result: &SearchResult) {
        self.finished = true;
    }
}

/// Emits a `debug` log line every `every` attempts and on each acceptance.
#[derive(Debug, Clone)]
pub struct ProgressLogger {
    every: u64,
    target_len: usize,
}

impl ProgressLogger {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            target_len: 0,
        }
    }
}

impl SearchObserver for ProgressLogger {
    fn name(&self) -> &'static str {
        "ProgressLogger"
    }

    fn on_start(&mut self, target_len: usize, initial_score: Option<usize>) {
        self.target_len = target_len;
        match initial_score {
            Some(score) => debug!("search started: length {target_len}, initial score {score}"),
            None => debug!("search started: length {target_len}"),
        }
    }

    fn on_attempt(&mut self, attempts: u64) {
        if attempts % self.every == 0 {
            debug!("{attempts} attempts so far");
        }
    }

    fn on_accept(&mut self, attempts: u64, score: usize) {
        debug!(
            "attempt {attempts}: accepted candidate scoring {score}/{}",
            self.target_len
        );
    }

    fn on_finish(&mut self, result: &SearchResult) {
        debug!(
            "search finished after {} attempts in {:.3}s",
            result.attempts,
            result.elapsed_secs()
        );
    }
}
