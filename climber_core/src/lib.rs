pub mod alphabet;
pub mod config;
pub mod fitness;
pub mod mutator;
pub mod observer;
pub mod report;
pub mod search;
pub mod sequence;
pub mod simulation;

pub use alphabet::{Alphabet, AlphabetError};
pub use config::ClimberConfig;
pub use fitness::{FitnessError, measure_fitness};
pub use mutator::{MutationError, Mutator, ResampleMutator, SinglePositionMutator};
pub use observer::{AcceptanceRecorder, NoOpObserver, ProgressLogger, SearchObserver};
pub use report::{format_result, render_ratio_chart};
pub use search::{
    BruteForceSearcher, HillClimbingSearcher, SearchBudget, SearchError, SearchResult, Searcher,
};
pub use sequence::Sequence;
pub use simulation::{LengthTrial, Simulation, SimulationReport, TrialOutcome};
