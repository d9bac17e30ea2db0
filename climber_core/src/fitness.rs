use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitnessError {
    /// Fitness is only defined for sequences of the same length.
    #[error("Cannot score an attempt of length {attempt} against an original of length {original}")]
    LengthMismatch { attempt: usize, original: usize },
}

/// Counts the positions at which `attempt` and `original` hold the same symbol.
///
/// The result lies in `0..=original.len()` and reaches the upper bound exactly
/// when the two sequences are equal.
pub fn measure_fitness(attempt: &[u8], original: &[u8]) -> Result<usize, FitnessError> {
    if attempt.len() != original.len() {
        return Err(FitnessError::LengthMismatch {
            attempt: attempt.len(),
            original: original.len(),
        });
    }
    Ok(attempt
        .iter()
        .zip(original)
        .filter(|(a, o)| a == o)
        .count())
}
