use crate::alphabet::Alphabet;
use crate::sequence::Sequence;
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The mutator edits an existing guess and was given nothing to edit.
    #[error("Mutator requires a non-empty base sequence")]
    EmptyBase,
    /// A generating mutator was asked to produce zero symbols.
    #[error("Cannot generate a sequence of length zero")]
    ZeroLength,
}

/// A `Mutator` produces the next candidate guess during a search.
///
/// Searchers never build candidates themselves; they ask a mutator for one and
/// score whatever comes back.
///
/// # Type Parameters
/// * `R`: The type of random number generator used for mutation decisions.
pub trait Mutator<R: Rng + ?Sized> {
    /// Produces a new candidate sequence.
    ///
    /// # Arguments
    /// * `base`: The current guess, if the strategy builds on one.
    ///   - `Some(sequence)`: the candidate is derived from `sequence`, which is left untouched.
    ///   - `None`: the mutator must generate a candidate from scratch, or fail if it cannot.
    /// * `alphabet`: The symbols a candidate may contain.
    /// * `rng`: A mutable reference to a random number generator.
    ///
    /// # Returns
    /// `Ok(candidate)` or a `MutationError` if the request cannot be satisfied.
    fn mutate(
        &mut self,
        base: Option<&Sequence>,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Result<Sequence, MutationError>;
}

/// Discards the base entirely and draws a fresh uniform sequence of `length` symbols.
///
/// This is the memoryless candidate source behind brute-force search.
#[derive(Debug, Clone, Copy)]
pub struct ResampleMutator {
    length: usize,
}

impl ResampleMutator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl<R: Rng + ?Sized> Mutator<R> for ResampleMutator {
    fn mutate(
        &mut self,
        _base: Option<&Sequence>,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Result<Sequence, MutationError> {
        if self.length == 0 {
            return Err(MutationError::ZeroLength);
        }
        Ok(alphabet.random_sequence(self.length, rng))
    }
}

/// Copies the base and overwrites one uniformly chosen position with a uniformly
/// chosen symbol.
///
/// The replacement may equal the symbol already there, in which case the
/// candidate is identical to the base.
#[derive(Debug, Default, Clone, Copy)]
pub struct SinglePositionMutator;

impl<R: Rng + ?Sized> Mutator<R> for SinglePositionMutator {
    fn mutate(
        &mut self,
        base: Option<&Sequence>,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Result<Sequence, MutationError> {
        let mut candidate = match base {
            Some(sequence) if !sequence.is_empty() => sequence.clone(),
            _ => return Err(MutationError::EmptyBase),
        };

        let position = rng.random_range(0..candidate.len());
        candidate[position] = alphabet.sample(rng);
        Ok(candidate)
    }
}
