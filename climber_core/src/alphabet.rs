use crate::sequence::Sequence;
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

/// Errors raised while building an alphabet or validating a sequence against one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// An alphabet needs at least one symbol to draw from.
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,

    /// Each symbol may appear only once.
    #[error("Alphabet symbol {0:?} appears more than once")]
    DuplicateSymbol(char),

    /// Only printable, non-whitespace ASCII is accepted as a symbol.
    #[error("Byte 0x{0:02x} is not a printable ASCII symbol")]
    UnprintableSymbol(u8),

    /// Sequences of length zero cannot be searched for.
    #[error("Sequence must contain at least one symbol")]
    EmptySequence,

    /// A sequence contained a symbol the alphabet cannot produce.
    #[error("Symbol {symbol:?} at position {position} is not in the alphabet")]
    SymbolNotInAlphabet { symbol: char, position: usize },
}

/// An immutable, ordered set of symbols that guesses are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    members: [bool; 128],
}

impl Alphabet {
    /// Builds an alphabet from an explicit symbol list, keeping the given order.
    pub fn new(symbols: impl AsRef<[u8]>) -> Result<Self, AlphabetError> {
        let symbols = symbols.as_ref();
        if symbols.is_empty() {
            return Err(AlphabetError::EmptyAlphabet);
        }

        let mut members = [false; 128];
        let mut seen = HashSet::with_capacity(symbols.len());
        for &symbol in symbols {
            if !symbol.is_ascii_graphic() {
                return Err(AlphabetError::UnprintableSymbol(symbol));
            }
            if !seen.insert(symbol) {
                return Err(AlphabetError::DuplicateSymbol(symbol as char));
            }
            members[symbol as usize] = true;
        }

        Ok(Self {
            symbols: symbols.to_vec(),
            members,
        })
    }

    /// The 62-symbol set of uppercase letters, lowercase letters and digits.
    pub fn alphanumeric() -> Self {
        let symbols: Vec<u8> = UPPERCASE
            .iter()
            .chain(LOWERCASE)
            .chain(DIGITS)
            .copied()
            .collect();
        let mut members = [false; 128];
        for &symbol in &symbols {
            members[symbol as usize] = true;
        }
        Self { symbols, members }
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: u8) -> bool {
        symbol.is_ascii() && self.members[symbol as usize]
    }

    /// Draws one symbol uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        self.symbols[rng.random_range(0..self.symbols.len())]
    }

    /// Draws `length` symbols independently and uniformly.
    pub fn random_sequence<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Sequence {
        Sequence::from((0..length).map(|_| self.sample(rng)).collect::<Vec<u8>>())
    }

    /// Checks that `sequence` is non-empty and made only of this alphabet's symbols.
    pub fn validate(&self, sequence: &[u8]) -> Result<(), AlphabetError> {
        if sequence.is_empty() {
            return Err(AlphabetError::EmptySequence);
        }
        match sequence.iter().position(|&s| !self.contains(s)) {
            Some(position) => Err(AlphabetError::SymbolNotInAlphabet {
                symbol: sequence[position] as char,
                position,
            }),
            None => Ok(()),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::alphanumeric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    #[test]
    fn alphanumeric_has_62_unique_symbols() {
        let alphabet = Alphabet::alphanumeric();
        assert_eq!(alphabet.len(), 62);
        let unique: HashSet<u8> = alphabet.symbols().iter().copied().collect();
        assert_eq!(unique.len(), 62);
        assert!(alphabet.contains(b'A'));
        assert!(alphabet.contains(b'z'));
        assert!(alphabet.contains(b'7'));
        assert!(!alphabet.contains(b'-'));
        assert!(!alphabet.contains(0xC3));
    }

    #[test]
    fn new_rejects_bad_symbol_lists() {
        assert_eq!(Alphabet::new(b""), Err(AlphabetError::EmptyAlphabet));
        assert_eq!(
            Alphabet::new(b"ABA"),
            Err(AlphabetError::DuplicateSymbol('A'))
        );
        assert_eq!(
            Alphabet::new(b"A B"),
            Err(AlphabetError::UnprintableSymbol(b' '))
        );
    }

    #[test]
    fn validate_reports_first_foreign_symbol() {
        let alphabet = Alphabet::new(b"AB").unwrap();
        assert!(alphabet.validate(b"ABBA").is_ok());
        assert_eq!(alphabet.validate(b""), Err(AlphabetError::EmptySequence));
        assert_eq!(
            alphabet.validate(b"ABCA"),
            Err(AlphabetError::SymbolNotInAlphabet {
                symbol: 'C',
                position: 2
            })
        );
    }

    #[test]
    fn random_sequence_draws_only_alphabet_symbols() {
        let alphabet = Alphabet::new(b"xyz").unwrap();
        let mut rng = ChaCha8Rng::from_seed([3u8; 32]);
        let sequence = alphabet.random_sequence(200, &mut rng);
        assert_eq!(sequence.len(), 200);
        assert!(sequence.iter().all(|&s| alphabet.contains(s)));
        for symbol in alphabet.symbols() {
            assert!(
                sequence.iter().any(|s| s == symbol),
                "symbol {:?} never drawn in 200 samples",
                *symbol as char
            );
        }
    }
}
