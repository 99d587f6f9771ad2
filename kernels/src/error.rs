//! Error type shared by every kernel.
use crate::alphabet::AlphabetKind;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while validating kernel parameters or assembling matrices
pub enum Error {
    #[error("Alphabet too small, size must be at least 2 but got {0}")]
    /// Alphabet size below two
    AlphabetTooSmall(usize),
    #[error("Alphabet too large, at most 255 symbols can be coded but got {0}")]
    /// Alphabet size above what a byte code can hold
    AlphabetTooLarge(usize),
    #[error("Mismatch count {m} is too large for k = {k}, at most k / 2 mismatches are allowed")]
    /// `2 * m > k`
    MismatchTooLarge {
        /// k-mer length
        k: usize,
        /// allowed mismatches
        m: usize,
    },
    #[error("Invalid k-mer length {0}")]
    /// k of zero or a feature space too large to address
    InvalidKmerLength(usize),
    #[error("No sequences supplied")]
    /// Operation is undefined over an empty collection
    EmptyInput,
    #[error("Reverse complement is not defined for the {0} alphabet")]
    /// Reverse complement requested on a protein alphabet
    ReverseComplementUnsupported(AlphabetKind),
    #[error("Unknown alphabet `{0}`, expected one of dna, rna, aa or aa+s")]
    /// Alphabet name or id not in the registry
    UnknownAlphabet(String),
    #[error("Symbol {symbol} in sequence {index} is outside of an alphabet of size {size}")]
    /// Integer coded sequence holds a symbol not below the alphabet size
    SymbolOutOfRange {
        /// sequence index
        index: usize,
        /// offending code
        symbol: u8,
        /// alphabet size
        size: usize,
    },
    #[error("Expected a square matrix but got {0}x{1}")]
    /// Kernel normalization on a non-square matrix
    NotSquare(usize, usize),
}
