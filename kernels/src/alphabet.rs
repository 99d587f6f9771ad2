//! Registry of the supported sequence alphabets and conversion of raw sequences into
//! numeric codes.
use crate::error::Error;
use crate::Result;
use bio::alphabets::{Alphabet, RankTransform};
use std::fmt;
use std::str::FromStr;

/// Code given to any symbol outside of the alphabet.  It never equals a valid code so
/// windows containing it never contribute to a spectrum.
pub const SENTINEL: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Closed set of alphabets, a symbol's position in [`AlphabetKind::symbols`] is its code
pub enum AlphabetKind {
    /// `ACGT`
    Dna,
    /// `ACGU`
    Rna,
    /// The 20 standard amino acids
    AminoAcid,
    /// Amino acids plus selenocysteine (`U`)
    AminoAcidSec,
}

impl AlphabetKind {
    /// All alphabets ordered by their integer id
    pub const ALL: [AlphabetKind; 4] = [
        AlphabetKind::Dna,
        AlphabetKind::Rna,
        AlphabetKind::AminoAcid,
        AlphabetKind::AminoAcidSec,
    ];

    /// Ordered symbols of the alphabet
    pub fn symbols(self) -> &'static [u8] {
        match self {
            AlphabetKind::Dna => b"ACGT",
            AlphabetKind::Rna => b"ACGU",
            AlphabetKind::AminoAcid => b"ACDEFGHIKLMNPQRSTVWY",
            AlphabetKind::AminoAcidSec => b"ACDEFGHIKLMNPQRSTUVWY",
        }
    }

    /// Number of symbols
    pub fn size(self) -> usize {
        self.symbols().len()
    }

    /// Whether complementary bases exist
    pub fn is_nucleotide(self) -> bool {
        matches!(self, AlphabetKind::Dna | AlphabetKind::Rna)
    }

    /// Looks an alphabet up by its integer id (`0` dna, `1` rna, `2` aa, `3` aa+s)
    pub fn from_id(id: usize) -> Result<Self> {
        Self::ALL
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownAlphabet(id.to_string()))
    }

    /// Symbolic name accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            AlphabetKind::Dna => "dna",
            AlphabetKind::Rna => "rna",
            AlphabetKind::AminoAcid => "aa",
            AlphabetKind::AminoAcidSec => "aa+s",
        }
    }
}

impl Default for AlphabetKind {
    fn default() -> Self {
        AlphabetKind::Dna
    }
}

impl fmt::Display for AlphabetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlphabetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(AlphabetKind::Dna),
            "rna" => Ok(AlphabetKind::Rna),
            "aa" | "protein" => Ok(AlphabetKind::AminoAcid),
            "aa+s" => Ok(AlphabetKind::AminoAcidSec),
            _ => Err(Error::UnknownAlphabet(s.to_string())),
        }
    }
}

/// Maps symbols of one alphabet to their numeric codes
pub struct Encoder {
    kind: AlphabetKind,
    alphabet: Alphabet,
    ranks: RankTransform,
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder").field("kind", &self.kind).finish()
    }
}

impl Encoder {
    /// Creates the encoder for `kind`
    pub fn new(kind: AlphabetKind) -> Self {
        let alphabet = Alphabet::new(kind.symbols());
        // symbols are listed in ascending byte order so ranks equal list positions
        let ranks = RankTransform::new(&alphabet);
        Self {
            kind,
            alphabet,
            ranks,
        }
    }

    /// The alphabet encoded
    pub fn kind(&self) -> AlphabetKind {
        self.kind
    }

    /// Code of `symbol`, [`SENTINEL`] when it is not in the alphabet
    pub fn code(&self, symbol: u8) -> u8 {
        if self.alphabet.is_word(&[symbol]) {
            self.ranks.get(symbol)
        } else {
            SENTINEL
        }
    }

    /// Encodes a whole sequence, unknown symbols become [`SENTINEL`]
    pub fn encode(&self, seq: &[u8]) -> Vec<u8> {
        seq.iter().map(|&c| self.code(c)).collect()
    }

    /// Symbol for a code, `None` for codes outside of the alphabet
    pub fn decode(&self, code: u8) -> Option<u8> {
        self.kind.symbols().get(code as usize).copied()
    }

    /// Complementary code (`A <-> T/U`, `C <-> G`), the sentinel stays a sentinel
    pub fn complement(&self, code: u8) -> u8 {
        if code == SENTINEL {
            code
        } else {
            (self.kind.size() as u8 - 1) - code
        }
    }
}

/// Applies the flanking policy to a raw sequence.  Lower case characters mark flanking
/// regions: they are upper cased when included and removed together with every other
/// character outside of `A`-`Z` otherwise.
pub fn prepare(seq: &[u8], include_flanking: bool) -> Vec<u8> {
    if include_flanking {
        seq.to_ascii_uppercase()
    } else {
        seq.iter().copied().filter(u8::is_ascii_uppercase).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Sequences handed to the gappy pair engines, either as characters or already encoded
pub enum SequenceInput {
    /// Character sequences, flanking policy and encoding still to be applied
    Raw(Vec<Vec<u8>>),
    /// Code sequences, any code outside of the alphabet is treated as unknown
    Encoded(Vec<Vec<u8>>),
}

impl SequenceInput {
    /// Wraps character sequences
    pub fn raw<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        SequenceInput::Raw(
            sequences
                .into_iter()
                .map(|seq| seq.as_ref().to_vec())
                .collect(),
        )
    }

    /// Number of sequences
    pub fn len(&self) -> usize {
        match self {
            SequenceInput::Raw(seqs) | SequenceInput::Encoded(seqs) => seqs.len(),
        }
    }

    /// True when no sequence was supplied
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves the input into code sequences.  The flanking policy only applies to raw
    /// input.
    pub fn resolve(self, encoder: &Encoder, include_flanking: bool) -> Vec<Vec<u8>> {
        match self {
            SequenceInput::Raw(seqs) => seqs
                .iter()
                .map(|seq| encoder.encode(&prepare(seq, include_flanking)))
                .collect(),
            SequenceInput::Encoded(seqs) => {
                let size = encoder.kind().size() as u8;
                seqs.into_iter()
                    .map(|seq| {
                        seq.into_iter()
                            .map(|c| if c < size { c } else { SENTINEL })
                            .collect()
                    })
                    .collect()
            }
        }
    }
}
