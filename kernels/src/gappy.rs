//! Gappy pair kernel by direct enumeration of windows.
//!
//! Every window is a pair of k-mers separated by a gap of `0..=g` skipped characters.  A
//! window is mapped to a column by reading the `2k` codes of its two halves as the digits
//! of a base `|alphabet|` number, most significant digit first, e.g. with DNA
//! `AUUC -> 0331 -> 0*4^3 + 3*4^2 + 3*4^1 + 1*4^0`.
use crate::alphabet::{AlphabetKind, Encoder, SequenceInput, SENTINEL};
use crate::error::Error;
use crate::matrix::{FeatureMatrix, Layout};
use crate::Result;
use log::{debug, info};
use rayon::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Parameters of the gappy pair spectrum
pub struct GappyParams {
    /// Length of each half of the pair
    pub k: usize,
    /// Largest gap between the two halves
    pub g: usize,
    /// Alphabet of the sequences
    pub alphabet: AlphabetKind,
    /// Count a window and its reverse complement in the same column
    pub reverse_complement: bool,
    /// Upper case flanking (lower case) regions instead of dropping them
    pub include_flanking: bool,
    /// Give every gap length its own block of columns
    pub gap_different: bool,
}

impl Default for GappyParams {
    fn default() -> Self {
        Self {
            k: 1,
            g: 0,
            alphabet: AlphabetKind::Dna,
            reverse_complement: false,
            include_flanking: false,
            gap_different: true,
        }
    }
}

impl GappyParams {
    /// Pairs of `k`-mers over `alphabet` without gaps
    pub fn new(k: usize, alphabet: AlphabetKind) -> Self {
        Self {
            k,
            alphabet,
            ..Self::default()
        }
    }

    /// Sets the largest gap
    pub fn gap(mut self, g: usize) -> Self {
        self.g = g;
        self
    }

    /// Enables reverse complement canonicalization
    pub fn reverse_complement(mut self, yes: bool) -> Self {
        self.reverse_complement = yes;
        self
    }

    /// Sets the flanking policy
    pub fn include_flanking(mut self, yes: bool) -> Self {
        self.include_flanking = yes;
        self
    }

    /// Separates (`true`) or merges (`false`) the columns of different gap lengths
    pub fn gap_different(mut self, yes: bool) -> Self {
        self.gap_different = yes;
        self
    }

    /// Rejects parameters without a meaningful or addressable feature space
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidKmerLength(self.k));
        }
        if self.reverse_complement && !self.alphabet.is_nucleotide() {
            return Err(Error::ReverseComplementUnsupported(self.alphabet));
        }
        self.checked_width()
            .map(|_| ())
            .ok_or(Error::InvalidKmerLength(self.k))
    }

    fn checked_width(&self) -> Option<usize> {
        let block = self.alphabet.size().checked_pow((2 * self.k) as u32)?;
        if self.gap_different {
            block.checked_mul(self.g + 1)
        } else {
            Some(block)
        }
    }

    /// Columns per gap length, `|alphabet|^(2k)`
    pub fn block_len(&self) -> usize {
        self.alphabet.size().pow((2 * self.k) as u32)
    }

    /// Length of every feature vector
    pub fn width(&self) -> usize {
        if self.gap_different {
            (self.g + 1) * self.block_len()
        } else {
            self.block_len()
        }
    }

    /// Column of a window with the given gap, `None` when the window holds an unknown
    /// symbol
    pub(crate) fn column(&self, encoder: &Encoder, window: &[u8], gap: usize) -> Option<usize> {
        let index = window_index(encoder, window, self.reverse_complement)?;
        Some(if self.gap_different {
            gap * self.block_len() + index
        } else {
            index
        })
    }
}

/// Reads `codes` as a base `base` number, `None` if a code is the sentinel
pub(crate) fn rank<I: IntoIterator<Item = u8>>(codes: I, base: usize) -> Option<usize> {
    codes.into_iter().try_fold(0usize, |acc, code| {
        if code == SENTINEL {
            None
        } else {
            Some(acc * base + code as usize)
        }
    })
}

/// Index of a window, canonicalized against its reverse complement when asked.  The
/// smaller of the two code sequences is the canonical one.
pub(crate) fn window_index(encoder: &Encoder, window: &[u8], reverse: bool) -> Option<usize> {
    let base = encoder.kind().size();
    if window.contains(&SENTINEL) {
        return None;
    }
    if reverse {
        let revcomp: Vec<u8> = window.iter().rev().map(|&c| encoder.complement(c)).collect();
        if revcomp.as_slice() < window {
            return rank(revcomp, base);
        }
    }
    rank(window.iter().copied(), base)
}

/// Gappy pair counts of one encoded sequence as sorted `(column, count)` pairs
pub fn gappy_pair_counts(encoder: &Encoder, seq: &[u8], params: &GappyParams) -> Vec<(usize, f64)> {
    let k = params.k;
    let kk = 2 * k;
    let n = seq.len();
    let mut counts = BTreeMap::new();
    if n < kk {
        return Vec::new();
    }

    let mut window = Vec::with_capacity(kk);
    for pos in 0..=(n - kk) {
        for gap in 0..=params.g {
            if pos + gap + kk > n {
                break;
            }
            window.clear();
            window.extend_from_slice(&seq[pos..pos + k]);
            window.extend_from_slice(&seq[pos + k + gap..pos + gap + kk]);
            if let Some(col) = params.column(encoder, &window, gap) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }
    }
    counts.into_iter().collect()
}

/// Gappy pair spectrum of every sequence (`sequences x width`).
///
/// Windows holding a character outside of the alphabet are skipped.  With
/// `reverse_complement` a window and its reverse complement share one column, the vector
/// keeps its full length.
pub fn gappy_pair_kernel(input: SequenceInput, params: &GappyParams, layout: Layout) -> Result<FeatureMatrix> {
    params.validate()?;
    let encoder = Encoder::new(params.alphabet);
    let n_seqs = input.len();
    let sequences = input.resolve(&encoder, params.include_flanking);
    debug!("Gappy pair spectrum with {:?} over {} sequences", params, n_seqs);

    let rows = sequences
        .par_iter()
        .map(|seq| gappy_pair_counts(&encoder, seq, params))
        .collect();
    let matrix = FeatureMatrix::from_rows(rows, params.width(), layout);
    info!(
        "Computed gappy pair spectrum ({} columns) of {} sequences",
        params.width(),
        n_seqs
    );
    Ok(matrix)
}

/// Plain k-spectrum (`sequences x |alphabet|^k`) counting contiguous k-mers only
pub fn kmer_spectrum(
    input: SequenceInput,
    k: usize,
    alphabet: AlphabetKind,
    include_flanking: bool,
    layout: Layout,
) -> Result<FeatureMatrix> {
    if k == 0 {
        return Err(Error::InvalidKmerLength(k));
    }
    let width = alphabet
        .size()
        .checked_pow(k as u32)
        .ok_or(Error::InvalidKmerLength(k))?;
    let encoder = Encoder::new(alphabet);
    let sequences = input.resolve(&encoder, include_flanking);

    let rows = sequences
        .par_iter()
        .map(|seq| {
            let mut counts = BTreeMap::new();
            for window in seq.windows(k) {
                if let Some(col) = rank(window.iter().copied(), alphabet.size()) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }
            counts.into_iter().collect::<Vec<_>>()
        })
        .collect();
    Ok(FeatureMatrix::from_rows(rows, width, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array2};

    fn dense(sequences: &[&str], params: GappyParams) -> Array2<f64> {
        gappy_pair_kernel(SequenceInput::raw(sequences), &params, Layout::Dense)
            .unwrap()
            .to_dense()
    }

    fn merged(k: usize, g: usize) -> GappyParams {
        GappyParams::new(k, AlphabetKind::Dna).gap(g).gap_different(false)
    }

    #[test]
    fn merged_gaps() {
        let spectrum = dense(&["ACGTCGATGC", "GTCGATAGC", "GTCGaaagATAGC"], merged(1, 1));
        let expected = arr2(&[
            [0., 1., 2., 1., 1., 0., 2., 1., 1., 2., 0., 2., 0., 2., 2., 0.],
            [1., 1., 1., 1., 1., 0., 1., 0., 1., 2., 0., 2., 1., 1., 2., 0.],
            [1., 1., 1., 1., 1., 0., 1., 0., 1., 2., 0., 2., 1., 1., 2., 0.],
        ]);
        assert_eq!(spectrum, expected);
    }

    #[test]
    fn sparse_matches_dense() {
        let sequences = ["ACGTCGATGC", "GTCGATAGC", "GTCGaaagATAGC"];
        let sparse =
            gappy_pair_kernel(SequenceInput::raw(&sequences), &merged(1, 1), Layout::Sparse).unwrap();
        assert_eq!(sparse.layout(), Layout::Sparse);
        assert_eq!(sparse.to_dense(), dense(&sequences, merged(1, 1)));
    }

    #[test]
    fn separate_gap_blocks() {
        let params = GappyParams::new(1, AlphabetKind::Dna).gap(1);
        let spectrum = dense(&["ACGTCGATGC"], params);
        assert_eq!(spectrum.dim(), (1, 32));
        // one block of 16 columns per gap length
        assert_eq!(
            spectrum.row(0).to_vec(),
            vec![
                0., 1., 0., 1., 0., 0., 2., 0., 1., 1., 0., 1., 0., 1., 1., 0., //
                0., 0., 2., 0., 1., 0., 0., 1., 0., 1., 0., 1., 0., 1., 1., 0.,
            ]
        );
    }

    #[test]
    fn reverse_complement_keeps_full_width() {
        let spectrum = dense(&["ACGTCGATGC"], merged(1, 1).reverse_complement(true));
        let expected = arr2(&[[0., 3., 3., 1., 3., 0., 2., 0., 3., 2., 0., 0., 0., 0., 0., 0.]]);
        assert_eq!(spectrum, expected);
    }

    #[test]
    fn reverse_complements_share_columns() {
        let encoder = Encoder::new(AlphabetKind::Dna);
        for window in [&b"AACG"[..], b"GTCA", b"TTTT", b"CGCG", b"ATGC"].iter() {
            let forward = encoder.encode(window);
            let revcomp: Vec<u8> = forward.iter().rev().map(|&c| encoder.complement(c)).collect();
            assert_eq!(
                window_index(&encoder, &forward, true),
                window_index(&encoder, &revcomp, true)
            );
        }
    }

    #[test]
    fn flanking_regions_upper_cased() {
        let params = merged(1, 1).include_flanking(true);
        let spectrum = dense(&["ACGTCGatgC"], params);
        let expected = arr2(&[[0., 1., 2., 1., 1., 0., 2., 1., 1., 2., 0., 2., 0., 2., 2., 0.]]);
        assert_eq!(spectrum, expected);
    }

    #[test]
    fn bigger_gap() {
        let spectrum = dense(&["ACGTCGATGC"], merged(1, 3));
        let expected = arr2(&[[0., 3., 2., 2., 1., 1., 4., 2., 2., 3., 2., 2., 1., 2., 2., 1.]]);
        assert_eq!(spectrum, expected);
    }

    #[test]
    fn bigger_k() {
        let spectrum = dense(&["ACGTCG"], merged(2, 1));
        let mut expected = Array2::zeros((1, 256));
        for col in [27, 29, 102, 109, 182].iter() {
            expected[[0, *col]] = 1.0;
        }
        assert_eq!(spectrum, expected);
    }

    #[test]
    fn no_gap_counts_contiguous_pairs() {
        let params = merged(1, 0);
        assert_eq!(params.width(), 16);
        let spectrum = dense(&["ACGT"], params);
        let mut expected = Array2::zeros((1, 16));
        for col in [1, 6, 11].iter() {
            expected[[0, *col]] = 1.0;
        }
        assert_eq!(spectrum, expected);
    }

    #[test]
    fn unknown_symbols_skip_their_windows() {
        // with N every window touching position 2 is skipped
        let spectrum = dense(&["ACNGT"], merged(1, 0));
        let mut expected = Array2::zeros((1, 16));
        expected[[0, 1]] = 1.0; // AC
        expected[[0, 11]] = 1.0; // GT
        assert_eq!(spectrum, expected);
    }

    #[test]
    fn pre_encoded_input() {
        let encoder = Encoder::new(AlphabetKind::Dna);
        let encoded = SequenceInput::Encoded(vec![encoder.encode(b"ACGTCGATGC")]);
        let from_codes = gappy_pair_kernel(encoded, &merged(1, 1), Layout::Dense).unwrap();
        assert_eq!(from_codes.to_dense(), dense(&["ACGTCGATGC"], merged(1, 1)));
    }

    #[test]
    fn short_and_empty_inputs() {
        assert_eq!(dense(&["A"], merged(1, 1)), Array2::zeros((1, 16)));
        let empty = gappy_pair_kernel(SequenceInput::raw(Vec::<&str>::new()), &merged(1, 1), Layout::Sparse)
            .unwrap();
        assert_eq!(empty.shape(), (0, 16));
    }

    #[test]
    fn invalid_parameters() {
        assert!(GappyParams::new(0, AlphabetKind::Dna).validate().is_err());
        assert!(GappyParams::new(1, AlphabetKind::AminoAcid)
            .reverse_complement(true)
            .validate()
            .is_err());
        assert!(GappyParams::new(40, AlphabetKind::AminoAcid).validate().is_err());
        assert_eq!(GappyParams::new(2, AlphabetKind::Rna).gap(2).width(), 3 * 256);
    }

    #[test]
    fn plain_spectrum() {
        let spectrum = kmer_spectrum(
            SequenceInput::raw(&["ACGTA"]),
            2,
            AlphabetKind::Dna,
            false,
            Layout::Dense,
        )
        .unwrap()
        .to_dense();
        let mut expected = Array2::zeros((1, 16));
        for col in [1, 6, 11, 12].iter() {
            expected[[0, *col]] = 1.0;
        }
        assert_eq!(spectrum, expected);
    }
}
