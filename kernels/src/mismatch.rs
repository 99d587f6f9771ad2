//! Mismatch string kernel.
//!
//! The kernel value of two sequences is the inner product of their `(k, m)`-mismatch
//! feature vectors: for every possible k-mer, the number of k-mers of the sequence within
//! Hamming distance `m` of it.  The `l^k` dimensional vectors are never built.  A trie
//! over the alphabet is expanded depth first, every node keeping the k-mers of each
//! sequence still within `m` mismatches of its label, and branches without survivors are
//! pruned on the spot.
//!
//! Reference: Leslie C. S., Eskin E., Cohen A., Weston J., Noble W. S. Mismatch string
//! kernels for discriminative protein classification. Bioinformatics 20:467-476, 2004.
use crate::error::Error;
use crate::matrix::normalize_kernel;
use crate::Result;
use log::{debug, info};
use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A k-mer of one sequence followed by a trie node
pub struct KmerPointer {
    /// Start of the k-mer in its sequence
    pub offset: usize,
    /// Mismatches between the k-mer prefix and the node label
    pub mismatches: usize,
}

#[derive(Debug, Clone, Default)]
/// Node of the mismatch trie
pub struct MismatchNode {
    label: Option<u8>,
    level: usize,
    full_label: Vec<u8>,
    // surviving k-mers of every sequence, indexed by sequence
    kmers: Vec<Vec<KmerPointer>>,
    children: BTreeMap<u8, MismatchNode>,
}

impl MismatchNode {
    /// Root holding every k-mer of every sequence with no mismatch yet
    fn root(sequences: &[Vec<u8>], k: usize) -> Self {
        let kmers = sequences
            .iter()
            .map(|seq| {
                (0..(seq.len() + 1).saturating_sub(k))
                    .map(|offset| KmerPointer {
                        offset,
                        mismatches: 0,
                    })
                    .collect()
            })
            .collect();
        Self {
            kmers,
            ..Self::default()
        }
    }

    /// Child reading `label`, starting from a copy of this node's k-mers
    fn child(&self, label: u8) -> Self {
        let mut full_label = self.full_label.clone();
        full_label.push(label);
        Self {
            label: Some(label),
            level: self.level + 1,
            full_label,
            kmers: self.kmers.clone(),
            children: BTreeMap::new(),
        }
    }

    /// Compares the node label with the next character of every k-mer and drops the
    /// k-mers exceeding `m` mismatches.  Returns whether any k-mer survived.
    fn process(&mut self, sequences: &[Vec<u8>], m: usize) -> bool {
        if let Some(label) = self.label {
            let level = self.level;
            for (pointers, seq) in self.kmers.iter_mut().zip(sequences) {
                pointers.retain_mut(|pointer| {
                    if seq[pointer.offset + level - 1] != label {
                        pointer.mismatches += 1;
                    }
                    pointer.mismatches <= m
                });
            }
        }
        !self.is_empty()
    }

    /// True once no sequence has a surviving k-mer
    pub fn is_empty(&self) -> bool {
        self.kmers.iter().all(Vec::is_empty)
    }

    /// Symbols from the root to this node
    pub fn full_label(&self) -> &[u8] {
        &self.full_label
    }

    /// Depth below the root
    pub fn level(&self) -> usize {
        self.level
    }

    /// Surviving k-mers of sequence `index`
    pub fn kmers(&self, index: usize) -> &[KmerPointer] {
        self.kmers.get(index).map_or(&[][..], Vec::as_slice)
    }

    /// Adds `count_i * count_j` to `kernel[i, j]` for every pair of sequences
    fn update_kernel(&self, kernel: &mut Array2<f64>) {
        let counts: Vec<(usize, f64)> = self
            .kmers
            .iter()
            .enumerate()
            .filter(|(_, pointers)| !pointers.is_empty())
            .map(|(i, pointers)| (i, pointers.len() as f64))
            .collect();
        for &(i, ci) in &counts {
            for &(j, cj) in &counts {
                kernel[[i, j]] += ci * cj;
            }
        }
    }

    /// Expands this node down to depth `k`, returns the number of surviving leaves below
    fn traverse(&mut self, sequences: &[Vec<u8>], l: usize, k: usize, m: usize, kernel: &mut Array2<f64>) -> usize {
        if !self.process(sequences, m) {
            return 0;
        }
        if self.level == k {
            self.update_kernel(kernel);
            return 1;
        }

        let mut leaves = 0;
        for label in 0..l as u8 {
            let mut child = self.child(label);
            leaves += child.traverse(sequences, l, k, m, kernel);
            if !child.is_empty() {
                self.children.insert(label, child);
            }
        }
        leaves
    }

    /// Surviving nodes without children, i.e. the k-mers reached at depth `k`
    pub fn leaves(&self) -> Box<dyn Iterator<Item = &MismatchNode> + '_> {
        if self.children.is_empty() {
            Box::new(std::iter::once(self))
        } else {
            Box::new(self.children.values().flat_map(MismatchNode::leaves))
        }
    }
}

#[derive(Debug, Clone)]
/// Outcome of a mismatch kernel computation
pub struct MismatchResult {
    /// `n x n` kernel, normalized when requested
    pub kernel: Array2<f64>,
    /// Number of leaves (k-mers) that survived the traversal
    pub surviving_leaves: usize,
    /// For every surviving k-mer, the number of k-mers of each sequence within `m`
    /// mismatches of it
    pub leaf_kmers: BTreeMap<Vec<u8>, BTreeMap<usize, usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Mismatch kernel over an alphabet of `l` integer coded symbols
pub struct MismatchKernel {
    l: usize,
    k: usize,
    m: usize,
}

impl MismatchKernel {
    /// Validates the parameters: `l >= 2`, `k >= 1` and `2 * m <= k`
    pub fn new(l: usize, k: usize, m: usize) -> Result<Self> {
        if l < 2 {
            return Err(Error::AlphabetTooSmall(l));
        }
        if l > usize::from(u8::MAX) {
            return Err(Error::AlphabetTooLarge(l));
        }
        if k == 0 {
            return Err(Error::InvalidKmerLength(k));
        }
        if 2 * m > k {
            return Err(Error::MismatchTooLarge { k, m });
        }
        Ok(Self { l, k, m })
    }

    /// Alphabet size
    pub fn l(&self) -> usize {
        self.l
    }

    /// k-mer length
    pub fn k(&self) -> usize {
        self.k
    }

    /// Allowed mismatches
    pub fn m(&self) -> usize {
        self.m
    }

    /// Computes the kernel of integer coded `sequences` (symbols `0..l`).  An empty
    /// collection gives an empty kernel.
    pub fn compute<S: AsRef<[u8]>>(&self, sequences: &[S], normalize: bool) -> Result<MismatchResult> {
        let sequences: Vec<Vec<u8>> = sequences.iter().map(|seq| seq.as_ref().to_vec()).collect();
        for (index, seq) in sequences.iter().enumerate() {
            if let Some(&symbol) = seq.iter().find(|&&c| usize::from(c) >= self.l) {
                return Err(Error::SymbolOutOfRange {
                    index,
                    symbol,
                    size: self.l,
                });
            }
        }

        let n = sequences.len();
        debug!(
            "Mismatch kernel with l = {}, k = {}, m = {} over {} sequences",
            self.l, self.k, self.m, n
        );
        let mut kernel = Array2::zeros((n, n));
        let mut root = MismatchNode::root(&sequences, self.k);
        let surviving_leaves = root.traverse(&sequences, self.l, self.k, self.m, &mut kernel);
        info!("Mismatch trie traversal kept {} leaves", surviving_leaves);

        let leaf_kmers = root
            .leaves()
            .filter(|leaf| leaf.level == self.k)
            .map(|leaf| {
                let counts = leaf
                    .kmers
                    .iter()
                    .enumerate()
                    .filter(|(_, pointers)| !pointers.is_empty())
                    .map(|(i, pointers)| (i, pointers.len()))
                    .collect();
                (leaf.full_label.clone(), counts)
            })
            .collect();

        if normalize {
            kernel = normalize_kernel(&kernel)?;
        }

        Ok(MismatchResult {
            kernel,
            surviving_leaves,
            leaf_kmers,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Integer coded sequences ready for [`MismatchKernel::compute`]
pub struct Preprocessed {
    /// Coded sequences, all of the same length
    pub sequences: Vec<Vec<u8>>,
    /// Sorted symbols, a symbol's position is its code
    pub symbols: Vec<u8>,
}

impl Preprocessed {
    /// Number of distinct symbols, the natural alphabet size
    pub fn alphabet_size(&self) -> usize {
        self.symbols.len()
    }

    /// Symbols for a coded label
    pub fn decode(&self, codes: &[u8]) -> String {
        codes
            .iter()
            .map(|&c| self.symbols.get(c as usize).map_or('?', |&s| s as char))
            .collect()
    }
}

/// Prepares raw sequences for the mismatch kernel.  Lower case characters are dropped
/// (`ignore_lowercase`) or upper cased, every character is replaced by its rank among the
/// symbols of the whole collection and all sequences are cut to the shortest length.
pub fn preprocess<S: AsRef<[u8]>>(sequences: &[S], ignore_lowercase: bool) -> Result<Preprocessed> {
    if sequences.is_empty() {
        return Err(Error::EmptyInput);
    }

    let cleaned: Vec<Vec<u8>> = sequences
        .iter()
        .map(|seq| {
            let seq = seq.as_ref();
            if ignore_lowercase {
                seq.iter().copied().filter(u8::is_ascii_uppercase).collect()
            } else {
                seq.to_ascii_uppercase()
            }
        })
        .collect();

    let symbols: Vec<u8> = cleaned
        .iter()
        .flatten()
        .copied()
        .collect::<BTreeSet<u8>>()
        .into_iter()
        .collect();
    let mut codes = [0u8; 256];
    for (rank, symbol) in symbols.iter().enumerate() {
        codes[*symbol as usize] = rank as u8;
    }

    let length = cleaned.iter().map(Vec::len).min().unwrap_or(0);
    let sequences = cleaned
        .iter()
        .map(|seq| seq[..length].iter().map(|&c| codes[c as usize]).collect())
        .collect();

    Ok(Preprocessed { sequences, symbols })
}
