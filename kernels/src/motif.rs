//! Motif kernel: prefix trie over parsed motifs and the per-sequence motif content.
//!
//! Reference: Ben-Hur A., Brutlag D. L. Remote homology detection: a motif based approach.
//! Bioinformatics 19:26-33, 2003.
use crate::alphabet::prepare;
use crate::matrix::{FeatureMatrix, Layout};
use crate::pattern::{Element, Pattern};
use log::{debug, info};
use rayon::prelude::*;

#[derive(Debug, Clone)]
struct TrieNode {
    element: Option<Element>,
    children: Vec<TrieNode>,
    // indices of the motifs ending here, several motifs may parse to the same path
    motifs: Vec<usize>,
}

impl TrieNode {
    fn root() -> Self {
        Self {
            element: None,
            children: Vec::new(),
            motifs: Vec::new(),
        }
    }

    fn new(element: Element) -> Self {
        Self {
            element: Some(element),
            children: Vec::new(),
            motifs: Vec::new(),
        }
    }

    fn accepts(&self, symbol: u8) -> bool {
        self.element
            .as_ref()
            .map_or(false, |element| element.matches(symbol))
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(TrieNode::count).sum::<usize>()
    }
}

/// Prefix trie over a fixed set of motifs.  Read only once built, so one trie can scan
/// any number of sequences.
#[derive(Debug, Clone)]
pub struct MotifTrie {
    root: TrieNode,
    patterns: Vec<Pattern>,
}

impl MotifTrie {
    /// Parses every motif and inserts it
    pub fn new<S: AsRef<str>>(motifs: &[S]) -> Self {
        Self::from_patterns(motifs.iter().map(|m| Pattern::parse(m.as_ref())).collect())
    }

    /// Builds the trie from already parsed patterns, output columns follow their order
    pub fn from_patterns(patterns: Vec<Pattern>) -> Self {
        let mut root = TrieNode::root();
        for (index, pattern) in patterns.iter().enumerate() {
            if pattern.is_empty() {
                debug!("Motif `{}` has no elements and never matches", pattern);
                continue;
            }
            Self::insert(&mut root, pattern, index);
        }

        let trie = Self { root, patterns };
        debug!(
            "Built motif trie with {} nodes for {} motifs",
            trie.node_count(),
            trie.patterns.len()
        );
        trie
    }

    fn insert(root: &mut TrieNode, pattern: &Pattern, index: usize) {
        let mut node = root;
        for element in pattern.elements() {
            let pos = match node
                .children
                .iter()
                .position(|child| child.element.as_ref() == Some(element))
            {
                Some(pos) => pos,
                None => {
                    node.children.push(TrieNode::new(element.clone()));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[pos];
        }
        node.motifs.push(index);
    }

    /// Patterns in column order
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Number of motifs, the length of every scan result
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True for a trie without motifs
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Counts, for every motif, its occurrences in `sequence` over all start offsets
    pub fn scan(&self, sequence: &[u8]) -> Vec<u32> {
        let mut counts = vec![0; self.patterns.len()];
        for start in 0..sequence.len() {
            if let Some(hits) = self.walk(sequence, start) {
                for index in hits {
                    counts[index] += 1;
                }
            }
        }
        counts
    }

    /// Depth first walk from the root reading `sequence` from `start`.  Every terminal
    /// node reached yields the motifs ending there.  `None` when the trie has no motifs.
    fn walk(&self, sequence: &[u8], start: usize) -> Option<Vec<usize>> {
        if self.root.children.is_empty() {
            return None;
        }

        let mut hits = Vec::new();
        let mut stack: Vec<(&TrieNode, usize)> = self
            .root
            .children
            .iter()
            .filter(|child| child.accepts(sequence[start]))
            .map(|child| (child, start))
            .collect();

        while let Some((node, pos)) = stack.pop() {
            hits.extend_from_slice(&node.motifs);
            let next = pos + 1;
            if next == sequence.len() {
                continue;
            }
            stack.extend(
                node.children
                    .iter()
                    .filter(|child| child.accepts(sequence[next]))
                    .map(|child| (child, next)),
            );
        }
        Some(hits)
    }
}

/// Computes motif content matrices for sets of sequences
#[derive(Debug, Clone)]
pub struct MotifKernel {
    trie: MotifTrie,
}

impl MotifKernel {
    /// Builds the trie for `motifs`
    pub fn new<S: AsRef<str>>(motifs: &[S]) -> Self {
        Self {
            trie: MotifTrie::new(motifs),
        }
    }

    /// The underlying trie
    pub fn trie(&self) -> &MotifTrie {
        &self.trie
    }

    /// Motif content of every sequence, one row per sequence in input order.  With
    /// `include_flanking` lower case characters are upper cased, otherwise dropped.
    pub fn vectors<S>(&self, sequences: &[S], include_flanking: bool) -> Vec<Vec<u32>>
    where
        S: AsRef<[u8]> + Sync,
    {
        sequences
            .par_iter()
            .map(|seq| self.trie.scan(&prepare(seq.as_ref(), include_flanking)))
            .collect()
    }

    /// Motif content as a feature matrix (`sequences x motifs`), or with `as_kernel` the
    /// matrix of pairwise inner products
    pub fn compute_matrix<S>(
        &self,
        sequences: &[S],
        include_flanking: bool,
        layout: Layout,
        as_kernel: bool,
    ) -> FeatureMatrix
    where
        S: AsRef<[u8]> + Sync,
    {
        let rows = self
            .vectors(sequences, include_flanking)
            .into_iter()
            .map(|counts| {
                counts
                    .into_iter()
                    .enumerate()
                    .filter(|(_, count)| *count > 0)
                    .map(|(col, count)| (col, f64::from(count)))
                    .collect::<Vec<_>>()
            })
            .collect();

        let features = FeatureMatrix::from_rows(rows, self.trie.len(), layout);
        info!(
            "Computed motif content of {} sequences over {} motifs",
            sequences.len(),
            self.trie.len()
        );

        if as_kernel {
            features.gram()
        } else {
            features
        }
    }
}
