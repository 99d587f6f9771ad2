//! Gappy pair kernel by depth first descent over a trie of code labels.
//!
//! Instead of re-reading every window, each node keeps the windows (per sequence) whose
//! prefix equals the node label.  A child keeps the windows that continue with its
//! symbol, dead children are never expanded.  Produces the same matrix as
//! [`crate::gappy::gappy_pair_kernel`].
use crate::alphabet::{Encoder, SequenceInput};
use crate::gappy::{window_index, GappyParams};
use crate::matrix::{FeatureMatrix, Layout};
use crate::Result;
use log::{debug, info};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Survivor {
    seq: usize,
    start: usize,
    // position of the next character to read
    next: usize,
    gap: usize,
}

struct Descent<'a> {
    sequences: &'a [Vec<u8>],
    params: &'a GappyParams,
    encoder: &'a Encoder,
    rows: Vec<BTreeMap<usize, f64>>,
    nodes: usize,
    leaves: usize,
}

impl<'a> Descent<'a> {
    fn new(sequences: &'a [Vec<u8>], params: &'a GappyParams, encoder: &'a Encoder) -> Self {
        Self {
            sequences,
            params,
            encoder,
            rows: vec![BTreeMap::new(); sequences.len()],
            nodes: 0,
            leaves: 0,
        }
    }

    fn root(&self) -> Vec<Survivor> {
        let kk = 2 * self.params.k;
        self.sequences
            .iter()
            .enumerate()
            .filter(|(_, seq)| seq.len() >= kk)
            .flat_map(|(seq, codes)| {
                (0..=(codes.len() - kk)).map(move |start| Survivor {
                    seq,
                    start,
                    next: start,
                    gap: 0,
                })
            })
            .collect()
    }

    /// Windows of `survivor` that read `symbol` at `depth`.  The gap is opened when the
    /// second half starts, which branches one window into up to `g + 1`.
    fn advance(&self, survivor: Survivor, depth: usize, symbol: u8, out: &mut Vec<Survivor>) {
        let seq = &self.sequences[survivor.seq];
        let k = self.params.k;
        let max_skip = if depth == k { self.params.g } else { 0 };

        for skip in 0..=max_skip {
            if survivor.start + survivor.gap + skip + 2 * k > seq.len() {
                break;
            }
            let pos = survivor.next + skip;
            if seq[pos] == symbol {
                out.push(Survivor {
                    next: pos + 1,
                    gap: survivor.gap + skip,
                    ..survivor
                });
            }
        }
    }

    fn descend(&mut self, label: &mut Vec<u8>, survivors: Vec<Survivor>) {
        self.nodes += 1;
        let depth = label.len();
        if depth == 2 * self.params.k {
            self.emit(label, &survivors);
            return;
        }

        for symbol in 0..self.encoder.kind().size() as u8 {
            let mut child = Vec::new();
            for survivor in &survivors {
                self.advance(*survivor, depth, symbol, &mut child);
            }
            if child.is_empty() {
                continue;
            }
            label.push(symbol);
            self.descend(label, child);
            label.pop();
        }
    }

    fn emit(&mut self, label: &[u8], survivors: &[Survivor]) {
        self.leaves += 1;
        let index = match window_index(self.encoder, label, self.params.reverse_complement) {
            Some(index) => index,
            None => return,
        };
        for survivor in survivors {
            let col = if self.params.gap_different {
                survivor.gap * self.params.block_len() + index
            } else {
                index
            };
            *self.rows[survivor.seq].entry(col).or_insert(0.0) += 1.0;
        }
    }
}

/// Gappy pair spectrum of every sequence computed through the trie descent
pub fn gappy_pair_kernel_trie(
    input: SequenceInput,
    params: &GappyParams,
    layout: Layout,
) -> Result<FeatureMatrix> {
    params.validate()?;
    let encoder = Encoder::new(params.alphabet);
    let sequences = input.resolve(&encoder, params.include_flanking);

    let mut descent = Descent::new(&sequences, params, &encoder);
    let root = descent.root();
    debug!("Gappy pair trie starts with {} windows", root.len());
    descent.descend(&mut Vec::with_capacity(2 * params.k), root);
    info!(
        "Gappy pair trie visited {} nodes, {} leaves survived",
        descent.nodes, descent.leaves
    );

    let rows = descent
        .rows
        .into_iter()
        .map(|row| row.into_iter().collect::<Vec<_>>())
        .collect();
    Ok(FeatureMatrix::from_rows(rows, params.width(), layout))
}
