#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]

//! String kernels for biological sequences.  Sequences over a small alphabet are turned
//! into fixed length numeric vectors or pairwise kernel matrices that can be handed to
//! vector based classifiers.
//!
//! Three engines are provided:
//! * the motif kernel ([`motif`]), counting occurrences of patterns with wildcards and
//!   character classes through a prefix trie,
//! * the gappy pair kernel ([`gappy`] and its trie based companion [`gappy_trie`]),
//!   counting pairs of k-mers separated by up to `g` skipped characters,
//! * the mismatch kernel ([`mismatch`]), summing shared k-mers within `m` substitutions
//!   without materializing the `l^k` dimensional feature space.

pub mod alphabet;
pub mod error;
pub mod gappy;
pub mod gappy_trie;
pub mod matrix;
pub mod mismatch;
pub mod motif;
pub mod pattern;

pub use crate::alphabet::{AlphabetKind, SequenceInput};
pub use crate::error::Error;
pub use crate::gappy::{gappy_pair_kernel, kmer_spectrum, GappyParams};
pub use crate::gappy_trie::gappy_pair_kernel_trie;
pub use crate::matrix::{normalize_kernel, CsrMatrix, FeatureMatrix, Layout};
pub use crate::mismatch::{preprocess, MismatchKernel, MismatchResult, Preprocessed};
pub use crate::motif::{MotifKernel, MotifTrie};
pub use crate::pattern::{Element, Pattern};

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, crate::error::Error>;
