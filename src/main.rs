#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]

//! Feature spectra and kernel matrices (motif, gappy pair, k-spectrum and mismatch) for
//! collections of biological sequences.
mod cli;
mod error;
mod input;
mod output;

use crate::cli::{Command, MatrixOpts};
use kernels::{
    gappy_pair_kernel, gappy_pair_kernel_trie, kmer_spectrum, preprocess, FeatureMatrix,
    GappyParams, Layout, MismatchKernel, MotifKernel, SequenceInput,
};
use log::{info, warn};
use std::io::{BufWriter, Write};
use structopt::StructOpt;

type Result<T> = std::result::Result<T, crate::error::Error>;

fn main() -> Result<()> {
    let opt = cli::StrKernel::from_args();
    opt.set_logging();

    rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build_global()
        .map_err(|_| crate::error::Error::ThreadError)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match opt.cmd {
        Command::Motif {
            motifs,
            motif_file,
            exclude_flanking,
            matrix,
            sequences,
        } => {
            let motifs = input::collect_motifs(&motifs, motif_file.as_ref())?;
            let sequences = input::read_sequences(&sequences)?;
            let kernel = MotifKernel::new(&motifs);
            let result = kernel.compute_matrix(
                &sequences,
                !exclude_flanking,
                layout(&matrix),
                matrix.kernel,
            );
            output::write_matrix(&mut out, &result)?;
        }
        Command::Gappy {
            k,
            g,
            alphabet,
            reverse,
            include_flanking,
            merge_gaps,
            trie,
            matrix,
            sequences,
        } => {
            if g == 0 {
                warn!(
                    "Without a gap every column is a contiguous {}-mer, use `spectrum -k {}` for the {}-spectrum",
                    2 * k,
                    k,
                    k
                );
            }
            let sequences = input::read_sequences(&sequences)?;
            let params = GappyParams::new(k, alphabet)
                .gap(g)
                .reverse_complement(reverse)
                .include_flanking(include_flanking)
                .gap_different(!merge_gaps);
            let features = if trie {
                gappy_pair_kernel_trie(SequenceInput::Raw(sequences), &params, layout(&matrix))?
            } else {
                gappy_pair_kernel(SequenceInput::Raw(sequences), &params, layout(&matrix))?
            };
            output::write_matrix(&mut out, &finish(features, &matrix))?;
        }
        Command::Spectrum {
            k,
            alphabet,
            include_flanking,
            matrix,
            sequences,
        } => {
            let sequences = input::read_sequences(&sequences)?;
            let features = kmer_spectrum(
                SequenceInput::Raw(sequences),
                k,
                alphabet,
                include_flanking,
                layout(&matrix),
            )?;
            output::write_matrix(&mut out, &finish(features, &matrix))?;
        }
        Command::Mismatch {
            k,
            m,
            l,
            include_lowercase,
            no_normalize,
            leaves,
            sequences,
        } => {
            let sequences = input::read_sequences(&sequences)?;
            let coding = preprocess(&sequences, !include_lowercase)?;
            let l = l.unwrap_or_else(|| coding.alphabet_size());
            info!(
                "Mismatch kernel over {} symbols, sequences cut to {} characters",
                l,
                coding.sequences.first().map_or(0, Vec::len)
            );
            let result = MismatchKernel::new(l, k, m)?.compute(&coding.sequences, !no_normalize)?;
            output::write_dense(&mut out, &result.kernel)?;
            if leaves {
                output::write_leaves(&mut out, &result.leaf_kmers, &coding)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn layout(matrix: &MatrixOpts) -> Layout {
    if matrix.sparse {
        Layout::Sparse
    } else {
        Layout::Dense
    }
}

fn finish(features: FeatureMatrix, matrix: &MatrixOpts) -> FeatureMatrix {
    if matrix.kernel {
        features.gram()
    } else {
        features
    }
}
