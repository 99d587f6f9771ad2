use kernels::AlphabetKind;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "strkernel",
    about = "Feature spectra and kernel matrices of biological sequences"
)]
pub(crate) struct StrKernel {
    #[structopt(
        short,
        long,
        help = "Number of threads used for per-sequence vectors",
        default_value = "1"
    )]
    pub threads: usize,
    #[structopt(
        short,
        long,
        help = "Log verbosity, repeat for more (-v info, -vv debug, -vvv trace)",
        parse(from_occurrences)
    )]
    pub verbose: u8,
    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub(crate) struct MatrixOpts {
    #[structopt(long, help = "Print the Gram matrix of the feature vectors instead")]
    pub kernel: bool,
    #[structopt(long, help = "Print non-zero entries as `row col value` triplets")]
    pub sparse: bool,
}

#[derive(Debug, StructOpt)]
pub(crate) enum Command {
    /// Motif content of every sequence
    Motif {
        #[structopt(
            short,
            long = "motif",
            help = "Motif such as `A[CG].T` or `G[^A]`, can be repeated",
            number_of_values = 1
        )]
        motifs: Vec<String>,
        #[structopt(
            long,
            help = "File with one motif per line, `#` starts a comment",
            parse(from_os_str)
        )]
        motif_file: Option<PathBuf>,
        #[structopt(long, help = "Drop lower case (flanking) characters instead of upper casing them")]
        exclude_flanking: bool,
        #[structopt(flatten)]
        matrix: MatrixOpts,
        #[structopt(help = "FASTA file, optionally compressed", parse(from_os_str))]
        sequences: PathBuf,
    },
    /// Gappy pair spectrum of every sequence
    Gappy {
        #[structopt(short, help = "Length of each k-mer of the pair")]
        k: usize,
        #[structopt(short, help = "Largest gap between the pair", default_value = "0")]
        g: usize,
        #[structopt(short, long, help = "dna, rna, aa or aa+s", default_value = "dna")]
        alphabet: AlphabetKind,
        #[structopt(long, help = "Count a pair and its reverse complement together")]
        reverse: bool,
        #[structopt(long, help = "Upper case flanking (lower case) regions instead of dropping them")]
        include_flanking: bool,
        #[structopt(long, help = "Count pairs with different gaps in the same column")]
        merge_gaps: bool,
        #[structopt(long, help = "Enumerate pairs through the trie descent")]
        trie: bool,
        #[structopt(flatten)]
        matrix: MatrixOpts,
        #[structopt(help = "FASTA file, optionally compressed", parse(from_os_str))]
        sequences: PathBuf,
    },
    /// Plain k-spectrum of every sequence
    Spectrum {
        #[structopt(short, help = "k-mer length")]
        k: usize,
        #[structopt(short, long, help = "dna, rna, aa or aa+s", default_value = "dna")]
        alphabet: AlphabetKind,
        #[structopt(long, help = "Upper case flanking (lower case) regions instead of dropping them")]
        include_flanking: bool,
        #[structopt(flatten)]
        matrix: MatrixOpts,
        #[structopt(help = "FASTA file, optionally compressed", parse(from_os_str))]
        sequences: PathBuf,
    },
    /// Normalized mismatch kernel between all sequences
    Mismatch {
        #[structopt(short, help = "k-mer length")]
        k: usize,
        #[structopt(short, help = "Allowed mismatches, at most k / 2")]
        m: usize,
        #[structopt(short, help = "Alphabet size, defaults to the number of distinct symbols")]
        l: Option<usize>,
        #[structopt(long, help = "Upper case lower case characters instead of dropping them")]
        include_lowercase: bool,
        #[structopt(long, help = "Print the raw kernel")]
        no_normalize: bool,
        #[structopt(long, help = "Also print every surviving k-mer with its per-sequence counts")]
        leaves: bool,
        #[structopt(help = "FASTA file, optionally compressed", parse(from_os_str))]
        sequences: PathBuf,
    },
}

impl StrKernel {
    pub fn set_logging(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }
}
