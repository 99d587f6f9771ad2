use thiserror::Error;

#[derive(Debug, Error)]
/// Errors of which majority are related to I/O issues or incorrect input files
pub enum Error {
    #[error("Could not read FASTA record")]
    /// Could not read an entry in a FASTA file or write the output
    Io(#[from] std::io::Error),
    #[error("Could not open the FASTA file")]
    /// Opening a possibly compressed file failed
    FastaError(#[from] niffler::Error),
    #[error("Could not convert bytes in the motif file as it is invalid UTF-8")]
    /// Data is not in UTF-8 format
    NotUTF8(#[from] std::string::FromUtf8Error),
    #[error("Could not spawn threads")]
    /// Create thread pools error
    ThreadError,
    #[error("No motifs given, use --motif or --motif-file")]
    /// Motif subcommand without motifs
    NoMotifs,
    #[error(transparent)]
    /// Kernel computation failed
    Kernel(#[from] kernels::Error),
}
