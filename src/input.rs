use crate::error::Error;
use crate::Result;
use log::{debug, info, trace, warn};
use std::path::Path;

/// Reads every record of a possibly compressed FASTA file in file order.  Sequences keep
/// their case, lower case marks flanking regions.  A file without records gives an empty
/// collection.
pub fn read_sequences<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<u8>>> {
    let path = path.as_ref();
    let rdr: Box<dyn std::io::Read> = match niffler::from_path(path) {
        Ok((rdr, format)) => {
            debug!("Reading {} as {:?}", path.display(), format);
            rdr
        }
        // too short for any compression header, read as plain text
        Err(niffler::Error::FileTooShort) => Box::new(std::fs::File::open(path)?),
        Err(e) => return Err(e.into()),
    };
    let fasta_rdr = bio::io::fasta::Reader::new(rdr);

    let mut sequences = Vec::new();
    for record in fasta_rdr.records() {
        let record = record?;
        trace!("Record {} has {} characters", record.id(), record.seq().len());
        sequences.push(record.seq().to_vec());
    }

    if sequences.is_empty() {
        warn!("No sequences in {}", path.display());
    }
    info!("Read {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// Motifs given on the command line followed by those of the motif file, one per line.
/// Blank lines and lines starting with `#` are skipped.
pub fn collect_motifs<P: AsRef<Path>>(motifs: &[String], motif_file: Option<P>) -> Result<Vec<String>> {
    let mut all = motifs.to_vec();
    if let Some(path) = motif_file {
        let content = String::from_utf8(std::fs::read(path.as_ref())?)?;
        all.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
    }

    if all.is_empty() {
        return Err(Error::NoMotifs);
    }
    debug!("Using {} motifs", all.len());
    Ok(all)
}
