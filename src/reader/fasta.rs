use crate::gffcheck_utils::get_reader_from_path;
use anyhow::Context;
use noodles::fasta;
use noodles::fasta::record::Sequence;
use std::io::{BufRead, Read};
use std::path::Path;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
/// The nucleotide sequence the annotation refers to.
///
/// The text is read record by record with a FASTA reader and the sequences of all records are
/// appended, with any whitespace left in the sequence lines removed. Text without any `>` header
/// is accepted as a bare sequence. A file is expected to hold a single record; if it holds more,
/// the records are concatenated and [FastaSequence::n_headers] tells the caller.
///
/// # Fields
///
/// * `sequence`: the concatenated bases, case preserved.
/// * `n_headers`: the number of records (`>` lines) read.
pub struct FastaSequence {
    sequence: Sequence,
    n_headers: usize,
}

impl FastaSequence {
    /// Builds the sequence from the text of a FASTA file.
    ///
    /// # Errors
    ///
    /// An error is returned if the text has headers but cannot be read as FASTA, e.g. when bases
    /// come before the first header.
    pub fn from_text(text: &str) -> anyhow::Result<FastaSequence> {
        if !text.lines().any(|l| l.starts_with('>')) {
            trace!("no FASTA header found - reading as a bare sequence");
            let bases: Vec<u8> = text
                .bytes()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            return Ok(FastaSequence {
                sequence: Sequence::from(bases),
                n_headers: 0,
            });
        }

        let mut rdr = fasta::Reader::new(text.trim_start().as_bytes());
        FastaSequence::_from_fasta(&mut rdr)
    }

    fn _from_fasta<T: BufRead>(rdr: &mut fasta::Reader<T>) -> anyhow::Result<FastaSequence> {
        let mut bases: Vec<u8> = Vec::new();
        let mut n_headers = 0usize;

        for result in rdr.records() {
            let record = result.context("Failed parsing a FASTA record")?;
            n_headers += 1;

            let record_name = std::str::from_utf8(record.name().as_bytes())?;
            trace!(
                "read record {} with {} bases",
                record_name,
                record.sequence().len()
            );

            let seq: &[u8] = record.sequence().as_ref();
            bases.extend(seq.iter().filter(|b| !b.is_ascii_whitespace()));
        }

        Ok(FastaSequence {
            sequence: Sequence::from(bases),
            n_headers,
        })
    }

    /// Reads the sequence from a plain or gzipped FASTA file.
    pub fn from_path<T: AsRef<Path>>(file_path: T) -> anyhow::Result<FastaSequence> {
        let file_path = file_path.as_ref();
        let text = read_sequence_text(file_path)?;
        let fs = FastaSequence::from_text(&text)
            .with_context(|| format!("Could not read the FASTA file {:?}", file_path))?;
        if fs.n_headers > 1 {
            warn!(
                "Found {} sequences in the FASTA file; they will be treated as one.",
                fs.n_headers
            );
        }
        info!(
            "Finished reading the FASTA file. Found {} bases.",
            fs.sequence.len()
        );
        Ok(fs)
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn n_headers(&self) -> usize {
        self.n_headers
    }

    /// `true` unless the text held more than one record.
    pub fn is_single(&self) -> bool {
        self.n_headers <= 1
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Reads the whole text of a plain or gzipped FASTA file.
pub fn read_sequence_text<T: AsRef<Path>>(file_path: T) -> anyhow::Result<String> {
    let file_path = file_path.as_ref();
    let mut rdr = get_reader_from_path(file_path)
        .with_context(|| format!("Could not open the FASTA file {:?}", file_path))?;
    let mut text = String::new();
    rdr.read_to_string(&mut text)
        .with_context(|| format!("Failed reading the FASTA file {:?}", file_path))?;
    Ok(text)
}
