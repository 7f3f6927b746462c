//! Sequence-aware checks of gene lines.
//!
//! A gene line claims that the bases between its coordinates form a coding sequence. This module
//! extracts that region from the genome, orients it by strand, translates it with the standard
//! genetic code and reports what is wrong with it.

use crate::errors::ErrorCode;
use anyhow::bail;
use lazy_static::lazy_static;
use noodles::core::Position;
use noodles::fasta::record::Sequence;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The amino acid symbol stop codons translate to.
pub const STOP: char = '*';

/// Start codons accepted for bacteriophage genes.
pub const START_CODONS: [&[u8]; 3] = [b"ATG", b"GTG", b"TTG"];

lazy_static! {
    // NCBI translation table 1
    static ref CODON_TABLE: HashMap<&'static str, char> = {
        let codons: [(&'static str, char); 64] = [
            ("TTT", 'F'), ("TTC", 'F'), ("TTA", 'L'), ("TTG", 'L'),
            ("TCT", 'S'), ("TCC", 'S'), ("TCA", 'S'), ("TCG", 'S'),
            ("TAT", 'Y'), ("TAC", 'Y'), ("TAA", STOP), ("TAG", STOP),
            ("TGT", 'C'), ("TGC", 'C'), ("TGA", STOP), ("TGG", 'W'),
            ("CTT", 'L'), ("CTC", 'L'), ("CTA", 'L'), ("CTG", 'L'),
            ("CCT", 'P'), ("CCC", 'P'), ("CCA", 'P'), ("CCG", 'P'),
            ("CAT", 'H'), ("CAC", 'H'), ("CAA", 'Q'), ("CAG", 'Q'),
            ("CGT", 'R'), ("CGC", 'R'), ("CGA", 'R'), ("CGG", 'R'),
            ("ATT", 'I'), ("ATC", 'I'), ("ATA", 'I'), ("ATG", 'M'),
            ("ACT", 'T'), ("ACC", 'T'), ("ACA", 'T'), ("ACG", 'T'),
            ("AAT", 'N'), ("AAC", 'N'), ("AAA", 'K'), ("AAG", 'K'),
            ("AGT", 'S'), ("AGC", 'S'), ("AGA", 'R'), ("AGG", 'R'),
            ("GTT", 'V'), ("GTC", 'V'), ("GTA", 'V'), ("GTG", 'V'),
            ("GCT", 'A'), ("GCC", 'A'), ("GCA", 'A'), ("GCG", 'A'),
            ("GAT", 'D'), ("GAC", 'D'), ("GAA", 'E'), ("GAG", 'E'),
            ("GGT", 'G'), ("GGC", 'G'), ("GGA", 'G'), ("GGG", 'G'),
        ];
        HashMap::from_iter(codons)
    };
}

/// Translates a single codon. Lower case bases are accepted.
pub fn translate_codon(codon: &[u8]) -> Option<char> {
    let upper = codon.to_ascii_uppercase();
    std::str::from_utf8(&upper)
        .ok()
        .and_then(|c| CODON_TABLE.get(c).copied())
}

/// Translates a nucleotide sequence codon by codon.
///
/// Bases after the last complete codon are ignored.
///
/// # Errors
///
/// An error is returned for the first codon that is not in the table, which happens when the
/// sequence contains anything other than `A`, `C`, `G` and `T`.
///
/// # Examples
///
/// ```rust
/// assert_eq!(translate(b"ATGAAATAA")?, "MK*");
/// ```
pub fn translate(nucleotides: &[u8]) -> anyhow::Result<String> {
    let mut protein = String::with_capacity(nucleotides.len() / 3);
    for (i, codon) in nucleotides.chunks_exact(3).enumerate() {
        match translate_codon(codon) {
            Some(aa) => protein.push(aa),
            None => bail!(
                "Could not translate codon {} (`{}`).",
                i + 1,
                String::from_utf8_lossy(codon)
            ),
        }
    }
    Ok(protein)
}

/// Returns the bases `start..=end` (1-based, inclusive) of `sequence`, upper cased.
///
/// `None` if the range does not lie within the sequence.
pub fn extract_region(sequence: &Sequence, start: u64, end: u64) -> Option<Sequence> {
    if start > end {
        return None;
    }
    let start = Position::new(usize::try_from(start).ok()?)?;
    let end = Position::new(usize::try_from(end).ok()?)?;
    sequence
        .get(start..=end)
        .map(|bases| Sequence::from_iter(bases.iter().map(|b| b.to_ascii_uppercase())))
}

/// The reverse complement of `sequence`.
pub fn reverse_complement(sequence: &Sequence) -> anyhow::Result<Sequence> {
    let rc: Result<Sequence, _> = sequence.complement().rev().collect();
    match rc {
        Ok(rc) => Ok(rc),
        Err(_) => bail!("Could not get the reverse complement of a sequence. Please check if the alphabet is valid."),
    }
}

/// Checks that `start..=end` on `strand` describes a well-formed coding sequence.
///
/// The region is read 5' to 3': as is on the `+` strand (also `.` and `?`), reverse
/// complemented on the `-` strand. Conditions are reported in this order, each at most once:
///
/// 1. [ErrorCode::TranslateFailed] if the region cannot be extracted; nothing else is checked.
/// 2. [ErrorCode::NotTriplet] if the length is not a multiple of 3. Checking continues on the
///    complete codons.
/// 3. [ErrorCode::TranslateFailed] if a codon cannot be translated; nothing else is checked.
/// 4. [ErrorCode::NoStop] without a stop codon, [ErrorCode::InternalStop] with more than one or
///    with a single stop that is not the last codon.
/// 5. [ErrorCode::BadStart] if the first codon is not one of [START_CODONS].
///
/// An empty vector means the gene is fine.
pub fn check_gene(sequence: &Sequence, start: u64, end: u64, strand: &str) -> Vec<ErrorCode> {
    let mut found = Vec::new();

    let region = match extract_region(sequence, start, end) {
        Some(region) => region,
        None => {
            warn!(
                "The gene region {}..{} does not lie within the sequence of length {}.",
                start,
                end,
                sequence.len()
            );
            found.push(ErrorCode::TranslateFailed);
            return found;
        }
    };

    if region.len() % 3 != 0 {
        found.push(ErrorCode::NotTriplet);
    }

    let region = if strand == "-" {
        match reverse_complement(&region) {
            Ok(rc) => rc,
            Err(e) => {
                debug!("{}..{}: {}", start, end, e);
                found.push(ErrorCode::TranslateFailed);
                return found;
            }
        }
    } else {
        region
    };

    let bases: &[u8] = region.as_ref();
    let protein = match translate(bases) {
        Ok(protein) => protein,
        Err(e) => {
            debug!("{}..{}: {}", start, end, e);
            found.push(ErrorCode::TranslateFailed);
            return found;
        }
    };

    let n_stops = protein.matches(STOP).count();
    if n_stops == 0 {
        found.push(ErrorCode::NoStop);
    } else if n_stops > 1 || !protein.ends_with(STOP) {
        found.push(ErrorCode::InternalStop);
    }

    let is_start = bases
        .get(..3)
        .map(|codon| START_CODONS.contains(&codon))
        .unwrap_or(false);
    if !is_start {
        found.push(ErrorCode::BadStart);
    }

    found
}
