use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::trace;

/// Number of tab separated columns of a feature line.
pub const NUM_FIELDS: usize = 9;

/// The type of the optional metadata line describing the whole sequence.
pub const CONTIG_TYPE: &str = "contig";

/// The only header line this validator accepts.
pub const GFF3_HEADER: &str = "##gff-version 3";

pub(crate) const DEFAULT_TYPES: [&str; 3] = ["gene", "mRNA", "exon"];

/// Tests if the stream underlying the [BufReader] `reader` is gzipped or not by examining the
/// first 2 bytes for the magic header. This function *requires*, but does not check, that
/// none of the stream has yet been consumed. It will fill the buffer to examine the first two
/// bytes, but will not consume them.
///
/// Notes: implementation taken from
/// <https://github.com/zaeleus/noodles/blob/ba1b34ce22e72c2df277b20ce4c5c7b75d75a199/noodles-util/src/variant/reader/builder.rs#L131>
pub fn is_gzipped<T: BufRead>(reader: &mut T) -> std::io::Result<bool> {
    const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

    let src = reader.fill_buf()?;
    if src.get(..2) == Some(&GZIP_MAGIC_NUMBER) {
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Opens `p` for buffered reading, transparently decompressing it if it is gzipped.
pub fn get_reader_from_path<T: AsRef<Path>>(p: T) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(p.as_ref())?;
    let mut inner_rdr = BufReader::new(file);
    if is_gzipped(&mut inner_rdr)? {
        trace!("auto-detected gzipped file - reading via decompression");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(inner_rdr))))
    } else {
        Ok(Box::new(inner_rdr))
    }
}

/// Strips the line terminator (`\n` or `\r\n`) and nothing else.
///
/// Trailing tabs are significant: an empty 9th column still counts as a column.
pub fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
