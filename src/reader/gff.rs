use crate::gffcheck_utils::get_reader_from_path;
use anyhow::Context;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

/// Reads every line of an annotation file into memory.
///
/// The file can be plain text or gzipped; compression is detected from the first two bytes.
/// Lines are returned without their `\n` terminator and otherwise untouched, blank lines and
/// directives included, so that line numbers match the file.
///
/// # Errors
///
/// An error naming the path is returned if the file cannot be opened or is not valid UTF-8.
///
/// # Examples
///
/// ```rust
/// let lines = read_annotation_lines("path/to/phage.gff")?;
/// ```
pub fn read_annotation_lines<T: AsRef<Path>>(file_path: T) -> anyhow::Result<Vec<String>> {
    let file_path = file_path.as_ref();
    let rdr = get_reader_from_path(file_path)
        .with_context(|| format!("Could not open the annotation file {:?}", file_path))?;

    let lines = rdr
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .with_context(|| format!("Failed reading the annotation file {:?}", file_path))?;

    info!(
        "Finished reading the annotation file. Found {} lines.",
        lines.len()
    );
    Ok(lines)
}
