//! Conversion of validated lines to the five-column feature table layout.
//!
//! ```text
//! >Feature phage1
//! 1	9	gene
//!   /gene=g1
//! 9	1	mRNA
//!     /note="reverse strand"
//! ```

use crate::record::FeatureLine;

/// Converts an attributes column into feature table qualifiers, one per line.
///
/// * `ID` (any case) becomes `  /gene=<value>`, value verbatim.
/// * `Note` (any case) becomes `    /note="<value>"`, the value re-quoted.
/// * `Parent` is dropped; the nesting of the table already encodes it.
/// * Any other `key=value` becomes `    /<key>="<value>"`.
///
/// Empty segments are skipped, so leading, trailing or doubled `;` are fine. Segments without
/// `=` carry no qualifier and are skipped too.
///
/// # Examples
///
/// ```rust
/// assert_eq!(attribute_qualifiers("ID=gene1;Note=note4"), "  /gene=gene1\n    /note=\"note4\"\n");
/// ```
pub fn attribute_qualifiers(attributes: &str) -> String {
    let mut out = String::new();
    for seg in attributes.split(';').filter(|s| !s.is_empty()) {
        let (key, value) = match seg.split_once('=') {
            Some(kv) => kv,
            None => continue,
        };
        if key.eq_ignore_ascii_case("id") {
            out.push_str(&format!("  /gene={}\n", value));
        } else if key.eq_ignore_ascii_case("note") {
            out.push_str(&format!("    /note=\"{}\"\n", unquote(value)));
        } else if key.eq_ignore_ascii_case("parent") {
            continue;
        } else {
            out.push_str(&format!("    /{}=\"{}\"\n", key, unquote(value)));
        }
    }
    out
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Renders sorted feature lines as a feature table.
///
/// A `>Feature <seqid>` header opens the table and is repeated whenever the sequence id
/// changes. The contig line is metadata and is skipped. Each feature is written as
/// `<start>\t<end>\t<type>`, with the coordinates swapped on the `-` strand, followed by its
/// qualifiers.
pub fn to_feature_table(lines: &[FeatureLine]) -> String {
    let mut out = String::new();
    let mut current_seqid: Option<&str> = None;

    for line in lines.iter().filter(|l| !l.is_contig()) {
        if current_seqid != Some(line.seqid()) {
            out.push_str(&format!(">Feature {}\n", line.seqid()));
            current_seqid = Some(line.seqid());
        }
        let (from, to) = if line.strand() == "-" {
            (line.end(), line.start())
        } else {
            (line.start(), line.end())
        };
        out.push_str(&format!("{}\t{}\t{}\n", from, to, line.feature_type()));
        out.push_str(&attribute_qualifiers(line.attributes()));
    }
    out
}
