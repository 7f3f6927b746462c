use crate::errors::ValidationError;
use crate::validator::ValidationReport;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Renders the error report, one entry per error.
///
/// Each entry is `[<n>] <message>` or `Coordinate <start> <message>`. With `include_lines`, an
/// entry is preceded by the offending line (when there is one) and followed by a blank line.
///
/// # Examples
///
/// ```rust
/// let text = render_errors(&report.errors, true);
/// ```
pub fn render_errors(errors: &[ValidationError], include_lines: bool) -> String {
    let mut out = String::new();
    for e in errors {
        if include_lines {
            if let Some(line) = &e.line {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&e.to_string());
            out.push_str("\n\n");
        } else {
            out.push_str(&e.to_string());
            out.push('\n');
        }
    }
    out
}

/// Renders the sorted annotation file: directives, then the sorted lines.
pub fn render_sorted(report: &ValidationReport) -> String {
    let mut out = String::new();
    for line in report.sorted_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Writes `text` to `file_path`, creating the parent directory if needed.
pub fn write_text<T: AsRef<Path>>(file_path: T, text: &str) -> anyhow::Result<()> {
    let file_path = file_path.as_ref();

    // create the folder if it doesn't exist
    fs::create_dir_all(file_path.parent().with_context(|| {
        format!(
            "Could not get the parent directory of the given output file path {:?}",
            file_path.as_os_str()
        )
    })?)?;

    let mut file = fs::File::create(file_path).with_context(|| {
        format!(
            "Could not create the output file {:?}",
            file_path.as_os_str()
        )
    })?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("Could not write to {:?}", file_path.as_os_str()))?;

    debug!("Wrote {} bytes to {:?}", text.len(), file_path);
    Ok(())
}
