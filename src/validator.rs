use crate::checker::LineChecker;
use crate::errors::{ErrorCode, ErrorContext, ValidationError};
use crate::options::ValidatorOptions;
use crate::reader::FastaSequence;
use crate::record::FeatureLine;
use crate::sorter::{sort_features, SortedFeatures};
use tracing::{info, warn};

#[derive(Clone, Debug)]
/// The result of a validation run.
///
/// # Fields
///
/// * `directives`: the `#` lines of the input, written above the sorted lines.
/// * `sorted`: the feature lines in output order, the contig line first.
/// * `errors`: every condition found, warnings included. Errors found while sorting come first
///   and refer to input line numbers; errors found while checking lines refer to line numbers of
///   the sorted output.
pub struct ValidationReport {
    pub directives: Vec<String>,
    pub sorted: Vec<FeatureLine>,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// The number of entries with error severity.
    pub fn num_errors(&self) -> usize {
        self.errors.iter().filter(|e| !e.is_warning()).count()
    }

    pub fn num_warnings(&self) -> usize {
        self.errors.iter().filter(|e| e.is_warning()).count()
    }

    /// `true` if nothing but warnings was found.
    pub fn is_valid(&self) -> bool {
        self.num_errors() == 0
    }

    /// The lines of the sorted annotation file: directives, then the sorted feature lines.
    pub fn sorted_lines(&self) -> Vec<String> {
        self.directives
            .iter()
            .cloned()
            .chain(self.sorted.iter().map(|l| l.to_line()))
            .collect()
    }
}

/// Validates an annotation file against the text of its FASTA file.
///
/// See [validate_sequence]. The sequence text is read with [FastaSequence::from_text], which
/// fails if the text has `>` headers but is not FASTA.
///
/// # Examples
///
/// ```rust
/// let lines = vec![
///     "phage\tsrc\tgene\t1\t9\t.\t+\t.\tID=g1;Name=g1",
///     "phage\tsrc\tmRNA\t1\t9\t.\t+\t.\tID=m1;Parent=g1",
/// ];
/// let options = ValidatorOptions::new(
///     TypeHierarchy::new(&["gene", "mRNA"])?,
///     false,
///     CoordinateRule::Lenient,
///     AttributePolicy::Warn,
/// );
/// let report = validate(&lines, ">phage\nATGAAATAA\n", &options)?;
/// assert!(report.errors.is_empty());
/// ```
pub fn validate<T: AsRef<str>>(
    annotation_lines: &[T],
    sequence_text: &str,
    options: &ValidatorOptions,
) -> anyhow::Result<ValidationReport> {
    let fasta = FastaSequence::from_text(sequence_text)?;
    validate_sequence(annotation_lines, &fasta, options)
}

/// Validates an annotation file against an already loaded sequence.
///
/// The lines are first sorted and grouped (see [sort_features]), then every sorted line is
/// checked in order by a fresh [LineChecker]. All state of the run lives in this call.
///
/// # Errors
///
/// The only `Err` is the fatal [crate::errors::UnknownFeatureType]; everything else is reported
/// in [ValidationReport::errors].
pub fn validate_sequence<T: AsRef<str>>(
    annotation_lines: &[T],
    fasta: &FastaSequence,
    options: &ValidatorOptions,
) -> anyhow::Result<ValidationReport> {
    let mut errors = Vec::new();

    if !fasta.is_single() {
        warn!(
            "The FASTA input holds {} sequences; expected one.",
            fasta.n_headers()
        );
        errors.push(ValidationError::new(
            ErrorCode::MultipleSequences,
            ErrorContext::None,
        ));
    }

    let SortedFeatures {
        directives,
        contig,
        features,
        errors: sort_errors,
    } = sort_features(annotation_lines, &options.type_hierarchy)?;
    errors.extend(sort_errors);

    let mut sorted = Vec::with_capacity(features.len() + 1);
    sorted.extend(contig);
    sorted.extend(features);

    // positions count the directives written above the sorted lines
    let offset = directives.len();
    let mut checker = LineChecker::new(fasta.sequence(), options);
    for (i, line) in sorted.iter().enumerate() {
        errors.extend(checker.check(offset + i + 1, line));
    }

    let report = ValidationReport {
        directives,
        sorted,
        errors,
    };
    info!(
        "Checked {} lines: {} errors, {} warnings, {} distinct IDs.",
        report.sorted.len(),
        report.num_errors(),
        report.num_warnings(),
        checker.num_ids()
    );
    Ok(report)
}
