//! gffcheck validates and sorts gene annotations in the nine column GFF3 layout against the
//! genome sequence they describe. It is written for small genomes (bacteriophages) whose whole
//! annotation and sequence fit comfortably in memory.
//!
//! A run sorts the feature lines by start coordinate and by a type hierarchy such as
//! `gene, mRNA, exon`, checks that every coordinate group has one line per level, validates every
//! column and the attributes of every line, and translates each gene to check its start and stop
//! codons. The result is a [ValidationReport] with the sorted lines and a list of
//! [ValidationError]s, each tagged with a stable 4-digit code.
//!
//! ```rust
//! let options = ValidatorOptions::default();
//! let lines = read_annotation_lines("phage.gff")?;
//! let report = validate(&lines, &read_sequence_text("phage.fasta")?, &options)?;
//! print!("{}", render_errors(&report.errors, options.include_original_lines));
//! ```

pub mod biology;
pub mod checker;
pub mod errors;
pub mod feature_table;
pub mod fields;
pub mod gffcheck_utils;
pub mod options;
pub mod reader;
pub mod record;
pub mod report;
pub mod sorter;
pub mod validator;

pub use errors::{
    ErrorCode, ErrorContext, ErrorKind, Severity, UnknownFeatureType, ValidationError,
};
pub use feature_table::{attribute_qualifiers, to_feature_table};
pub use options::{AttributePolicy, CoordinateRule, TypeHierarchy, ValidatorOptions};
pub use reader::fasta::read_sequence_text;
pub use reader::{read_annotation_lines, FastaSequence};
pub use record::{AttributeEntry, FeatureLine};
pub use report::{render_errors, render_sorted, write_text};
pub use validator::{validate, validate_sequence, ValidationReport};
