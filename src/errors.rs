use nutype::nutype;

#[nutype(derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef))]
/// The 1-based position of a line, either in the input file or in the sorted output.
pub struct LinePosition(usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// The four families of the error taxonomy.
///
/// # Variants
///
/// * `Format` - structural problems: wrong column count, multiple contigs, incomplete coordinate groups.
/// * `Line` - a single column or the attribute grammar of a line is wrong, including ID bookkeeping and
///   hierarchy order.
/// * `Biology` - the region described by a gene line is not a well-formed coding sequence.
/// * `Validation` - catch-all, used for spurious attribute entries.
pub enum ErrorKind {
    Format,
    Line,
    Biology,
    Validation,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Format => write!(f, "Format"),
            ErrorKind::Line => write!(f, "Line"),
            ErrorKind::Biology => write!(f, "Biology"),
            ErrorKind::Validation => write!(f, "Validation"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Every condition the validator can report.
///
/// The taxonomy is closed: each variant owns a stable 4-digit code and a fixed message
/// (see [ErrorCode::code] and [ErrorCode::message]). Downstream tooling greps the codes,
/// so neither may change.
pub enum ErrorCode {
    Usage,
    Unknown,
    SpuriousAttribute,
    LinesTooFew,
    LinesTooMany,
    TabDelimited,
    MultipleContigs,
    IncompleteGroup,
    MultipleSequences,
    LineUnknown,
    SeqIdCharacters,
    SourceCharacters,
    UnknownType,
    StartNotPositive,
    EndBeforeStart,
    BadScore,
    BadStrand,
    BadPhase,
    GeneAttributeCharacters,
    GeneDuplicateId,
    MissingIdOrName,
    BadSortOrIncompleteGroup,
    AttributeCharacters,
    DuplicateId,
    MissingParent,
    MissingIdOrParent,
    TranslateFailed,
    BadStart,
    NoStop,
    InternalStop,
    NotTriplet,
}

impl ErrorCode {
    /// All codes of the catalog, in catalog order.
    pub const ALL: [ErrorCode; 31] = [
        ErrorCode::Usage,
        ErrorCode::Unknown,
        ErrorCode::SpuriousAttribute,
        ErrorCode::LinesTooFew,
        ErrorCode::LinesTooMany,
        ErrorCode::TabDelimited,
        ErrorCode::MultipleContigs,
        ErrorCode::IncompleteGroup,
        ErrorCode::MultipleSequences,
        ErrorCode::LineUnknown,
        ErrorCode::SeqIdCharacters,
        ErrorCode::SourceCharacters,
        ErrorCode::UnknownType,
        ErrorCode::StartNotPositive,
        ErrorCode::EndBeforeStart,
        ErrorCode::BadScore,
        ErrorCode::BadStrand,
        ErrorCode::BadPhase,
        ErrorCode::GeneAttributeCharacters,
        ErrorCode::GeneDuplicateId,
        ErrorCode::MissingIdOrName,
        ErrorCode::BadSortOrIncompleteGroup,
        ErrorCode::AttributeCharacters,
        ErrorCode::DuplicateId,
        ErrorCode::MissingParent,
        ErrorCode::MissingIdOrParent,
        ErrorCode::TranslateFailed,
        ErrorCode::BadStart,
        ErrorCode::NoStop,
        ErrorCode::InternalStop,
        ErrorCode::NotTriplet,
    ];

    /// The taxonomy family this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::Usage | ErrorCode::Unknown | ErrorCode::SpuriousAttribute => {
                ErrorKind::Validation
            }
            ErrorCode::LinesTooFew
            | ErrorCode::LinesTooMany
            | ErrorCode::TabDelimited
            | ErrorCode::MultipleContigs
            | ErrorCode::IncompleteGroup
            | ErrorCode::MultipleSequences => ErrorKind::Format,
            ErrorCode::TranslateFailed
            | ErrorCode::BadStart
            | ErrorCode::NoStop
            | ErrorCode::InternalStop
            | ErrorCode::NotTriplet => ErrorKind::Biology,
            _ => ErrorKind::Line,
        }
    }

    /// The stable 4-digit code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::Usage => "0000",
            ErrorCode::Unknown => "1000",
            ErrorCode::SpuriousAttribute => "1000",
            ErrorCode::LinesTooFew => "0100",
            ErrorCode::LinesTooMany => "0200",
            ErrorCode::TabDelimited => "0300",
            ErrorCode::MultipleContigs => "0400",
            ErrorCode::IncompleteGroup => "0500",
            ErrorCode::MultipleSequences => "0600",
            ErrorCode::LineUnknown => "0001",
            ErrorCode::SeqIdCharacters => "0002",
            ErrorCode::SourceCharacters => "0003",
            ErrorCode::UnknownType => "0004",
            ErrorCode::StartNotPositive => "0005",
            ErrorCode::EndBeforeStart => "0006",
            ErrorCode::BadScore => "0007",
            ErrorCode::BadStrand => "0008",
            ErrorCode::BadPhase => "0009",
            ErrorCode::GeneAttributeCharacters => "0011",
            ErrorCode::GeneDuplicateId => "0012",
            ErrorCode::MissingIdOrName => "0013",
            ErrorCode::BadSortOrIncompleteGroup => "0021",
            ErrorCode::AttributeCharacters => "0022",
            ErrorCode::DuplicateId => "0023",
            ErrorCode::MissingParent => "0024",
            ErrorCode::MissingIdOrParent => "0025",
            ErrorCode::TranslateFailed => "0010",
            ErrorCode::BadStart => "0020",
            ErrorCode::NoStop => "0030",
            ErrorCode::InternalStop => "0040",
            ErrorCode::NotTriplet => "0050",
        }
    }

    /// The human-readable message of the catalog entry.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Usage => {
                "Usage Error: code not used. Use printDict() to see dictionary of errors"
            }
            ErrorCode::Unknown => "Validation Error: unknown",
            ErrorCode::SpuriousAttribute => {
                "Validation Error: unknown = spurious info. Recheck requirements of 9th component"
            }
            ErrorCode::LinesTooFew => "Format Error: unknown.",
            ErrorCode::LinesTooMany => "Format Error: lines merged.",
            ErrorCode::TabDelimited => "Format Error: tab deliminated.",
            ErrorCode::MultipleContigs => {
                "Format Error: multiple contigs. There should only be one contig line per file."
            }
            ErrorCode::IncompleteGroup => "Format Error: each set of coordinates must have a line for each type. Types are seen at the third component. Default types are [gene, mRNA, exon]",
            ErrorCode::MultipleSequences => {
                "Format Error: ensure only one sequence in fasta file."
            }
            ErrorCode::LineUnknown => "Line Error: unknown",
            ErrorCode::SeqIdCharacters => {
                "Line Error: 1st component = restrict characters used to a-Z/0-9/./=/;"
            }
            ErrorCode::SourceCharacters => {
                "Line Error: 2nd component = restrict characters used to a-Z/0-9/./=/;"
            }
            ErrorCode::UnknownType => {
                "Line Error: 3rd component = type not found in types. Default is [gene, mRNA, exon]."
            }
            ErrorCode::StartNotPositive => {
                "Line Error: 4th component = 1st coordinate must be positive."
            }
            ErrorCode::EndBeforeStart => {
                "Line Error: 5th component = 2nd coordinate must be greater than the 1st coordinate."
            }
            ErrorCode::BadScore => "Line Error: 6th component = must be a number or '.'",
            ErrorCode::BadStrand => "Line Error: 7th component = must be '+' or '-'",
            ErrorCode::BadPhase => "Line Error: 8th component = must be '.'",
            ErrorCode::GeneAttributeCharacters | ErrorCode::AttributeCharacters => {
                "Line Error: 9th component = restrict characters used to a-Z/0-9/./=/;"
            }
            ErrorCode::GeneDuplicateId | ErrorCode::DuplicateId => {
                "Line Error: 9th component = ID already used. Each ID must be unique."
            }
            ErrorCode::MissingIdOrName => "Line Error: 9th component = must have an ID and a name",
            ErrorCode::BadSortOrIncompleteGroup => "Line Error: 9th component = bad sort or a gene does not have a line for each type. Default types are [gene, mRNA, exon].",
            ErrorCode::MissingParent => {
                "Line Error: 9th component = last type, must at least have a Parent."
            }
            ErrorCode::MissingIdOrParent => {
                "Line Error: 9th component = must have an ID and a Parent."
            }
            ErrorCode::TranslateFailed => "Biology Error: unable to translate sequence. Ensure sequence provided is a nucleotide sequence.",
            ErrorCode::BadStart => "Biology Error: Incorrect start codon. Must start with M",
            ErrorCode::NoStop => "Biology Error: No stop codon detected.",
            ErrorCode::InternalStop => "Biology Error: Internal stop codons",
            ErrorCode::NotTriplet => {
                "Biology Error: total nucleotide count not divisible by three."
            }
        }
    }

    /// Looks up the catalog message for a `(kind, code)` pair.
    ///
    /// Codes that are not in the catalog for the given kind resolve to the usage message.
    pub fn lookup(kind: ErrorKind, code: &str) -> &'static str {
        ErrorCode::ALL
            .iter()
            .filter(|c| **c != ErrorCode::SpuriousAttribute)
            .find(|c| c.kind() == kind && c.code() == code)
            .map(|c| c.message())
            .unwrap_or_else(|| ErrorCode::Usage.message())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// How serious a reported condition is. Warnings are reported but do not make a file invalid.
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where in the input a [ValidationError] was found.
pub enum ErrorContext {
    /// A 1-based line position. Errors found while sorting refer to the input file, errors found
    /// while checking lines refer to the sorted output.
    Line(LinePosition),
    /// A start coordinate shared by a coordinate group.
    Coordinate(String),
    /// Not tied to any line, e.g. problems with the sequence file.
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One entry of the error report.
///
/// A `ValidationError` is an accumulation record: validators push them into a list and keep
/// going, they are never used for control flow.
pub struct ValidationError {
    pub code: ErrorCode,
    pub context: ErrorContext,
    pub severity: Severity,
    /// The offending raw line, echoed in the report when requested.
    pub line: Option<String>,
}

impl ValidationError {
    pub fn new(code: ErrorCode, context: ErrorContext) -> ValidationError {
        ValidationError {
            code,
            context,
            severity: Severity::Error,
            line: None,
        }
    }

    /// Shorthand for an error tagged with a line position.
    pub fn at_line(code: ErrorCode, position: usize) -> ValidationError {
        ValidationError::new(code, ErrorContext::Line(LinePosition::new(position)))
    }

    /// Shorthand for an error tagged with a group's start coordinate.
    pub fn at_coordinate<T: ToString>(code: ErrorCode, start: T) -> ValidationError {
        ValidationError::new(code, ErrorContext::Coordinate(start.to_string()))
    }

    pub fn with_severity(mut self, severity: Severity) -> ValidationError {
        self.severity = severity;
        self
    }

    pub fn with_line<T: Into<String>>(mut self, line: T) -> ValidationError {
        self.line = Some(line.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for ValidationError {
    /// Renders the report entry: `[<n>] <message>`, `Coordinate <start> <message>` or the bare message.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.context {
            ErrorContext::Line(pos) => write!(f, "[{}] {}", pos.as_ref(), self.code.message()),
            ErrorContext::Coordinate(start) => {
                write!(f, "Coordinate {} {}", start, self.code.message())
            }
            ErrorContext::None => write!(f, "{}", self.code.message()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The one fatal condition of a run: a feature type outside the type hierarchy.
///
/// Hierarchy positions are undefined for such a line, so the whole run stops. It travels inside
/// an [anyhow::Error]; use `downcast_ref::<UnknownFeatureType>()` to recognise it.
pub struct UnknownFeatureType {
    pub line: LinePosition,
    pub found: String,
    pub types: Vec<String>,
}

impl std::fmt::Display for UnknownFeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The third component of each line must be one of the types. The types are: [{}] .",
            self.types.join(", ")
        )
    }
}

impl std::error::Error for UnknownFeatureType {}
