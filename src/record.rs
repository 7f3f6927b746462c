use crate::errors::ErrorCode;
use crate::gffcheck_utils::{CONTIG_TYPE, NUM_FIELDS};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One feature line: the 9 tab separated columns of an annotation record.
///
/// A `FeatureLine` exists for every input line with exactly 9 columns; whether the columns are
/// *valid* is decided later by the line checker. The struct is immutable once parsed.
///
/// # Fields
///
/// * `line_number`: the 1-based line number in the input file.
/// * `fields`: the raw text of the 9 columns, in file order.
pub struct FeatureLine {
    line_number: usize,
    fields: [String; NUM_FIELDS],
}

impl FeatureLine {
    /// Splits `line` on tabs.
    ///
    /// # Returns
    ///
    /// * `Ok(FeatureLine)` if the line has exactly 9 columns.
    /// * `Err(ErrorCode::LinesTooFew)` or `Err(ErrorCode::LinesTooMany)` otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let fl = FeatureLine::parse("chr1\tsrc\tgene\t1\t9\t.\t+\t.\tID=g1;Name=g1", 1)?;
    /// assert_eq!(fl.feature_type(), "gene");
    /// ```
    pub fn parse(line: &str, line_number: usize) -> Result<FeatureLine, ErrorCode> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < NUM_FIELDS {
            return Err(ErrorCode::LinesTooFew);
        }
        if cols.len() > NUM_FIELDS {
            return Err(ErrorCode::LinesTooMany);
        }
        let fields: [String; NUM_FIELDS] = std::array::from_fn(|i| cols[i].to_string());
        Ok(FeatureLine {
            line_number,
            fields,
        })
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn fields(&self) -> &[String; NUM_FIELDS] {
        &self.fields
    }

    pub fn seqid(&self) -> &str {
        &self.fields[0]
    }

    pub fn source(&self) -> &str {
        &self.fields[1]
    }

    pub fn feature_type(&self) -> &str {
        &self.fields[2]
    }

    pub fn start(&self) -> &str {
        &self.fields[3]
    }

    pub fn end(&self) -> &str {
        &self.fields[4]
    }

    pub fn score(&self) -> &str {
        &self.fields[5]
    }

    pub fn strand(&self) -> &str {
        &self.fields[6]
    }

    pub fn phase(&self) -> &str {
        &self.fields[7]
    }

    pub fn attributes(&self) -> &str {
        &self.fields[8]
    }

    /// The start coordinate as a number, if it is one.
    pub fn start_value(&self) -> Option<u64> {
        self.start().parse().ok()
    }

    /// The end coordinate as a number, if it is one.
    pub fn end_value(&self) -> Option<u64> {
        self.end().parse().ok()
    }

    pub fn is_contig(&self) -> bool {
        self.feature_type() == CONTIG_TYPE
    }

    /// The parsed entries of the attributes column.
    pub fn attribute_entries(&self) -> Vec<AttributeEntry> {
        AttributeEntry::parse_all(self.attributes())
    }

    /// The line re-serialized as tab separated text, without a line terminator.
    pub fn to_line(&self) -> String {
        self.fields.join("\t")
    }
}

impl std::fmt::Display for FeatureLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_line())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One segment of the attributes column.
///
/// * `Pair` - a `key=value` segment, split at the first `=`.
/// * `Bare` - a non-empty segment without any `=`.
pub enum AttributeEntry {
    Pair { key: String, value: String },
    Bare(String),
}

impl AttributeEntry {
    /// Splits an attributes column on `;`, dropping empty segments. A lone `.` means no attributes.
    pub fn parse_all(attributes: &str) -> Vec<AttributeEntry> {
        if attributes == "." {
            return Vec::new();
        }
        attributes
            .split(';')
            .filter(|seg| !seg.is_empty())
            .map(|seg| match seg.split_once('=') {
                Some((key, value)) => AttributeEntry::Pair {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                None => AttributeEntry::Bare(seg.to_string()),
            })
            .collect()
    }

    /// The key of a `Pair`.
    pub fn key(&self) -> Option<&str> {
        match self {
            AttributeEntry::Pair { key, .. } => Some(key),
            AttributeEntry::Bare(_) => None,
        }
    }

    /// The value of a `Pair`.
    pub fn value(&self) -> Option<&str> {
        match self {
            AttributeEntry::Pair { value, .. } => Some(value),
            AttributeEntry::Bare(_) => None,
        }
    }
}
