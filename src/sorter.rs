use crate::errors::{ErrorCode, LinePosition, UnknownFeatureType, ValidationError};
use crate::fields::valid_header;
use crate::gffcheck_utils::strip_line_ending;
use crate::options::TypeHierarchy;
use crate::record::FeatureLine;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
/// All feature lines that share a start coordinate.
///
/// The group keeps a tally of how many lines it has seen for each hierarchy level. A complete
/// group holds exactly one line per level, so its positional sum is `0 + 1 + ... + (n - 1)`.
pub struct CoordinateGroup {
    start: String,
    counts: Vec<usize>,
}

impl CoordinateGroup {
    pub fn new<T: ToString>(start: T, n_levels: usize) -> CoordinateGroup {
        CoordinateGroup {
            start: start.to_string(),
            counts: vec![0; n_levels],
        }
    }

    /// Records a line at hierarchy index `position`.
    pub fn add(&mut self, position: usize) {
        if let Some(c) = self.counts.get_mut(position) {
            *c += 1;
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    /// The sum of the hierarchy indices of every line in the group.
    pub fn position_sum(&self) -> usize {
        self.counts.iter().enumerate().map(|(pos, c)| pos * c).sum()
    }

    /// `true` if the group holds exactly one line per level.
    ///
    /// This implies `position_sum() == n(n-1)/2`, and also catches the one case the sum alone
    /// cannot see: a group that lacks level 0 but is otherwise complete.
    pub fn is_complete(&self) -> bool {
        self.counts.iter().all(|c| *c == 1)
    }
}

#[derive(Clone, Debug, Default)]
/// The output of [sort_features].
///
/// # Fields
///
/// * `directives`: the `#` lines of the input, in input order.
/// * `contig`: the metadata line, if the file has one.
/// * `features`: every other well-formed line, sorted by start coordinate, then hierarchy level.
/// * `errors`: structural problems found while sorting, tagged with input line numbers
///   (or with the start coordinate for incomplete groups).
pub struct SortedFeatures {
    pub directives: Vec<String>,
    pub contig: Option<FeatureLine>,
    pub features: Vec<FeatureLine>,
    pub errors: Vec<ValidationError>,
}

impl SortedFeatures {
    /// The lines in output order: the contig line first, then the sorted features.
    pub fn lines(&self) -> impl Iterator<Item = &FeatureLine> {
        self.contig.iter().chain(self.features.iter())
    }
}

/// Parses, groups and orders the lines of an annotation file.
///
/// Blank lines are ignored and `#` lines are kept aside as directives. Each other line is split
/// into its 9 columns; lines with too few or too many columns are reported and dropped. The first
/// `contig` line is kept as metadata, later ones are reported and dropped. Everything else is
/// grouped by start coordinate and sorted by `(start, hierarchy index)` with a stable sort, so
/// lines that compare equal keep their input order. Lines whose start is not a number come first.
///
/// # Arguments
///
/// * `lines`: the raw lines of the file, with or without line terminators.
/// * `types`: the type hierarchy giving the valid types and their order.
///
/// # Returns
///
/// * `Ok(SortedFeatures)` with the ordered lines and any structural errors.
/// * `Err` wrapping an [UnknownFeatureType] if a line has a type outside the hierarchy. This
///   stops the run: there is no hierarchy index to sort such a line by.
pub fn sort_features<T: AsRef<str>>(
    lines: &[T],
    types: &TypeHierarchy,
) -> anyhow::Result<SortedFeatures> {
    let mut sorted = SortedFeatures::default();
    let mut groups: HashMap<String, CoordinateGroup> = HashMap::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line_number = idx + 1;
        let line = strip_line_ending(raw.as_ref());

        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with('#') {
            if line.starts_with("##gff-version") && !valid_header(line) {
                warn!(
                    "Line {} is not a valid GFF3 header; expected `##gff-version 3`.",
                    line_number
                );
            }
            sorted.directives.push(line.to_string());
            continue;
        }

        let feature = match FeatureLine::parse(line, line_number) {
            Ok(feature) => feature,
            Err(code) => {
                sorted
                    .errors
                    .push(ValidationError::at_line(code, line_number).with_line(line));
                continue;
            }
        };

        if feature.is_contig() {
            if sorted.contig.is_none() {
                sorted.contig = Some(feature);
            } else {
                warn!("Found another contig line at line {}.", line_number);
                sorted.errors.push(
                    ValidationError::at_line(ErrorCode::MultipleContigs, line_number)
                        .with_line(line),
                );
            }
            continue;
        }

        let position = match types.position(feature.feature_type()) {
            Some(position) => position,
            None => {
                error!(
                    "Line {} has type `{}`, which is not one of {}.",
                    line_number,
                    feature.feature_type(),
                    types
                );
                return Err(anyhow::Error::new(UnknownFeatureType {
                    line: LinePosition::new(line_number),
                    found: feature.feature_type().to_string(),
                    types: types.types().to_vec(),
                }));
            }
        };

        let key = group_key(&feature);
        groups
            .entry(key.clone())
            .or_insert_with(|| CoordinateGroup::new(key, types.len()))
            .add(position);
        sorted.features.push(feature);
    }

    sorted
        .features
        .sort_by_key(|f| (f.start_value(), types.position(f.feature_type())));

    // report incomplete groups in output order, once per start coordinate
    let mut reported = HashSet::with_capacity(groups.len());
    for feature in sorted.features.iter() {
        let key = group_key(feature);
        if !reported.insert(key.clone()) {
            continue;
        }
        if let Some(group) = groups.get(&key) {
            if !group.is_complete() {
                debug!(
                    "Coordinate {} has position sum {}, expected {}.",
                    group.start(),
                    group.position_sum(),
                    types.expected_position_sum()
                );
                sorted.errors.push(
                    ValidationError::at_coordinate(ErrorCode::IncompleteGroup, group.start())
                        .with_line(feature.to_line()),
                );
            }
        }
    }

    info!(
        "Sorted {} feature lines in {} coordinate groups; skipped {} malformed lines.",
        sorted.features.len(),
        groups.len(),
        sorted
            .errors
            .iter()
            .filter(|e| matches!(
                e.code,
                ErrorCode::LinesTooFew | ErrorCode::LinesTooMany | ErrorCode::MultipleContigs
            ))
            .count()
    );

    Ok(sorted)
}

/// Lines are grouped on the value of their start coordinate, so `01` and `1` share a group.
/// Starts that are not numbers are grouped on their text.
fn group_key(feature: &FeatureLine) -> String {
    match feature.start_value() {
        Some(start) => start.to_string(),
        None => feature.start().to_string(),
    }
}
