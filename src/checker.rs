use crate::biology::check_gene;
use crate::errors::{ErrorCode, Severity, ValidationError};
use crate::fields::{
    valid_attributes, valid_coordinate, valid_coordinates, valid_phase, valid_score, valid_seqid,
    valid_source, valid_strand, valid_tab_structure, valid_type,
};
use crate::options::{AttributePolicy, ValidatorOptions};
use crate::record::{AttributeEntry, FeatureLine};
use noodles::fasta::record::Sequence;
use std::collections::HashSet;
use tracing::debug;

const ID_KEY: &str = "ID";
const NAME_KEY: &str = "Name";
const PARENT_KEY: &str = "Parent";

/// Checks sorted feature lines one after the other.
///
/// The checker carries the state of a run: the IDs seen so far and the hierarchy counter, which
/// is the level the next line is expected to be at. A gene line sets the counter to 1; every
/// lower-level line must be at the counter's level and advances it by one. Lines have to be fed
/// in sorted order for the counter to make sense.
///
/// One `LineChecker` serves one run and is dropped with it.
pub struct LineChecker<'a> {
    sequence: &'a Sequence,
    options: &'a ValidatorOptions,
    ids: HashSet<String>,
    counter: usize,
}

impl<'a> LineChecker<'a> {
    pub fn new(sequence: &'a Sequence, options: &'a ValidatorOptions) -> LineChecker<'a> {
        LineChecker {
            sequence,
            options,
            ids: HashSet::new(),
            counter: 0,
        }
    }

    /// The number of distinct IDs registered so far.
    pub fn num_ids(&self) -> usize {
        self.ids.len()
    }

    /// Checks `line`, found at `position` of the sorted output, and returns what is wrong with it.
    ///
    /// Column errors come first, in column order, then biology errors (gene lines only), then
    /// attribute errors. The contig line only has columns 1, 2 and 4 to 8 checked and does not
    /// touch the checker's state.
    pub fn check(&mut self, position: usize, line: &FeatureLine) -> Vec<ValidationError> {
        let mut codes = self.check_columns(line);

        let level = if line.is_contig() {
            None
        } else {
            self.options.type_hierarchy.position(line.feature_type())
        };
        match level {
            Some(0) => self.check_gene_line(line, &mut codes),
            Some(level) => self.check_lower_line(line, level, &mut codes),
            // contig, or an unknown type already reported as a column error
            None => {}
        }

        let mut errors: Vec<ValidationError> = codes
            .into_iter()
            .map(|code| ValidationError::at_line(code, position).with_line(line.to_line()))
            .collect();

        if level.is_some_and(|level| has_spurious_entries(line, level)) {
            let severity = match self.options.attribute_policy {
                AttributePolicy::Warn => Severity::Warning,
                AttributePolicy::Strict => Severity::Error,
            };
            debug!(
                "Line {} has attribute entries its level does not recognise.",
                position
            );
            errors.push(
                ValidationError::at_line(ErrorCode::SpuriousAttribute, position)
                    .with_severity(severity)
                    .with_line(line.to_line()),
            );
        }

        errors
    }

    fn check_columns(&self, line: &FeatureLine) -> Vec<ErrorCode> {
        let mut codes = Vec::new();
        let rule = self.options.coordinate_rule;

        if !valid_tab_structure(&line.to_line()) {
            codes.push(ErrorCode::TabDelimited);
        }
        if !valid_seqid(line.seqid()) {
            codes.push(ErrorCode::SeqIdCharacters);
        }
        if !valid_source(line.source()) {
            codes.push(ErrorCode::SourceCharacters);
        }
        if !line.is_contig()
            && !valid_type(line.feature_type(), self.options.type_hierarchy.types())
        {
            codes.push(ErrorCode::UnknownType);
        }
        let start_ok = valid_coordinate(line.start());
        if !start_ok {
            codes.push(ErrorCode::StartNotPositive);
        }
        let end_ok = if start_ok {
            valid_coordinates(line.start(), line.end(), rule)
        } else {
            valid_coordinate(line.end())
        };
        if !end_ok {
            codes.push(ErrorCode::EndBeforeStart);
        }
        if !valid_score(line.score()) {
            codes.push(ErrorCode::BadScore);
        }
        if !valid_strand(line.strand()) {
            codes.push(ErrorCode::BadStrand);
        }
        if !valid_phase(line.phase()) {
            codes.push(ErrorCode::BadPhase);
        }
        codes
    }

    fn check_gene_line(&mut self, line: &FeatureLine, codes: &mut Vec<ErrorCode>) {
        self.counter = 1;

        if valid_coordinates(line.start(), line.end(), self.options.coordinate_rule) {
            if let (Some(start), Some(end)) = (line.start_value(), line.end_value()) {
                codes.extend(check_gene(self.sequence, start, end, line.strand()));
            }
        }

        if !valid_attributes(line.attributes()) {
            codes.push(ErrorCode::GeneAttributeCharacters);
        }

        let entries = line.attribute_entries();
        let n_dup = self.register_ids(&entries);
        codes.extend(std::iter::repeat(ErrorCode::GeneDuplicateId).take(n_dup));

        if count_key(&entries, ID_KEY) != 1 || count_key(&entries, NAME_KEY) != 1 {
            codes.push(ErrorCode::MissingIdOrName);
        }
    }

    fn check_lower_line(&mut self, line: &FeatureLine, level: usize, codes: &mut Vec<ErrorCode>) {
        if self.counter != level {
            debug!(
                "Expected a line at level {}, found `{}` at level {}.",
                self.counter,
                line.feature_type(),
                level
            );
            codes.push(ErrorCode::BadSortOrIncompleteGroup);
        }
        self.counter += 1;

        if !valid_attributes(line.attributes()) {
            codes.push(ErrorCode::AttributeCharacters);
        }

        let entries = line.attribute_entries();
        let n_dup = self.register_ids(&entries);
        codes.extend(std::iter::repeat(ErrorCode::DuplicateId).take(n_dup));

        let has_parent = count_key(&entries, PARENT_KEY) > 0;
        if level == self.options.type_hierarchy.last_position() {
            if !has_parent {
                codes.push(ErrorCode::MissingParent);
            }
        } else if !has_parent || count_key(&entries, ID_KEY) == 0 {
            codes.push(ErrorCode::MissingIdOrParent);
        }
    }

    /// Adds every `ID` value of `entries` to the registry and returns how many were already there.
    fn register_ids(&mut self, entries: &[AttributeEntry]) -> usize {
        entries
            .iter()
            .filter(|e| e.key() == Some(ID_KEY))
            .filter_map(|e| e.value())
            .filter(|id| !self.ids.insert(id.to_string()))
            .count()
    }
}

fn count_key(entries: &[AttributeEntry], key: &str) -> usize {
    entries.iter().filter(|e| e.key() == Some(key)).count()
}

/// `true` if the attributes have a bare segment or a key the line's level does not recognise:
/// a gene knows `ID` and `Name`, every lower level knows `ID` and `Parent`.
fn has_spurious_entries(line: &FeatureLine, level: usize) -> bool {
    let known: [&str; 2] = if level == 0 {
        [ID_KEY, NAME_KEY]
    } else {
        [ID_KEY, PARENT_KEY]
    };
    line.attribute_entries()
        .iter()
        .any(|e| !e.key().is_some_and(|k| known.contains(&k)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorContext;
    use crate::options::{CoordinateRule, TypeHierarchy};

    fn fl(ty: &str, start: &str, end: &str, strand: &str, attrs: &str) -> FeatureLine {
        let line = format!("phage\tsrc\t{ty}\t{start}\t{end}\t.\t{strand}\t.\t{attrs}");
        FeatureLine::parse(&line, 1).unwrap()
    }

    fn codes(errors: &[ValidationError]) -> Vec<ErrorCode> {
        errors.iter().map(|e| e.code).collect()
    }

    fn seq() -> Sequence {
        Sequence::from_iter(b"ATGAAATAAATGCCCTGA".iter().copied())
    }

    #[test]
    fn test_valid_group() {
        let s = seq();
        let opts = ValidatorOptions::default();
        let mut checker = LineChecker::new(&s, &opts);
        assert!(checker
            .check(1, &fl("gene", "1", "9", "+", "ID=g1;Name=g1"))
            .is_empty());
        assert!(checker
            .check(2, &fl("mRNA", "1", "9", "+", "ID=m1;Parent=g1"))
            .is_empty());
        assert!(checker
            .check(3, &fl("exon", "1", "9", "+", "Parent=m1"))
            .is_empty());
        assert_eq!(checker.num_ids(), 2);
    }

    #[test]
    fn test_column_errors() {
        let s = seq();
        let opts = ValidatorOptions::default();
        let mut checker = LineChecker::new(&s, &opts);
        let line = FeatureLine::parse(
            "pha ge\tsrc&\tgene\t0\t9\thigh\t=\t3\tID=g1;Name=g1",
            1,
        )
        .unwrap();
        let errors = checker.check(4, &line);
        assert_eq!(
            codes(&errors),
            vec![
                ErrorCode::SeqIdCharacters,
                ErrorCode::SourceCharacters,
                ErrorCode::StartNotPositive,
                ErrorCode::BadScore,
                ErrorCode::BadStrand,
                ErrorCode::BadPhase,
            ]
        );
        assert!(errors
            .iter()
            .all(|e| e.context == ErrorContext::Line(crate::errors::LinePosition::new(4))));
    }

    #[test]
    fn test_coordinate_rule() {
        let s = seq();
        let mut opts = ValidatorOptions::default();
        let single = fl("exon", "5", "5", "+", "Parent=m1");
        let reversed = fl("exon", "6", "5", "+", "Parent=m1");

        let mut checker = LineChecker::new(&s, &opts);
        checker.counter = 2;
        assert!(!codes(&checker.check(1, &single)).contains(&ErrorCode::EndBeforeStart));
        checker.counter = 2;
        assert!(codes(&checker.check(1, &reversed)).contains(&ErrorCode::EndBeforeStart));

        opts.coordinate_rule = CoordinateRule::Strict;
        let mut checker = LineChecker::new(&s, &opts);
        checker.counter = 2;
        assert!(codes(&checker.check(1, &single)).contains(&ErrorCode::EndBeforeStart));
    }

    #[test]
    fn test_gene_biology_runs_only_on_valid_coordinates() {
        let s = seq();
        let opts = ValidatorOptions::default();
        let mut checker = LineChecker::new(&s, &opts);
        let errors = checker.check(1, &fl("gene", "10", "18", "+", "ID=g1;Name=g1"));
        // ATG CCC TGA is fine
        assert!(errors.is_empty());
        let errors = checker.check(2, &fl("gene", "1", "6", "+", "ID=g2;Name=g2"));
        assert_eq!(codes(&errors), vec![ErrorCode::NoStop]);
        let errors = checker.check(3, &fl("gene", "9", "1", "+", "ID=g3;Name=g3"));
        assert_eq!(codes(&errors), vec![ErrorCode::EndBeforeStart]);
    }

    #[test]
    fn test_duplicate_ids() {
        let s = seq();
        let opts = ValidatorOptions::new(
            TypeHierarchy::new(&["gene", "mRNA"]).unwrap(),
            false,
            CoordinateRule::Lenient,
            AttributePolicy::Warn,
        );
        let mut checker = LineChecker::new(&s, &opts);
        assert!(checker
            .check(1, &fl("gene", "1", "9", "+", "ID=g1;Name=g1"))
            .is_empty());
        assert!(checker
            .check(2, &fl("mRNA", "1", "9", "+", "Parent=g1"))
            .is_empty());
        let errors = checker.check(3, &fl("gene", "10", "18", "+", "ID=g1;Name=x"));
        assert_eq!(codes(&errors), vec![ErrorCode::GeneDuplicateId]);
        let errors = checker.check(4, &fl("mRNA", "10", "18", "+", "ID=g1;Parent=g1"));
        assert_eq!(codes(&errors), vec![ErrorCode::DuplicateId]);
    }

    #[test]
    fn test_required_attributes() {
        let s = seq();
        let opts = ValidatorOptions::default();
        let mut checker = LineChecker::new(&s, &opts);
        let errors = checker.check(1, &fl("gene", "1", "9", "+", "ID=g1"));
        assert_eq!(codes(&errors), vec![ErrorCode::MissingIdOrName]);
        let errors = checker.check(2, &fl("mRNA", "1", "9", "+", "Parent=g1"));
        assert_eq!(codes(&errors), vec![ErrorCode::MissingIdOrParent]);
        let errors = checker.check(3, &fl("exon", "1", "9", "+", "ID=e1"));
        assert_eq!(codes(&errors), vec![ErrorCode::MissingParent]);
    }

    #[test]
    fn test_hierarchy_counter() {
        let s = seq();
        let opts = ValidatorOptions::default();
        let mut checker = LineChecker::new(&s, &opts);
        // no gene yet
        let errors = checker.check(1, &fl("mRNA", "1", "9", "+", "ID=m0;Parent=g0"));
        assert_eq!(codes(&errors), vec![ErrorCode::BadSortOrIncompleteGroup]);

        assert!(checker
            .check(2, &fl("gene", "1", "9", "+", "ID=g1;Name=g1"))
            .is_empty());
        // mRNA skipped
        let errors = checker.check(3, &fl("exon", "1", "9", "+", "Parent=g1"));
        assert_eq!(codes(&errors), vec![ErrorCode::BadSortOrIncompleteGroup]);
        // the counter advanced anyway, so a second exon is in place and an mRNA is not
        assert!(checker
            .check(4, &fl("exon", "1", "9", "+", "Parent=g1"))
            .is_empty());
        let errors = checker.check(5, &fl("mRNA", "1", "9", "+", "ID=m1;Parent=g1"));
        assert_eq!(codes(&errors), vec![ErrorCode::BadSortOrIncompleteGroup]);
    }

    #[test]
    fn test_attribute_grammar() {
        let s = seq();
        let opts = ValidatorOptions::default();
        let mut checker = LineChecker::new(&s, &opts);
        let errors = checker.check(1, &fl("gene", "1", "9", "+", "ID=g1;Name=g&1"));
        assert_eq!(codes(&errors), vec![ErrorCode::GeneAttributeCharacters]);
        let errors = checker.check(2, &fl("mRNA", "1", "9", "+", "ID=m1;Parent=g1=x"));
        assert_eq!(codes(&errors), vec![ErrorCode::AttributeCharacters]);
    }

    #[test]
    fn test_spurious_attributes() {
        let s = seq();
        let mut opts = ValidatorOptions::default();
        let line = fl("gene", "1", "9", "+", "ID=g1;Name=g1;Note=x;junk");

        let mut checker = LineChecker::new(&s, &opts);
        let errors = checker.check(1, &line);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, ErrorCode::GeneAttributeCharacters);
        assert_eq!(errors[1].code, ErrorCode::SpuriousAttribute);
        assert!(errors[1].is_warning());

        opts.attribute_policy = AttributePolicy::Strict;
        let mut checker = LineChecker::new(&s, &opts);
        let errors = checker.check(1, &line);
        assert_eq!(errors[1].severity, Severity::Error);
    }

    #[test]
    fn test_known_keys_depend_on_level() {
        let s = seq();
        let opts = ValidatorOptions {
            type_hierarchy: TypeHierarchy::new(&["gene", "mRNA"]).unwrap(),
            ..Default::default()
        };
        let mut checker = LineChecker::new(&s, &opts);

        // Parent is not a gene key
        let errors = checker.check(1, &fl("gene", "1", "9", "+", "ID=g1;Name=g1;Parent=x"));
        assert_eq!(codes(&errors), vec![ErrorCode::SpuriousAttribute]);
        assert!(errors[0].is_warning());

        // Name is not an mRNA key
        let errors = checker.check(2, &fl("mRNA", "1", "9", "+", "ID=m1;Parent=g1;Name=m1"));
        assert_eq!(codes(&errors), vec![ErrorCode::SpuriousAttribute]);

        let errors = checker.check(3, &fl("gene", "10", "18", "+", "ID=g2;Name=g2"));
        assert!(errors.is_empty());
        let errors = checker.check(4, &fl("mRNA", "10", "18", "+", "ID=m2;Parent=g2"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_contig_line() {
        let s = seq();
        let opts = ValidatorOptions::default();
        let mut checker = LineChecker::new(&s, &opts);
        let errors = checker.check(1, &fl("contig", "1", "18", ".", "ID=phage;Note=x"));
        assert!(errors.is_empty());
        assert_eq!(checker.num_ids(), 0);
        assert_eq!(checker.counter, 0);
    }
}
