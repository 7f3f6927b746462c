use crate::gffcheck_utils::{CONTIG_TYPE, DEFAULT_TYPES};
use anyhow::bail;
use std::collections::HashSet;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
/// The ordered list of feature types a file may use.
///
/// The hierarchy plays two roles. It is the enumeration of valid values for the 3rd column, and it
/// fixes the order in which the lines of a coordinate group are written: the first type (usually
/// `gene`) comes first, the last type (usually `exon`) comes last.
///
/// # Examples
///
/// ```rust
/// let types = TypeHierarchy::new(&["gene", "mRNA", "exon"])?;
/// assert_eq!(types.position("mRNA"), Some(1));
/// assert_eq!(types.expected_position_sum(), 3);
/// ```
pub struct TypeHierarchy {
    types: Vec<String>,
}

impl Default for TypeHierarchy {
    /// `[gene, mRNA, exon]`
    fn default() -> TypeHierarchy {
        TypeHierarchy {
            types: DEFAULT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TypeHierarchy {
    /// Creates a hierarchy from the given types, in order.
    ///
    /// # Errors
    ///
    /// An error is returned if the list is empty, contains an empty or duplicated name, or contains
    /// the reserved `contig` type, which is metadata and never part of a group.
    pub fn new<T: AsRef<str>>(types: &[T]) -> anyhow::Result<TypeHierarchy> {
        if types.is_empty() {
            bail!("The type hierarchy cannot be empty.")
        }

        let mut seen = HashSet::with_capacity(types.len());
        for t in types {
            let t = t.as_ref();
            if t.is_empty() {
                bail!("The type hierarchy cannot contain an empty type name.")
            }
            if t == CONTIG_TYPE {
                bail!(
                    "`{}` is reserved for the metadata line and cannot be part of the type hierarchy.",
                    CONTIG_TYPE
                )
            }
            if !seen.insert(t) {
                bail!("The type hierarchy contains `{}` more than once.", t)
            }
        }

        if types.len() == 1 {
            warn!("The type hierarchy has a single level; every line will be treated as a gene.")
        }

        Ok(TypeHierarchy {
            types: types.iter().map(|t| t.as_ref().to_string()).collect(),
        })
    }

    /// The 0-based hierarchy index of `ty`, or `None` if `ty` is not one of the types.
    pub fn position(&self, ty: &str) -> Option<usize> {
        self.types.iter().position(|t| t == ty)
    }

    pub fn contains(&self, ty: &str) -> bool {
        self.position(ty).is_some()
    }

    /// The number of levels.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The top level, e.g. `gene`.
    pub fn first(&self) -> &str {
        &self.types[0]
    }

    /// Index of the last level.
    pub fn last_position(&self) -> usize {
        self.types.len() - 1
    }

    /// The sum `0 + 1 + ... + (n - 1)` a complete coordinate group adds up to.
    pub fn expected_position_sum(&self) -> usize {
        let n = self.types.len();
        n * (n - 1) / 2
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }
}

impl std::str::FromStr for TypeHierarchy {
    type Err = anyhow::Error;

    /// Parses a comma separated list such as `gene,mRNA,exon`.
    fn from_str(s: &str) -> anyhow::Result<TypeHierarchy> {
        let types: Vec<&str> = s.split(',').map(|t| t.trim()).collect();
        TypeHierarchy::new(&types)
    }
}

impl std::fmt::Display for TypeHierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.types.join(", "))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// How the two coordinates of a line must relate.
///
/// * `Lenient` - `start <= end`; single-base features are allowed. This is the default.
/// * `Strict` - `start < end`.
pub enum CoordinateRule {
    #[default]
    Lenient,
    Strict,
}

impl From<bool> for CoordinateRule {
    /// `true` selects the strict rule.
    fn from(is_strict: bool) -> CoordinateRule {
        if is_strict {
            CoordinateRule::Strict
        } else {
            CoordinateRule::Lenient
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// What to do with attribute entries the line's level does not recognise.
///
/// * `Warn` - report them as spurious info with warning severity. This is the default.
/// * `Strict` - report them with error severity.
pub enum AttributePolicy {
    #[default]
    Warn,
    Strict,
}

impl From<bool> for AttributePolicy {
    fn from(is_strict: bool) -> AttributePolicy {
        if is_strict {
            AttributePolicy::Strict
        } else {
            AttributePolicy::Warn
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
/// Configuration of a validation run.
///
/// # Fields
///
/// * `type_hierarchy`: the valid types and their sort order.
/// * `include_original_lines`: if `true`, the report echoes the offending line above each entry.
/// * `coordinate_rule`: whether `start == end` is accepted.
/// * `attribute_policy`: severity of spurious attribute entries.
///
/// # Examples
///
/// ```rust
/// let options = ValidatorOptions::new(
///     TypeHierarchy::default(),
///     true,
///     CoordinateRule::Lenient,
///     AttributePolicy::Warn,
/// );
/// ```
pub struct ValidatorOptions {
    pub type_hierarchy: TypeHierarchy,
    pub include_original_lines: bool,
    pub coordinate_rule: CoordinateRule,
    pub attribute_policy: AttributePolicy,
}

impl ValidatorOptions {
    pub fn new(
        type_hierarchy: TypeHierarchy,
        include_original_lines: bool,
        coordinate_rule: CoordinateRule,
        attribute_policy: AttributePolicy,
    ) -> ValidatorOptions {
        ValidatorOptions {
            type_hierarchy,
            include_original_lines,
            coordinate_rule,
            attribute_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hierarchy() {
        let th = TypeHierarchy::default();
        assert_eq!(th.types(), &["gene", "mRNA", "exon"]);
        assert_eq!(th.first(), "gene");
        assert_eq!(th.last_position(), 2);
        assert_eq!(th.expected_position_sum(), 3);
        assert_eq!(th.position("exon"), Some(2));
        assert_eq!(th.position("Exon"), None);
    }

    #[test]
    fn test_hierarchy_rejects_bad_input() {
        assert!(TypeHierarchy::new::<&str>(&[]).is_err());
        assert!(TypeHierarchy::new(&["gene", "gene"]).is_err());
        assert!(TypeHierarchy::new(&["gene", ""]).is_err());
        assert!(TypeHierarchy::new(&["contig", "gene"]).is_err());
    }

    #[test]
    fn test_hierarchy_from_str() {
        let th: TypeHierarchy = "gene, CDS".parse().unwrap();
        assert_eq!(th.types(), &["gene", "CDS"]);
        assert_eq!(th.expected_position_sum(), 1);
        assert_eq!(th.to_string(), "[gene, CDS]");
    }

    #[test]
    fn test_option_defaults() {
        let opts = ValidatorOptions::default();
        assert_eq!(opts.type_hierarchy, TypeHierarchy::default());
        assert!(!opts.include_original_lines);
        assert_eq!(opts.coordinate_rule, CoordinateRule::Lenient);
        assert_eq!(opts.attribute_policy, AttributePolicy::Warn);
        assert_eq!(CoordinateRule::from(true), CoordinateRule::Strict);
        assert_eq!(AttributePolicy::from(false), AttributePolicy::Warn);
    }

    #[test]
    fn test_rules_from_flags() {
        let rule: CoordinateRule = false.into();
        assert_eq!(rule, CoordinateRule::Lenient);
        let policy: AttributePolicy = true.into();
        assert_eq!(policy, AttributePolicy::Strict);
        let opts = ValidatorOptions {
            coordinate_rule: true.into(),
            attribute_policy: false.into(),
            ..Default::default()
        };
        assert_eq!(opts.coordinate_rule, CoordinateRule::Strict);
        assert_eq!(opts.attribute_policy, AttributePolicy::Warn);
    }
}
