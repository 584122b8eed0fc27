//! Route parameter constraints.
//!
//! A constraint is a pure predicate over one raw path segment. Constraints
//! never raise: a failed check removes the candidate route from matching.

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::error::{Result, RoutingError};

/// Trait for route parameter constraints.
pub trait RouteConstraint: Send + Sync + fmt::Debug {
    /// Returns whether the raw segment value satisfies this constraint.
    fn validate(&self, value: &str) -> bool;

    /// Returns a human readable description of this constraint.
    fn describe(&self) -> String;
}

/// A shared, type-erased constraint.
pub type SharedConstraint = Arc<dyn RouteConstraint>;

/// Primitive types a segment can be required to parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// Floating point number.
    Float,
    /// `true` or `false`, case-insensitive.
    Bool,
    /// A UUID in any of its textual forms.
    Guid,
    /// An RFC 3339 timestamp or an ISO date (`YYYY-MM-DD`).
    DateTime,
    /// ASCII letters only.
    Alpha,
}

impl PrimitiveKind {
    /// Returns the inline constraint name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Guid => "guid",
            Self::DateTime => "datetime",
            Self::Alpha => "alpha",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "float" | "double" | "decimal" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "guid" | "uuid" => Some(Self::Guid),
            "datetime" => Some(Self::DateTime),
            "alpha" => Some(Self::Alpha),
            _ => None,
        }
    }
}

/// Requires the segment to parse as a primitive type.
#[derive(Debug, Clone, Copy)]
pub struct TypeConstraint {
    kind: PrimitiveKind,
}

impl TypeConstraint {
    /// Creates a new type constraint.
    pub fn new(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    /// Returns the required primitive kind.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}

impl RouteConstraint for TypeConstraint {
    fn validate(&self, value: &str) -> bool {
        match self.kind {
            PrimitiveKind::Int => value.parse::<i32>().is_ok(),
            PrimitiveKind::Long => value.parse::<i64>().is_ok(),
            PrimitiveKind::Float => value.parse::<f64>().is_ok_and(f64::is_finite),
            PrimitiveKind::Bool => {
                value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
            }
            PrimitiveKind::Guid => uuid::Uuid::parse_str(value).is_ok(),
            PrimitiveKind::DateTime => is_datetime(value),
            PrimitiveKind::Alpha => {
                !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
            }
        }
    }

    fn describe(&self) -> String {
        format!("must be a valid {}", self.kind.as_str())
    }
}

/// Accepts RFC 3339, a bare date, and chrono's `Display` output for
/// `DateTime<Utc>` and `DateTime<FixedOffset>`.
fn is_datetime(value: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(value).is_ok()
        || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || value.strip_suffix(" UTC").is_some_and(|naive| {
            chrono::NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        })
        || chrono::DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f %:z").is_ok()
}

/// Requires the segment to be an integer within inclusive bounds.
#[derive(Debug, Clone, Copy)]
pub struct RangeConstraint {
    min: Option<i64>,
    max: Option<i64>,
}

impl RangeConstraint {
    /// Creates a new range constraint. `None` leaves that side unbounded.
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }
}

impl RouteConstraint for RangeConstraint {
    fn validate(&self, value: &str) -> bool {
        let Ok(num) = value.parse::<i64>() else {
            return false;
        };
        self.min.map_or(true, |min| num >= min) && self.max.map_or(true, |max| num <= max)
    }

    fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "must be an integer".to_string(),
        }
    }
}

/// Requires the segment length (in characters) to be within inclusive bounds.
#[derive(Debug, Clone, Copy)]
pub struct LengthConstraint {
    min: Option<usize>,
    max: Option<usize>,
}

impl LengthConstraint {
    /// Creates a new length constraint.
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Creates a constraint requiring exactly `len` characters.
    pub fn exact(len: usize) -> Self {
        Self::new(Some(len), Some(len))
    }
}

impl RouteConstraint for LengthConstraint {
    fn validate(&self, value: &str) -> bool {
        let len = value.chars().count();
        self.min.map_or(true, |min| len >= min) && self.max.map_or(true, |max| len <= max)
    }

    fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => format!("must be exactly {min} characters"),
            (Some(min), Some(max)) => format!("must be between {min} and {max} characters"),
            (Some(min), None) => format!("must be at least {min} characters"),
            (None, Some(max)) => format!("must be at most {max} characters"),
            (None, None) => "any length".to_string(),
        }
    }
}

/// Requires the whole segment to match a regular expression.
///
/// The expression is anchored at both ends and matched case-insensitively.
#[derive(Debug, Clone)]
pub struct RegexConstraint {
    source: String,
    pattern: Regex,
}

impl RegexConstraint {
    /// Compiles a new regex constraint.
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        let compiled = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            source: pattern.to_string(),
            pattern: compiled,
        })
    }
}

impl RouteConstraint for RegexConstraint {
    fn validate(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    fn describe(&self) -> String {
        format!("must match /{}/", self.source)
    }
}

/// Requires a non-blank segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredConstraint;

impl RouteConstraint for RequiredConstraint {
    fn validate(&self, value: &str) -> bool {
        !value.trim().is_empty()
    }

    fn describe(&self) -> String {
        "is required".to_string()
    }
}

/// Requires the segment to be one of a fixed set of values (case-insensitive).
#[derive(Debug, Clone)]
pub struct AllowedValuesConstraint {
    values: Vec<String>,
}

impl AllowedValuesConstraint {
    /// Creates a new allowed-values constraint.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl RouteConstraint for AllowedValuesConstraint {
    fn validate(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    fn describe(&self) -> String {
        format!("must be one of: {}", self.values.join(", "))
    }
}

/// Builds a constraint from its inline template syntax.
///
/// Accepted forms: `int`, `long`, `float`, `bool`, `guid`, `datetime`,
/// `alpha`, `required`, `range(min,max)`, `min(n)`, `max(n)`, `length(n)`,
/// `length(min,max)`, `minlength(n)`, `maxlength(n)`, `regex(expr)` and
/// `values(a|b|c)`.
///
/// # Example
///
/// ```
/// use axiom_routing::parse_constraint;
///
/// let c = parse_constraint("range(1,10)").unwrap();
/// assert!(c.validate("5"));
/// assert!(!c.validate("11"));
/// ```
pub fn parse_constraint(spec: &str) -> Result<Arc<dyn RouteConstraint>> {
    let invalid = |reason: &str| RoutingError::InvalidConstraint {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let (name, args) = match spec.find('(') {
        Some(open) => {
            let args = spec[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| invalid("missing closing parenthesis"))?;
            (&spec[..open], Some(args))
        }
        None => (spec, None),
    };
    let name = name.trim().to_ascii_lowercase();

    if let Some(kind) = PrimitiveKind::parse(&name) {
        if args.is_some() {
            return Err(invalid("type constraints take no arguments"));
        }
        return Ok(Arc::new(TypeConstraint::new(kind)));
    }

    match (name.as_str(), args) {
        ("required", None) => Ok(Arc::new(RequiredConstraint)),
        ("range", Some(args)) => {
            let (min, max) = two_args(args).ok_or_else(|| invalid("expected range(min,max)"))?;
            let min = parse_num::<i64>(min).ok_or_else(|| invalid("bad lower bound"))?;
            let max = parse_num::<i64>(max).ok_or_else(|| invalid("bad upper bound"))?;
            if min > max {
                return Err(invalid("lower bound exceeds upper bound"));
            }
            Ok(Arc::new(RangeConstraint::new(Some(min), Some(max))))
        }
        ("min", Some(arg)) => {
            let min = parse_num::<i64>(arg).ok_or_else(|| invalid("bad bound"))?;
            Ok(Arc::new(RangeConstraint::new(Some(min), None)))
        }
        ("max", Some(arg)) => {
            let max = parse_num::<i64>(arg).ok_or_else(|| invalid("bad bound"))?;
            Ok(Arc::new(RangeConstraint::new(None, Some(max))))
        }
        ("length", Some(args)) => {
            if let Some((min, max)) = two_args(args) {
                let min = parse_num::<usize>(min).ok_or_else(|| invalid("bad minimum length"))?;
                let max = parse_num::<usize>(max).ok_or_else(|| invalid("bad maximum length"))?;
                if min > max {
                    return Err(invalid("minimum length exceeds maximum length"));
                }
                Ok(Arc::new(LengthConstraint::new(Some(min), Some(max))))
            } else {
                let len = parse_num::<usize>(args).ok_or_else(|| invalid("bad length"))?;
                Ok(Arc::new(LengthConstraint::exact(len)))
            }
        }
        ("minlength", Some(arg)) => {
            let min = parse_num::<usize>(arg).ok_or_else(|| invalid("bad length"))?;
            Ok(Arc::new(LengthConstraint::new(Some(min), None)))
        }
        ("maxlength", Some(arg)) => {
            let max = parse_num::<usize>(arg).ok_or_else(|| invalid("bad length"))?;
            Ok(Arc::new(LengthConstraint::new(None, Some(max))))
        }
        ("regex", Some(expr)) => {
            if expr.is_empty() {
                return Err(invalid("empty expression"));
            }
            let constraint = RegexConstraint::new(expr).map_err(|e| invalid(&e.to_string()))?;
            Ok(Arc::new(constraint))
        }
        ("values", Some(list)) => {
            let values: Vec<&str> = list.split('|').map(str::trim).collect();
            if values.iter().any(|v| v.is_empty()) {
                return Err(invalid("empty allowed value"));
            }
            Ok(Arc::new(AllowedValuesConstraint::new(values)))
        }
        _ => Err(invalid("unknown constraint")),
    }
}

fn two_args(args: &str) -> Option<(&str, &str)> {
    args.split_once(',')
}

fn parse_num<T: std::str::FromStr>(s: &str) -> Option<T> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_constraints() {
        let int = TypeConstraint::new(PrimitiveKind::Int);
        assert!(int.validate("42"));
        assert!(int.validate("-7"));
        assert!(!int.validate("4.2"));
        assert!(!int.validate("99999999999"));

        let long = TypeConstraint::new(PrimitiveKind::Long);
        assert!(long.validate("99999999999"));

        let guid = TypeConstraint::new(PrimitiveKind::Guid);
        assert!(guid.validate("123e4567-e89b-12d3-a456-426614174000"));
        assert!(!guid.validate("not-a-guid"));

        let boolean = TypeConstraint::new(PrimitiveKind::Bool);
        assert!(boolean.validate("True"));
        assert!(boolean.validate("false"));
        assert!(!boolean.validate("yes"));

        let date = TypeConstraint::new(PrimitiveKind::DateTime);
        assert!(date.validate("2024-01-15"));
        assert!(date.validate("2024-01-15T10:30:00Z"));
        assert!(date.validate("2024-01-15 10:30:00 UTC"));
        assert!(date.validate("2024-01-15 10:30:00.250 UTC"));
        assert!(date.validate("2024-01-15 10:30:00 +01:00"));
        assert!(!date.validate("2024-01-15 10:30:00"));
        assert!(!date.validate("yesterday"));

        let alpha = TypeConstraint::new(PrimitiveKind::Alpha);
        assert!(alpha.validate("abc"));
        assert!(!alpha.validate("abc1"));
    }

    #[test]
    fn test_range_constraint() {
        let c = RangeConstraint::new(Some(1), Some(100));
        assert!(c.validate("1"));
        assert!(c.validate("100"));
        assert!(!c.validate("0"));
        assert!(!c.validate("101"));
        assert!(!c.validate("ten"));
        assert_eq!(c.describe(), "must be between 1 and 100");
    }

    #[test]
    fn test_length_constraint() {
        let c = LengthConstraint::new(Some(2), Some(4));
        assert!(c.validate("ab"));
        assert!(c.validate("abcd"));
        assert!(!c.validate("a"));
        assert!(!c.validate("abcde"));
        assert_eq!(LengthConstraint::exact(3).describe(), "must be exactly 3 characters");
    }

    #[test]
    fn test_regex_constraint_is_anchored() {
        let c = RegexConstraint::new(r"[a-z]+-\d+").unwrap();
        assert!(c.validate("item-42"));
        assert!(c.validate("ITEM-42"));
        assert!(!c.validate("xx item-42 yy"));
    }

    #[test]
    fn test_required_and_allowed_values() {
        assert!(RequiredConstraint.validate("x"));
        assert!(!RequiredConstraint.validate("  "));

        let c = AllowedValuesConstraint::new(["draft", "published"]);
        assert!(c.validate("Draft"));
        assert!(!c.validate("archived"));
    }

    #[test]
    fn test_parse_constraint() {
        assert!(parse_constraint("guid").unwrap().validate("123e4567-e89b-12d3-a456-426614174000"));
        assert!(parse_constraint("min(10)").unwrap().validate("10"));
        assert!(!parse_constraint("max(10)").unwrap().validate("11"));
        assert!(parse_constraint("length(3)").unwrap().validate("abc"));
        assert!(parse_constraint("maxlength(3)").unwrap().validate("ab"));
        assert!(parse_constraint(r"regex(^\d{3}$)").unwrap().validate("123"));
        assert!(parse_constraint("values(a|b)").unwrap().validate("B"));
    }

    #[test]
    fn test_parse_constraint_errors() {
        assert!(matches!(
            parse_constraint("bogus"),
            Err(RoutingError::InvalidConstraint { .. })
        ));
        assert!(parse_constraint("range(10,1)").is_err());
        assert!(parse_constraint("range(1").is_err());
        assert!(parse_constraint("int(3)").is_err());
        assert!(parse_constraint("regex([)").is_err());
        assert!(parse_constraint("values(a||b)").is_err());
    }
}
