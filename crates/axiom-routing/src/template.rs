//! Route template parsing.

use std::collections::HashSet;
use std::fmt;

use crate::constraint::parse_constraint;
use crate::error::{Result, RoutingError};

/// Characters that may not appear in a literal segment.
const RESERVED: &[char] = &['?', '#', '&', '%', '{', '}', ' '];

/// A parameter segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSegment {
    /// Parameter name, as written in the template.
    pub name: String,
    /// Whether the parameter may be omitted from the path.
    pub optional: bool,
    /// Inline constraint spec (e.g. `guid`, `range(1,10)`).
    pub constraint: Option<String>,
}

/// A segment in a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal path segment, matched case-insensitively.
    Literal(String),
    /// A parameter segment (e.g. `{id}`).
    Parameter(ParameterSegment),
}

impl Segment {
    /// Returns whether this is a literal segment.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns the parameter, if this is a parameter segment.
    pub fn as_parameter(&self) -> Option<&ParameterSegment> {
        match self {
            Self::Parameter(p) => Some(p),
            Self::Literal(_) => None,
        }
    }
}

/// A parsed, validated route template such as `/order/{userId}/{id?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Parses and validates a template string.
    ///
    /// # Example
    ///
    /// ```
    /// use axiom_routing::RouteTemplate;
    ///
    /// let template = RouteTemplate::parse("/files/{path}/{version?}").unwrap();
    /// assert_eq!(template.len(), 3);
    /// assert_eq!(template.required_len(), 2);
    /// assert_eq!(template.parameter_names().collect::<Vec<_>>(), ["path", "version"]);
    /// ```
    pub fn parse(template: &str) -> Result<Self> {
        let body = template
            .strip_prefix('/')
            .ok_or_else(|| RoutingError::invalid_template(template, "must start with `/`"))?;
        let body = body.strip_suffix('/').unwrap_or(body);

        let mut segments = Vec::new();
        if !body.is_empty() {
            for part in body.split('/') {
                segments.push(parse_segment(template, part)?);
            }
        }

        let mut seen = HashSet::new();
        let mut optional_run = None;
        for segment in &segments {
            match segment {
                Segment::Parameter(p) => {
                    if !seen.insert(p.name.to_ascii_lowercase()) {
                        return Err(RoutingError::DuplicateParameter {
                            template: template.to_string(),
                            name: p.name.clone(),
                        });
                    }
                    if p.optional {
                        optional_run.get_or_insert(p.name.as_str());
                    } else if let Some(name) = optional_run {
                        return Err(RoutingError::InteriorOptional {
                            template: template.to_string(),
                            name: name.to_string(),
                        });
                    }
                }
                Segment::Literal(_) => {
                    if let Some(name) = optional_run {
                        return Err(RoutingError::InteriorOptional {
                            template: template.to_string(),
                            name: name.to_string(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Returns the template string this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the total number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns whether this is the root template `/`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments that must be present in a path.
    pub fn required_len(&self) -> usize {
        self.segments
            .iter()
            .take_while(|s| s.as_parameter().map_or(true, |p| !p.optional))
            .count()
    }

    /// Returns the number of literal segments.
    pub fn literal_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_literal()).count()
    }

    /// Returns whether every segment is a literal.
    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(Segment::is_literal)
    }

    /// Returns the parameter segments in template order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterSegment> {
        self.segments.iter().filter_map(Segment::as_parameter)
    }

    /// Returns the parameter names in template order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters().map(|p| p.name.as_str())
    }

    /// Returns the lower-cased path with parameters rendered as `{}` or
    /// `{?}`. Keys the exact-match index of purely literal templates.
    pub(crate) fn shape_key(&self) -> String {
        let mut key = String::new();
        for segment in &self.segments {
            key.push('/');
            match segment {
                Segment::Literal(text) => key.push_str(&text.to_ascii_lowercase()),
                Segment::Parameter(p) => {
                    key.push('{');
                    if p.optional {
                        key.push('?');
                    }
                    key.push('}');
                }
            }
        }
        if key.is_empty() {
            key.push('/');
        }
        key
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segment(template: &str, part: &str) -> Result<Segment> {
    if part.is_empty() {
        return Err(RoutingError::invalid_template(template, "empty path segment"));
    }

    let Some(inner) = part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        if let Some(c) = part.chars().find(|c| RESERVED.contains(c)) {
            return Err(RoutingError::invalid_template(
                template,
                format!("reserved character `{c}` in literal segment `{part}`"),
            ));
        }
        return Ok(Segment::Literal(part.to_string()));
    };

    let (inner, optional) = match inner.strip_suffix('?') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let (name, constraint) = match inner.split_once(':') {
        Some((name, constraint)) => (name, Some(constraint)),
        None => (inner, None),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(RoutingError::invalid_template(
            template,
            format!("segment `{part}` must be a single literal or a single `{{name}}` parameter"),
        ));
    }

    if let Some(spec) = constraint {
        // Validated here so a bad spec fails at registration.
        parse_constraint(spec)?;
    }

    Ok(Segment::Parameter(ParameterSegment {
        name: name.to_string(),
        optional,
        constraint: constraint.map(str::to_string),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_and_params() {
        let t = RouteTemplate::parse("/order/{userId}/{id}").unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.literal_count(), 1);
        assert_eq!(t.parameter_names().collect::<Vec<_>>(), ["userId", "id"]);
        assert!(!t.is_literal());
    }

    #[test]
    fn test_parse_root() {
        let t = RouteTemplate::parse("/").unwrap();
        assert!(t.is_empty());
        assert!(t.is_literal());
        assert_eq!(t.shape_key(), "/");
    }

    #[test]
    fn test_parse_inline_constraint_and_optional() {
        let t = RouteTemplate::parse("/users/{id:guid}/{tab:values(a|b)?}").unwrap();
        let params: Vec<_> = t.parameters().collect();
        assert_eq!(params[0].constraint.as_deref(), Some("guid"));
        assert!(!params[0].optional);
        assert_eq!(params[1].constraint.as_deref(), Some("values(a|b)"));
        assert!(params[1].optional);
        assert_eq!(t.required_len(), 2);
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let t = RouteTemplate::parse("/users/").unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_rejects_missing_leading_slash() {
        assert!(matches!(
            RouteTemplate::parse("users"),
            Err(RoutingError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_rejects_interior_optional() {
        assert!(matches!(
            RouteTemplate::parse("/files/{path?}/{version}"),
            Err(RoutingError::InteriorOptional { .. })
        ));
        assert!(matches!(
            RouteTemplate::parse("/files/{path?}/latest"),
            Err(RoutingError::InteriorOptional { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_parameter() {
        assert!(matches!(
            RouteTemplate::parse("/a/{id}/b/{ID}"),
            Err(RoutingError::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_reserved_and_mixed_segments() {
        assert!(RouteTemplate::parse("/a&b").is_err());
        assert!(RouteTemplate::parse("/a b").is_err());
        assert!(RouteTemplate::parse("/user{id}").is_err());
        assert!(RouteTemplate::parse("/{a}{b}").is_err());
        assert!(RouteTemplate::parse("/a//b").is_err());
        assert!(RouteTemplate::parse("/{id:nope}").is_err());
    }
}
