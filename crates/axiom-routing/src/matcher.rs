//! Single-route matching.

use crate::constraint::SharedConstraint;
use crate::endpoint::RouteEndpoint;
use crate::error::Result;
use crate::path::{decode_segment, normalize_path, split_segments};
use crate::request::{Method, RouteParams};
use crate::template::Segment;

/// Match rank of one path position; higher is more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum SegmentRank {
    Unconstrained,
    Constrained,
    Literal,
}

#[derive(Debug, Clone)]
enum CompiledSegment {
    Literal(String),
    Parameter {
        name: String,
        constraints: Vec<SharedConstraint>,
    },
}

/// A template with its constraints resolved per segment.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRoute {
    segments: Vec<CompiledSegment>,
    required: usize,
    literals: usize,
}

impl CompiledRoute {
    pub(crate) fn compile(endpoint: &RouteEndpoint) -> Self {
        let template = endpoint.template();
        let segments = template
            .segments()
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => CompiledSegment::Literal(text.clone()),
                Segment::Parameter(p) => CompiledSegment::Parameter {
                    name: p.name.clone(),
                    constraints: endpoint.constraints_for(&p.name).cloned().collect(),
                },
            })
            .collect();
        Self {
            segments,
            required: template.required_len(),
            literals: template.literal_count(),
        }
    }

    /// Number of segments a path must have at least.
    pub(crate) fn required_len(&self) -> usize {
        self.required
    }

    /// Number of segments a path may have at most.
    pub(crate) fn max_len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn literal_count(&self) -> usize {
        self.literals
    }

    /// Returns a key identifying the accepted paths: literals lower-cased,
    /// parameters by their constraint descriptions and optionality.
    pub(crate) fn shape_key(&self) -> String {
        let mut key = String::new();
        for (pos, segment) in self.segments.iter().enumerate() {
            key.push('/');
            match segment {
                CompiledSegment::Literal(text) => key.push_str(&text.to_ascii_lowercase()),
                CompiledSegment::Parameter { constraints, .. } => {
                    let mut rules: Vec<String> = constraints.iter().map(|c| c.describe()).collect();
                    rules.sort();
                    rules.dedup();
                    key.push('{');
                    key.push_str(&rules.join(";"));
                    if pos >= self.required {
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

    /// Rank of each of the first `len` positions.
    pub(crate) fn ranks(&self, len: usize) -> impl Iterator<Item = SegmentRank> + '_ {
        self.segments.iter().take(len).map(|segment| match segment {
            CompiledSegment::Literal(_) => SegmentRank::Literal,
            CompiledSegment::Parameter { constraints, .. } if !constraints.is_empty() => {
                SegmentRank::Constrained
            }
            CompiledSegment::Parameter { .. } => SegmentRank::Unconstrained,
        })
    }

    /// Matches raw path segments, returning the captured parameters.
    ///
    /// Literals compare ASCII case-insensitively against the raw segment;
    /// parameter values are percent-decoded before constraints run.
    pub(crate) fn match_segments(&self, path: &[&str]) -> Option<RouteParams> {
        if path.len() < self.required || path.len() > self.segments.len() {
            return None;
        }
        // The root path only matches the root template.
        if path.is_empty() && !self.segments.is_empty() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, raw) in self.segments.iter().zip(path) {
            match segment {
                CompiledSegment::Literal(text) => {
                    if !raw.eq_ignore_ascii_case(text) {
                        return None;
                    }
                }
                CompiledSegment::Parameter { name, constraints } => {
                    if raw.is_empty() {
                        return None;
                    }
                    let value = decode_segment(raw);
                    if !constraints.iter().all(|c| c.validate(&value)) {
                        return None;
                    }
                    params.insert(name.as_str(), value.into_owned());
                }
            }
        }
        Some(params)
    }
}

/// Matches paths against a single route template.
///
/// This is the linear counterpart of [`FastRouteMatcher`](crate::FastRouteMatcher)
/// for callers that only care about one route type.
///
/// # Example
///
/// ```
/// use axiom_routing::RouteMatcher;
///
/// let matcher = RouteMatcher::new("/users/{id:int}").unwrap();
/// let params = matcher.matches("/Users/42/").unwrap();
/// assert_eq!(params.get("id"), Some("42"));
/// assert!(matcher.matches("/users/abc").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    route: CompiledRoute,
}

impl RouteMatcher {
    /// Creates a matcher for a template string with inline constraints.
    pub fn new(template: &str) -> Result<Self> {
        let endpoint = RouteEndpoint::new(Method::Get, template)?;
        Ok(Self::for_endpoint(&endpoint))
    }

    /// Creates a matcher from an endpoint and its registered constraints.
    pub fn for_endpoint(endpoint: &RouteEndpoint) -> Self {
        Self {
            route: CompiledRoute::compile(endpoint),
        }
    }

    /// Matches a path, returning captured parameters in template order.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let normalized = normalize_path(path)?;
        self.route.match_segments(&split_segments(normalized))
    }

    /// Returns whether the path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.matches(path).is_some()
    }
}
