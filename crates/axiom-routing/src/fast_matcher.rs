//! Multi-route matching over a fixed endpoint set.
//!
//! Endpoints are indexed once at construction: purely literal templates by
//! their lower-cased path, parameterized templates by every segment count
//! they can accept. A lookup only inspects the endpoints that can possibly
//! accept the path and ranks the survivors:
//!
//! 1. more literal segments wins;
//! 2. then, at the first position where they differ, a literal wins over
//!    a constrained parameter, which wins over an unconstrained one;
//! 3. then the endpoint that omitted fewer optional segments wins;
//! 4. then the endpoint registered first wins.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::cache::BoundedCache;
use crate::endpoint::RouteEndpoint;
use crate::error::{Result, RoutingError};
use crate::matcher::CompiledRoute;
use crate::path::{normalize_path, split_segments};
use crate::request::{Method, RouteParams};

/// Options for a [`FastRouteMatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatcherOptions {
    /// Maximum number of cached lookups (hits and misses). Zero disables caching.
    pub cache_capacity: usize,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            cache_capacity: 10_000,
        }
    }
}

impl MatcherOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache capacity.
    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

/// A successful match: the endpoint and its captured parameters.
#[derive(Debug, Clone)]
pub struct MatchResult {
    index: usize,
    endpoint: Arc<RouteEndpoint>,
    params: RouteParams,
}

impl MatchResult {
    /// Returns the matched endpoint.
    pub fn endpoint(&self) -> &RouteEndpoint {
        &self.endpoint
    }

    /// Returns the captured parameters in template order.
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Consumes the result, returning the captured parameters.
    pub fn into_params(self) -> RouteParams {
        self.params
    }

    /// Registration index of the matched endpoint.
    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    method: Option<Method>,
    path: String,
}

struct IndexedEndpoint {
    endpoint: Arc<RouteEndpoint>,
    route: CompiledRoute,
}

/// Resolves request paths against a fixed set of endpoints.
///
/// The index is immutable after construction; only the bounded cache is
/// written to during matching, so the matcher can be shared across threads.
///
/// # Example
///
/// ```
/// use axiom_routing::{FastRouteMatcher, Method, RouteEndpoint};
///
/// let matcher = FastRouteMatcher::new(vec![
///     RouteEndpoint::new(Method::Get, "/users/{id}").unwrap(),
///     RouteEndpoint::new(Method::Get, "/users/new").unwrap(),
/// ])
/// .unwrap();
///
/// let result = matcher.match_path("/users/new").unwrap();
/// assert_eq!(result.endpoint().template().source(), "/users/new");
/// assert!(result.params().is_empty());
/// ```
pub struct FastRouteMatcher {
    endpoints: Vec<IndexedEndpoint>,
    literal_index: HashMap<String, Vec<usize>>,
    length_index: HashMap<usize, Vec<usize>>,
    cache: BoundedCache<CacheKey, Option<MatchResult>>,
}

impl FastRouteMatcher {
    /// Builds a matcher with default options.
    pub fn new(endpoints: Vec<RouteEndpoint>) -> Result<Self> {
        Self::with_options(endpoints, MatcherOptions::default())
    }

    /// Builds a matcher.
    ///
    /// Fails when an endpoint constrains an undeclared parameter or when two
    /// endpoints share method, version and path shape.
    pub fn with_options(endpoints: Vec<RouteEndpoint>, options: MatcherOptions) -> Result<Self> {
        let mut indexed = Vec::with_capacity(endpoints.len());
        let mut literal_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut length_index: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut shapes = HashSet::new();

        for (idx, endpoint) in endpoints.into_iter().enumerate() {
            endpoint.validate()?;

            let route = CompiledRoute::compile(&endpoint);
            let shape = (
                endpoint.method(),
                endpoint.api_version().map(str::to_string),
                route.shape_key(),
            );
            if !shapes.insert(shape) {
                return Err(RoutingError::DuplicateRoute {
                    method: endpoint.method().to_string(),
                    template: endpoint.template().source().to_string(),
                });
            }

            if endpoint.template().is_literal() {
                literal_index
                    .entry(endpoint.template().shape_key())
                    .or_default()
                    .push(idx);
            } else {
                // A parameterized template never accepts the root path.
                for len in route.required_len().max(1)..=route.max_len() {
                    length_index.entry(len).or_default().push(idx);
                }
            }

            debug!(endpoint = %endpoint, route_type = endpoint.route_type_name(), "registered endpoint");
            indexed.push(IndexedEndpoint {
                endpoint: Arc::new(endpoint),
                route,
            });
        }

        debug!(
            endpoints = indexed.len(),
            cache_capacity = options.cache_capacity,
            "route matcher ready"
        );

        Ok(Self {
            endpoints: indexed,
            literal_index,
            length_index,
            cache: BoundedCache::new(options.cache_capacity),
        })
    }

    /// Matches a path against every endpoint regardless of method.
    pub fn match_path(&self, path: &str) -> Option<MatchResult> {
        self.lookup(None, path)
    }

    /// Matches a path against the endpoints registered for `method`.
    pub fn match_request(&self, method: Method, path: &str) -> Option<MatchResult> {
        self.lookup(Some(method), path)
    }

    /// Returns the endpoints in registration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &RouteEndpoint> {
        self.endpoints.iter().map(|e| e.endpoint.as_ref())
    }

    pub(crate) fn endpoint(&self, index: usize) -> &RouteEndpoint {
        &self.endpoints[index].endpoint
    }

    /// Empties the match cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("route match cache cleared");
    }

    /// Returns the number of cached lookups.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    fn lookup(&self, method: Option<Method>, path: &str) -> Option<MatchResult> {
        let normalized = normalize_path(path)?;
        let key = CacheKey {
            method,
            path: normalized.to_string(),
        };

        if let Some(cached) = self.cache.get(&key) {
            trace!(path = normalized, hit = cached.is_some(), "route cache hit");
            return cached;
        }

        let result = self.resolve(method, normalized);
        trace!(path = normalized, matched = result.is_some(), "route resolved");
        self.cache.insert(key, result.clone());
        result
    }

    fn resolve(&self, method: Option<Method>, normalized: &str) -> Option<MatchResult> {
        let segments = split_segments(normalized);
        let literal_key = normalized.to_ascii_lowercase();

        let candidates = self
            .literal_index
            .get(&literal_key)
            .into_iter()
            .flatten()
            .chain(self.length_index.get(&segments.len()).into_iter().flatten())
            .copied()
            .filter(|&idx| method.map_or(true, |m| self.endpoints[idx].endpoint.method() == m));

        let mut best: Option<(usize, RouteParams)> = None;
        for idx in candidates {
            let Some(params) = self.endpoints[idx].route.match_segments(&segments) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((current, _)) => {
                    self.compare(idx, *current, segments.len()) == Ordering::Greater
                }
            };
            if better {
                best = Some((idx, params));
            }
        }

        best.map(|(idx, params)| MatchResult {
            index: idx,
            endpoint: Arc::clone(&self.endpoints[idx].endpoint),
            params,
        })
    }

    /// Orders two matching endpoints; `Greater` means `a` is preferred.
    fn compare(&self, a: usize, b: usize, len: usize) -> Ordering {
        let ra = &self.endpoints[a].route;
        let rb = &self.endpoints[b].route;

        ra.literal_count()
            .cmp(&rb.literal_count())
            .then_with(|| {
                ra.ranks(len)
                    .zip(rb.ranks(len))
                    .map(|(x, y)| x.cmp(&y))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| (rb.max_len() - len).cmp(&(ra.max_len() - len)))
            .then_with(|| b.cmp(&a))
    }
}

impl std::fmt::Debug for FastRouteMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastRouteMatcher")
            .field("endpoints", &self.endpoints.len())
            .field("cache_size", &self.cache.len())
            .finish()
    }
}
