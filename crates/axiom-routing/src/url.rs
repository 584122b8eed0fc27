//! URL generation from route instances.

use serde::Serialize;
use serde_json::Value;

use crate::descriptor::{Route, RouteValues};
use crate::error::{Result, RoutingError};
use crate::generator::TemplateGenerator;
use crate::template::{RouteTemplate, Segment};

/// Builds canonical URLs from typed route instances.
///
/// Path values and query keys/values are percent-encoded independently;
/// a space becomes `%20`. Boolean query values serialize as `true`/`false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlGenerator;

impl UrlGenerator {
    /// Generates the path for a route instance.
    ///
    /// # Example
    ///
    /// ```
    /// use axiom_routing::{ParameterDescriptor, Route, RouteDescriptor, RouteValues, UrlGenerator};
    ///
    /// struct Search {
    ///     term: String,
    /// }
    ///
    /// impl Route for Search {
    ///     fn descriptor() -> RouteDescriptor {
    ///         RouteDescriptor::new("Search").param(ParameterDescriptor::new("term"))
    ///     }
    ///
    ///     fn route_values(&self) -> RouteValues {
    ///         RouteValues::new().value("term", &self.term)
    ///     }
    /// }
    ///
    /// let url = UrlGenerator::generate_url(&Search { term: "a b&c".into() }).unwrap();
    /// assert_eq!(url, "/search/a%20b%26c");
    /// ```
    pub fn generate_url<R: Route>(route: &R) -> Result<String> {
        let template = TemplateGenerator::template(&R::descriptor())?;
        Self::expand(&template, &route.route_values())
    }

    /// Generates the path for a route instance followed by a query string.
    ///
    /// The bag is any serializable value that flattens to an object:
    /// scalars become one `key=value` pair, sequences repeat the key once
    /// per element, `null` fields are skipped. A `None` bag, or one with no
    /// pairs, yields the bare path.
    pub fn generate_url_with_query<R, Q>(route: &R, query: Option<&Q>) -> Result<String>
    where
        R: Route,
        Q: Serialize + ?Sized,
    {
        let mut url = Self::generate_url(route)?;
        if let Some(bag) = query {
            let query = Self::query_string(bag)?;
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
        }
        Ok(url)
    }

    /// Substitutes route values into a template.
    ///
    /// An absent (or empty) optional value ends the path: it and every
    /// optional segment after it are dropped. A missing required value is
    /// an error.
    pub fn expand(template: &RouteTemplate, values: &RouteValues) -> Result<String> {
        let mut path = String::new();
        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => {
                    path.push('/');
                    path.push_str(text);
                }
                Segment::Parameter(param) => match values.get(&param.name) {
                    Some(value) if !value.is_empty() => {
                        path.push('/');
                        path.push_str(&urlencoding::encode(value));
                    }
                    _ if param.optional => break,
                    _ => return Err(RoutingError::MissingParameter(param.name.clone())),
                },
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Builds an encoded `k=v&k=v` query string from a serializable bag.
    pub fn query_string<Q: Serialize + ?Sized>(bag: &Q) -> Result<String> {
        let value = serde_json::to_value(bag)
            .map_err(|e| RoutingError::QuerySerialization(e.to_string()))?;

        let fields = match value {
            Value::Null => return Ok(String::new()),
            Value::Object(fields) => fields,
            other => {
                return Err(RoutingError::QuerySerialization(format!(
                    "expected a map or struct, got {}",
                    kind(&other)
                )))
            }
        };

        let mut pairs = Vec::new();
        for (key, value) in &fields {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = scalar(key, item)? {
                            pairs.push(pair(key, &text));
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar(key, other)? {
                        pairs.push(pair(key, &text));
                    }
                }
            }
        }
        Ok(pairs.join("&"))
    }
}

fn pair(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

fn scalar(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(RoutingError::QuerySerialization(format!(
            "field `{key}` holds a nested {}",
            kind(value)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
