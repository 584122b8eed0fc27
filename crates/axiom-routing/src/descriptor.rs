//! Route descriptors supplied by the embedding application.

use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::constraint::PrimitiveKind;

/// Declared type of a route parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeHint {
    /// Free-form text.
    #[default]
    String,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// Floating point number.
    Float,
    /// Boolean.
    Bool,
    /// UUID.
    Guid,
    /// Timestamp or date.
    DateTime,
}

impl TypeHint {
    /// Returns the primitive kind a segment must parse as, if any.
    pub fn primitive(self) -> Option<PrimitiveKind> {
        match self {
            Self::String => None,
            Self::Int => Some(PrimitiveKind::Int),
            Self::Long => Some(PrimitiveKind::Long),
            Self::Float => Some(PrimitiveKind::Float),
            Self::Bool => Some(PrimitiveKind::Bool),
            Self::Guid => Some(PrimitiveKind::Guid),
            Self::DateTime => Some(PrimitiveKind::DateTime),
        }
    }
}

/// One declared parameter of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub type_hint: TypeHint,
    /// Whether the parameter has a default value (and may be omitted).
    pub has_default: bool,
    /// Inline constraint spec applied when an endpoint is built.
    pub constraint: Option<String>,
}

impl ParameterDescriptor {
    /// Creates a required string parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: TypeHint::String,
            has_default: false,
            constraint: None,
        }
    }

    /// Sets the declared type.
    #[must_use]
    pub fn typed(mut self, type_hint: TypeHint) -> Self {
        self.type_hint = type_hint;
        self
    }

    /// Marks the parameter as having a default value.
    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Attaches an inline constraint spec.
    #[must_use]
    pub fn constraint(mut self, spec: impl Into<String>) -> Self {
        self.constraint = Some(spec.into());
        self
    }
}

/// The static shape of a typed route.
///
/// # Example
///
/// ```
/// use axiom_routing::{ParameterDescriptor, RouteDescriptor, TypeHint};
///
/// let descriptor = RouteDescriptor::new("Order")
///     .param(ParameterDescriptor::new("userId").typed(TypeHint::Guid))
///     .param(ParameterDescriptor::new("id").typed(TypeHint::Int));
/// assert_eq!(descriptor.parameters.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Simple type name of the route.
    pub name: String,
    /// Enclosing scopes, outermost first.
    pub scopes: Vec<String>,
    /// Constructor parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Explicit template overriding the synthesized one.
    pub template: Option<String>,
    /// Arbitrary metadata carried onto endpoints built from this descriptor.
    pub metadata: HashMap<String, String>,
}

impl RouteDescriptor {
    /// Creates a descriptor with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an enclosing scope. Scopes are added outermost first.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds a parameter.
    #[must_use]
    pub fn param(mut self, param: ParameterDescriptor) -> Self {
        self.parameters.push(param);
        self
    }

    /// Sets an explicit template.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the fully qualified name (`Scope.Inner.Name`).
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        parts.push(&self.name);
        parts.join(".")
    }
}

/// The runtime values of a route instance, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues {
    values: Vec<(String, Option<String>)>,
}

impl RouteValues {
    /// Creates an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a present value.
    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.values.push((name.into(), Some(value.to_string())));
        self
    }

    /// Adds a timestamp in RFC 3339 form.
    ///
    /// Prefer this over [`value`](Self::value) for date-time parameters: the
    /// RFC 3339 text parses back with `str::parse::<DateTime<_>>()`.
    #[must_use]
    pub fn datetime<Tz>(mut self, name: impl Into<String>, value: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.values.push((name.into(), Some(value.to_rfc3339())));
        self
    }

    /// Adds a value that may be absent.
    #[must_use]
    pub fn optional<V: Display>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.values
            .push((name.into(), value.map(|v| v.to_string())));
        self
    }

    /// Returns the string form of the named value, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_deref())
    }

    /// Returns an iterator over the values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }
}

/// A strongly typed route.
///
/// Implemented by the application for each route type; the routing core
/// only needs the shape and, for URL generation, the instance's values.
///
/// # Example
///
/// ```
/// use axiom_routing::{ParameterDescriptor, Route, RouteDescriptor, RouteValues, TypeHint};
///
/// struct GetUser {
///     id: i64,
/// }
///
/// impl Route for GetUser {
///     fn descriptor() -> RouteDescriptor {
///         RouteDescriptor::new("GetUser").param(ParameterDescriptor::new("id").typed(TypeHint::Long))
///     }
///
///     fn route_values(&self) -> RouteValues {
///         RouteValues::new().value("id", self.id)
///     }
/// }
/// ```
pub trait Route {
    /// Returns the static descriptor for this route type.
    fn descriptor() -> RouteDescriptor
    where
        Self: Sized;

    /// Returns this instance's parameter values.
    fn route_values(&self) -> RouteValues;
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_datetime_value_is_rfc3339() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let values = RouteValues::new().datetime("at", &at);
        assert_eq!(values.get("at"), Some("2024-01-15T10:30:00+00:00"));
    }

    #[test]
    fn test_qualified_name() {
        let d = RouteDescriptor::new("Detail").scope("Api").scope("Orders");
        assert_eq!(d.qualified_name(), "Api.Orders.Detail");
    }

    #[test]
    fn test_route_values() {
        let values = RouteValues::new()
            .value("id", 7)
            .optional::<&str>("tab", None)
            .optional("page", Some(2));
        assert_eq!(values.get("id"), Some("7"));
        assert_eq!(values.get("ID"), Some("7"));
        assert_eq!(values.get("tab"), None);
        assert_eq!(values.get("page"), Some("2"));
        assert_eq!(values.iter().count(), 3);
    }

    #[test]
    fn test_type_hint_primitive() {
        assert_eq!(TypeHint::String.primitive(), None);
        assert_eq!(TypeHint::Guid.primitive(), Some(PrimitiveKind::Guid));
    }
}
