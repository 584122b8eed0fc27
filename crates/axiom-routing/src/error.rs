//! Error types for routing.

use thiserror::Error;

/// Errors raised while building or using routes.
///
/// Template errors are detected when endpoints are registered and are
/// fatal to startup. Per-request conditions (no match, constraint miss)
/// are never reported through this type.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The template string could not be parsed.
    #[error("invalid route template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// An optional parameter appears before a required segment.
    #[error("optional parameter `{name}` in `{template}` must be part of a trailing run")]
    InteriorOptional { template: String, name: String },

    /// A parameter name is declared twice in one template.
    #[error("duplicate parameter `{name}` in `{template}`")]
    DuplicateParameter { template: String, name: String },

    /// An explicit template does not declare exactly the route's parameters.
    #[error("template `{template}` does not match the parameters of route `{route}`")]
    TemplateMismatch { route: String, template: String },

    /// An inline constraint spec could not be understood.
    #[error("invalid constraint `{spec}`: {reason}")]
    InvalidConstraint { spec: String, reason: String },

    /// A constraint was registered for a parameter the template does not declare.
    #[error("constraint registered for unknown parameter `{name}` in `{template}`")]
    UnknownParameter { template: String, name: String },

    /// Two endpoints resolve to the same method, version and path shape.
    #[error("duplicate route: {method} {template}")]
    DuplicateRoute { method: String, template: String },

    /// A required route value was not supplied when generating a URL.
    #[error("missing value for route parameter `{0}`")]
    MissingParameter(String),

    /// The query bag could not be flattened into `key=value` pairs.
    #[error("cannot serialize query: {0}")]
    QuerySerialization(String),
}

impl RoutingError {
    pub(crate) fn invalid_template(template: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors produced when dispatching a request through a
/// [`RouteTable`](crate::RouteTable).
#[derive(Debug, Error)]
pub enum RouterError {
    /// No route matched the request.
    #[error("no route matched: {method} {path}")]
    NotFound { method: String, path: String },

    /// A route matched the path but not the method.
    #[error("method not allowed: {method} for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Route name not found.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// Building a URL for a named route failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),
}

/// Result type alias for routing operations.
pub type Result<T> = std::result::Result<T, RoutingError>;
