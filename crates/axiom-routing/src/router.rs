//! Request dispatch over a fixed set of endpoints.

use std::collections::HashMap;

use crate::descriptor::RouteValues;
use crate::endpoint::RouteEndpoint;
use crate::error::{Result, RouterError};
use crate::fast_matcher::{FastRouteMatcher, MatchResult, MatcherOptions};
use crate::query::QueryParams;
use crate::request::{Request, RouteParams};
use crate::template::RouteTemplate;
use crate::url::UrlGenerator;

/// A resolved request: the handler to run and everything bound from the request.
#[derive(Debug)]
pub struct Resolved<'a, H> {
    /// The handler registered for the endpoint.
    pub handler: &'a H,
    /// The matched endpoint.
    pub endpoint: &'a RouteEndpoint,
    /// Path parameters in template order.
    pub params: RouteParams,
    /// Parsed query string.
    pub query: &'a QueryParams,
}

/// Builder for a [`RouteTable`].
pub struct RouteTableBuilder<H> {
    routes: Vec<(RouteEndpoint, H)>,
    options: MatcherOptions,
}

impl<H> Default for RouteTableBuilder<H> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            options: MatcherOptions::default(),
        }
    }
}

impl<H> RouteTableBuilder<H> {
    /// Registers a handler for an endpoint.
    #[must_use]
    pub fn route(mut self, endpoint: RouteEndpoint, handler: H) -> Self {
        self.routes.push((endpoint, handler));
        self
    }

    /// Sets the matcher options.
    #[must_use]
    pub fn options(mut self, options: MatcherOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the table, failing on template or duplicate-route errors.
    pub fn build(self) -> Result<RouteTable<H>> {
        let (endpoints, handlers): (Vec<_>, Vec<_>) = self.routes.into_iter().unzip();

        let mut named = HashMap::new();
        for endpoint in &endpoints {
            if let Some(name) = endpoint.route_name() {
                named.insert(name.to_string(), endpoint.template().clone());
            }
        }

        let matcher = FastRouteMatcher::with_options(endpoints, self.options)?;
        Ok(RouteTable {
            matcher,
            handlers,
            named,
        })
    }
}

/// Pairs every endpoint with an application handler value.
///
/// The handler type is opaque to the table: a boxed async function, a
/// streaming handler tagged with its mode, or anything else the transport
/// adapter knows how to invoke.
///
/// # Example
///
/// ```
/// use axiom_routing::{Method, Request, RouteEndpoint, RouteTable};
///
/// let table = RouteTable::builder()
///     .route(RouteEndpoint::new(Method::Get, "/users/{id}").unwrap(), "get_user")
///     .route(RouteEndpoint::new(Method::Post, "/users").unwrap(), "create_user")
///     .build()
///     .unwrap();
///
/// let request = Request::get("/users/7?expand=true");
/// let resolved = table.resolve(&request).unwrap();
/// assert_eq!(*resolved.handler, "get_user");
/// assert_eq!(resolved.params.get("id"), Some("7"));
/// assert_eq!(resolved.query.get_value::<bool>("expand"), Some(true));
/// ```
pub struct RouteTable<H> {
    matcher: FastRouteMatcher,
    handlers: Vec<H>,
    named: HashMap<String, RouteTemplate>,
}

impl<H> RouteTable<H> {
    /// Starts building a table.
    pub fn builder() -> RouteTableBuilder<H> {
        RouteTableBuilder::default()
    }

    /// Returns the underlying matcher.
    pub fn matcher(&self) -> &FastRouteMatcher {
        &self.matcher
    }

    /// Resolves a request to its handler.
    ///
    /// Returns [`RouterError::MethodNotAllowed`] when the path matches an
    /// endpoint registered for another method.
    pub fn resolve<'a>(
        &'a self,
        request: &'a Request,
    ) -> std::result::Result<Resolved<'a, H>, RouterError> {
        if let Some(result) = self.matcher.match_request(request.method, &request.path) {
            return Ok(self.bind(result, request));
        }

        let err = if self.matcher.match_path(&request.path).is_some() {
            RouterError::MethodNotAllowed {
                method: request.method.to_string(),
                path: request.path.clone(),
            }
        } else {
            RouterError::NotFound {
                method: request.method.to_string(),
                path: request.path.clone(),
            }
        };
        Err(err)
    }

    /// Generates a path for a named endpoint.
    pub fn url_for(
        &self,
        name: &str,
        values: &RouteValues,
    ) -> std::result::Result<String, RouterError> {
        let template = self
            .named
            .get(name)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;
        Ok(UrlGenerator::expand(template, values)?)
    }

    fn bind<'a>(&'a self, result: MatchResult, request: &'a Request) -> Resolved<'a, H> {
        let idx = result.index();
        Resolved {
            handler: &self.handlers[idx],
            endpoint: self.matcher.endpoint(idx),
            params: result.into_params(),
            query: &request.query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoutingError;
    use crate::request::Method;

    fn table() -> RouteTable<&'static str> {
        RouteTable::builder()
            .route(RouteEndpoint::new(Method::Get, "/").unwrap(), "home")
            .route(
                RouteEndpoint::new(Method::Get, "/users/{id}")
                    .unwrap()
                    .name("user_detail"),
                "user",
            )
            .route(RouteEndpoint::new(Method::Get, "/users/new").unwrap(), "new_user")
            .build()
            .unwrap()
    }

    #[test]
    fn test_basic_routing() {
        let table = table();
        let home_request = Request::get("/");
        let resolved = table.resolve(&home_request).unwrap();
        assert_eq!(*resolved.handler, "home");

        let new_request = Request::get("/users/new");
        let resolved = table.resolve(&new_request).unwrap();
        assert_eq!(*resolved.handler, "new_user");
    }

    #[test]
    fn test_path_params() {
        let table = table();
        let user_request = Request::get("/users/123");
        let resolved = table.resolve(&user_request).unwrap();
        assert_eq!(*resolved.handler, "user");
        assert_eq!(resolved.params.get("id"), Some("123"));
        assert_eq!(resolved.endpoint.template().source(), "/users/{id}");
    }

    #[test]
    fn test_not_found() {
        let table = table();
        assert!(matches!(
            table.resolve(&Request::get("/nonexistent")),
            Err(RouterError::NotFound { .. })
        ));
    }

    #[test]
    fn test_method_not_allowed() {
        let table = table();
        assert!(matches!(
            table.resolve(&Request::post("/users/1")),
            Err(RouterError::MethodNotAllowed { .. })
        ));
    }

    #[test]
    fn test_named_route() {
        let table = table();
        let url = table.url_for("user_detail", &RouteValues::new().value("id", 42));
        assert_eq!(url.unwrap(), "/users/42");
        assert!(matches!(
            table.url_for("missing", &RouteValues::new()),
            Err(RouterError::RouteNotFound(_))
        ));
        assert!(matches!(
            table.url_for("user_detail", &RouteValues::new()),
            Err(RouterError::Routing(RoutingError::MissingParameter(_)))
        ));
    }
}
