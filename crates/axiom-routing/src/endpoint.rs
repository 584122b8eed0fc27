//! Registered route endpoints.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::constraint::{parse_constraint, RouteConstraint, SharedConstraint, TypeConstraint};
use crate::descriptor::RouteDescriptor;
use crate::error::{Result, RoutingError};
use crate::generator::TemplateGenerator;
use crate::request::Method;
use crate::template::RouteTemplate;

/// A route template bound to a method, a route type and its constraints.
///
/// Endpoints are built once at startup and handed to a
/// [`FastRouteMatcher`](crate::FastRouteMatcher), which owns them from then on.
#[derive(Clone)]
pub struct RouteEndpoint {
    template: RouteTemplate,
    method: Method,
    route_type: String,
    name: Option<String>,
    version: Option<String>,
    constraints: Vec<(String, SharedConstraint)>,
    metadata: HashMap<String, String>,
}

impl RouteEndpoint {
    /// Creates an endpoint from a template string.
    ///
    /// Inline constraints (`{id:guid}`) become registered constraints.
    pub fn new(method: Method, template: &str) -> Result<Self> {
        let template = RouteTemplate::parse(template)?;
        let mut constraints = Vec::new();
        for param in template.parameters() {
            if let Some(spec) = &param.constraint {
                constraints.push((param.name.clone(), parse_constraint(spec)?));
            }
        }
        Ok(Self {
            route_type: template.source().to_string(),
            template,
            method,
            name: None,
            version: None,
            constraints,
            metadata: HashMap::new(),
        })
    }

    /// Creates an endpoint for a typed route descriptor.
    ///
    /// Parameters with a non-string type hint get the matching type
    /// constraint; descriptor constraint specs are added as well.
    pub fn from_descriptor(method: Method, descriptor: &RouteDescriptor) -> Result<Self> {
        let template = TemplateGenerator::generate(descriptor)?;
        let mut endpoint = Self::new(method, &template)?.route_type(descriptor.qualified_name());

        for param in &descriptor.parameters {
            if let Some(kind) = param.type_hint.primitive() {
                endpoint = endpoint.constraint(&param.name, TypeConstraint::new(kind));
            }
            if let Some(spec) = &param.constraint {
                endpoint
                    .constraints
                    .push((param.name.clone(), parse_constraint(spec)?));
            }
        }
        endpoint.metadata.extend(descriptor.metadata.clone());
        Ok(endpoint)
    }

    /// Sets the route type identity.
    #[must_use]
    pub fn route_type(mut self, route_type: impl Into<String>) -> Self {
        self.route_type = route_type.into();
        self
    }

    /// Sets the route name used for reverse lookup.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Registers a constraint for a parameter.
    ///
    /// A parameter may carry several constraints; all of them must pass.
    #[must_use]
    pub fn constraint(
        mut self,
        param: impl Into<String>,
        constraint: impl RouteConstraint + 'static,
    ) -> Self {
        self.constraints.push((param.into(), Arc::new(constraint)));
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the parsed template.
    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the route type identity.
    pub fn route_type_name(&self) -> &str {
        &self.route_type
    }

    /// Returns the route name, if any.
    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the API version, if any.
    pub fn api_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns a metadata value.
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Returns the constraints registered for a parameter.
    pub fn constraints_for<'a>(
        &'a self,
        param: &'a str,
    ) -> impl Iterator<Item = &'a SharedConstraint> + 'a {
        self.constraints
            .iter()
            .filter(move |(name, _)| name.eq_ignore_ascii_case(param))
            .map(|(_, c)| c)
    }

    /// Returns whether the parameter has at least one constraint.
    pub fn is_constrained(&self, param: &str) -> bool {
        self.constraints_for(param).next().is_some()
    }

    /// Checks that every constraint names a declared parameter.
    pub(crate) fn validate(&self) -> Result<()> {
        for (name, _) in &self.constraints {
            let declared = self
                .template
                .parameter_names()
                .any(|p| p.eq_ignore_ascii_case(name));
            if !declared {
                return Err(RoutingError::UnknownParameter {
                    template: self.template.source().to_string(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for RouteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEndpoint")
            .field("method", &self.method)
            .field("template", &self.template.source())
            .field("route_type", &self.route_type)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("constraints", &self.constraints.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for RouteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.template)
    }
}
