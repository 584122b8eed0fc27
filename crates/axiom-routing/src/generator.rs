//! Route template generation from descriptors.

use std::collections::HashSet;

use crate::descriptor::RouteDescriptor;
use crate::error::{Result, RoutingError};
use crate::template::RouteTemplate;

/// Derives canonical template strings from route descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    /// Generates the template for a descriptor.
    ///
    /// An explicit template is returned verbatim once it is checked to
    /// declare exactly the descriptor's parameters. Otherwise the template
    /// is synthesized from the lower-cased scopes and type name followed by
    /// one `{name}` segment per parameter (`{name?}` when it has a default).
    ///
    /// # Example
    ///
    /// ```
    /// use axiom_routing::{ParameterDescriptor, RouteDescriptor, TemplateGenerator};
    ///
    /// let descriptor = RouteDescriptor::new("Order")
    ///     .param(ParameterDescriptor::new("userId"))
    ///     .param(ParameterDescriptor::new("id"));
    /// assert_eq!(TemplateGenerator::generate(&descriptor).unwrap(), "/order/{userId}/{id}");
    /// ```
    pub fn generate(descriptor: &RouteDescriptor) -> Result<String> {
        match &descriptor.template {
            Some(explicit) => {
                Self::check_explicit(descriptor, explicit)?;
                Ok(explicit.clone())
            }
            None => {
                let synthesized = Self::synthesize(descriptor);
                RouteTemplate::parse(&synthesized)?;
                Ok(synthesized)
            }
        }
    }

    /// Generates and parses the template for a descriptor.
    pub fn template(descriptor: &RouteDescriptor) -> Result<RouteTemplate> {
        RouteTemplate::parse(&Self::generate(descriptor)?)
    }

    fn synthesize(descriptor: &RouteDescriptor) -> String {
        let mut template = String::new();
        for scope in descriptor
            .scopes
            .iter()
            .chain(std::iter::once(&descriptor.name))
            .filter(|s| !s.is_empty())
        {
            template.push('/');
            template.push_str(&scope.to_lowercase());
        }
        for param in &descriptor.parameters {
            template.push_str("/{");
            template.push_str(&param.name);
            if param.has_default {
                template.push('?');
            }
            template.push('}');
        }
        if template.is_empty() {
            template.push('/');
        }
        template
    }

    fn check_explicit(descriptor: &RouteDescriptor, explicit: &str) -> Result<()> {
        let parsed = RouteTemplate::parse(explicit)?;
        let declared: HashSet<String> = parsed
            .parameter_names()
            .map(str::to_ascii_lowercase)
            .collect();
        let expected: HashSet<String> = descriptor
            .parameters
            .iter()
            .map(|p| p.name.to_ascii_lowercase())
            .collect();

        if declared == expected && expected.len() == descriptor.parameters.len() {
            Ok(())
        } else {
            Err(RoutingError::TemplateMismatch {
                route: descriptor.qualified_name(),
                template: explicit.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ParameterDescriptor;

    #[test]
    fn test_synthesize_simple() {
        let d = RouteDescriptor::new("SimpleRoute");
        assert_eq!(TemplateGenerator::generate(&d).unwrap(), "/simpleroute");
    }

    #[test]
    fn test_synthesize_with_scopes_and_default() {
        let d = RouteDescriptor::new("Detail")
            .scope("Api")
            .scope("Files")
            .param(ParameterDescriptor::new("path"))
            .param(ParameterDescriptor::new("version").with_default());
        assert_eq!(
            TemplateGenerator::generate(&d).unwrap(),
            "/api/files/detail/{path}/{version?}"
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let d = RouteDescriptor::new("Order")
            .param(ParameterDescriptor::new("userId"))
            .param(ParameterDescriptor::new("id"));
        let first = TemplateGenerator::generate(&d).unwrap();
        let second = TemplateGenerator::generate(&d).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_explicit_template_verbatim() {
        let d = RouteDescriptor::new("GetUser")
            .param(ParameterDescriptor::new("id"))
            .template("/Users/{id:guid}");
        assert_eq!(TemplateGenerator::generate(&d).unwrap(), "/Users/{id:guid}");
    }

    #[test]
    fn test_explicit_template_mismatch() {
        let d = RouteDescriptor::new("GetUser")
            .param(ParameterDescriptor::new("id"))
            .template("/users/{userId}");
        assert!(matches!(
            TemplateGenerator::generate(&d),
            Err(RoutingError::TemplateMismatch { .. })
        ));

        let missing = RouteDescriptor::new("GetUser")
            .param(ParameterDescriptor::new("id"))
            .param(ParameterDescriptor::new("tab"))
            .template("/users/{id}");
        assert!(TemplateGenerator::generate(&missing).is_err());
    }

    #[test]
    fn test_default_before_required_is_rejected() {
        let d = RouteDescriptor::new("Broken")
            .param(ParameterDescriptor::new("a").with_default())
            .param(ParameterDescriptor::new("b"));
        assert!(matches!(
            TemplateGenerator::generate(&d),
            Err(RoutingError::InteriorOptional { .. })
        ));
    }
}
