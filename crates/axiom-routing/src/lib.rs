//! # axiom-routing
//!
//! Type-safe route matching and URL generation.
//!
//! This crate provides:
//! - Route templates derived from typed route descriptors
//! - Parameter constraints (types, ranges, lengths, regex, allowed values)
//! - A multi-route matcher with literal-over-parameter priority,
//!   optional trailing segments and a bounded match cache
//! - URL generation with percent-encoded query strings
//! - Typed query string extraction
//!
//! ## Quick Start
//!
//! ```
//! use axiom_routing::{FastRouteMatcher, Method, RouteEndpoint};
//!
//! let matcher = FastRouteMatcher::new(vec![
//!     RouteEndpoint::new(Method::Get, "/users/{id:guid}").unwrap(),
//!     RouteEndpoint::new(Method::Get, "/files/{path}/{version?}").unwrap(),
//! ])
//! .unwrap();
//!
//! let hit = matcher
//!     .match_path("/users/123e4567-e89b-12d3-a456-426614174000")
//!     .unwrap();
//! assert_eq!(hit.params().get("id"), Some("123e4567-e89b-12d3-a456-426614174000"));
//!
//! assert!(matcher.match_path("/users/not-a-guid").is_none());
//!
//! let file = matcher.match_path("/files/document.pdf").unwrap();
//! assert_eq!(file.params().get("path"), Some("document.pdf"));
//! assert!(!file.params().contains("version"));
//! ```
//!
//! ## Typed Routes
//!
//! Routes implement [`Route`] to expose their shape and values. Templates
//! are synthesized from the lower-cased type name followed by one segment
//! per parameter:
//!
//! ```
//! use axiom_routing::{ParameterDescriptor, Route, RouteDescriptor, RouteValues, UrlGenerator};
//!
//! struct Order {
//!     user_id: String,
//!     id: u32,
//! }
//!
//! impl Route for Order {
//!     fn descriptor() -> RouteDescriptor {
//!         RouteDescriptor::new("Order")
//!             .param(ParameterDescriptor::new("userId"))
//!             .param(ParameterDescriptor::new("id"))
//!     }
//!
//!     fn route_values(&self) -> RouteValues {
//!         RouteValues::new().value("userId", &self.user_id).value("id", self.id)
//!     }
//! }
//!
//! let order = Order { user_id: "ann".into(), id: 7 };
//! assert_eq!(UrlGenerator::generate_url(&order).unwrap(), "/order/ann/7");
//! ```

mod cache;
mod constraint;
mod descriptor;
mod endpoint;
mod error;
mod fast_matcher;
mod generator;
mod matcher;
mod path;
mod query;
mod request;
mod router;
mod template;
mod url;

pub use constraint::{
    parse_constraint, AllowedValuesConstraint, LengthConstraint, PrimitiveKind, RangeConstraint,
    RegexConstraint, RequiredConstraint, RouteConstraint, SharedConstraint, TypeConstraint,
};
pub use descriptor::{ParameterDescriptor, Route, RouteDescriptor, RouteValues, TypeHint};
pub use endpoint::RouteEndpoint;
pub use error::{Result, RouterError, RoutingError};
pub use fast_matcher::{FastRouteMatcher, MatchResult, MatcherOptions};
pub use generator::TemplateGenerator;
pub use matcher::RouteMatcher;
pub use path::normalize_path;
pub use query::QueryParams;
pub use request::{Method, Request, RouteParams};
pub use router::{Resolved, RouteTable, RouteTableBuilder};
pub use template::{ParameterSegment, RouteTemplate, Segment};
pub use url::UrlGenerator;
