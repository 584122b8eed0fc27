//! End-to-end tests: typed routes through URL generation and matching.

use std::sync::Arc;
use std::thread;

use axiom_routing::{
    FastRouteMatcher, Method, ParameterDescriptor, QueryParams, Route, RouteDescriptor,
    RouteEndpoint, RouteParams, RouteValues, TemplateGenerator, TypeHint, UrlGenerator,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

// =============================================================================
// Typed routes
// =============================================================================

#[derive(Debug, PartialEq)]
struct GetOrder {
    user_id: String,
    id: i64,
}

impl Route for GetOrder {
    fn descriptor() -> RouteDescriptor {
        RouteDescriptor::new("Order")
            .param(ParameterDescriptor::new("userId"))
            .param(ParameterDescriptor::new("id").typed(TypeHint::Long))
    }

    fn route_values(&self) -> RouteValues {
        RouteValues::new()
            .value("userId", &self.user_id)
            .value("id", self.id)
    }
}

impl GetOrder {
    fn from_params(params: &RouteParams) -> Option<Self> {
        Some(Self {
            user_id: params.get("userId")?.to_string(),
            id: params.parse("id")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct FileVersion {
    path: String,
    version: Option<String>,
}

impl Route for FileVersion {
    fn descriptor() -> RouteDescriptor {
        RouteDescriptor::new("Files")
            .scope("Api")
            .param(ParameterDescriptor::new("path"))
            .param(ParameterDescriptor::new("version").with_default())
    }

    fn route_values(&self) -> RouteValues {
        RouteValues::new()
            .value("path", &self.path)
            .optional("version", self.version.as_ref())
    }
}

impl FileVersion {
    fn from_params(params: &RouteParams) -> Option<Self> {
        Some(Self {
            path: params.get("path")?.to_string(),
            version: params.get("version").map(str::to_string),
        })
    }
}

#[derive(Debug, PartialEq)]
struct Event {
    at: DateTime<Utc>,
}

impl Route for Event {
    fn descriptor() -> RouteDescriptor {
        RouteDescriptor::new("Events")
            .param(ParameterDescriptor::new("at").typed(TypeHint::DateTime))
    }

    fn route_values(&self) -> RouteValues {
        RouteValues::new().datetime("at", &self.at)
    }
}

impl Event {
    fn from_params(params: &RouteParams) -> Option<Self> {
        Some(Self {
            at: params.parse("at")?,
        })
    }
}

fn matcher() -> FastRouteMatcher {
    FastRouteMatcher::new(vec![
        RouteEndpoint::from_descriptor(Method::Get, &GetOrder::descriptor()).unwrap(),
        RouteEndpoint::from_descriptor(Method::Get, &FileVersion::descriptor()).unwrap(),
        RouteEndpoint::from_descriptor(Method::Get, &Event::descriptor()).unwrap(),
        RouteEndpoint::new(Method::Get, "/simpleroute").unwrap(),
        RouteEndpoint::new(Method::Get, "/users/{id:guid}").unwrap(),
        RouteEndpoint::new(Method::Get, "/").unwrap(),
    ])
    .unwrap()
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn test_order_round_trip() {
    let m = matcher();
    for order in [
        GetOrder {
            user_id: "ann".into(),
            id: 7,
        },
        GetOrder {
            user_id: "first last & co".into(),
            id: -12,
        },
        GetOrder {
            user_id: "ünïcødé/slash".into(),
            id: i64::MAX,
        },
    ] {
        let url = UrlGenerator::generate_url(&order).unwrap();
        let result = m.match_path(&url).unwrap_or_else(|| panic!("no match for {url}"));
        assert_eq!(result.endpoint().route_type_name(), "Order");
        assert_eq!(GetOrder::from_params(result.params()), Some(order));
    }
}

#[test]
fn test_optional_round_trip() {
    let m = matcher();
    for file in [
        FileVersion {
            path: "document.pdf".into(),
            version: Some("v2".into()),
        },
        FileVersion {
            path: "notes.txt".into(),
            version: None,
        },
    ] {
        let url = UrlGenerator::generate_url(&file).unwrap();
        let result = m.match_path(&url).unwrap();
        assert_eq!(FileVersion::from_params(result.params()), Some(file));
    }
}

#[test]
fn test_datetime_round_trip() {
    let m = matcher();
    let event = Event {
        at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
    };
    let url = UrlGenerator::generate_url(&event).unwrap();
    assert_eq!(url, "/events/2024-01-15T10%3A30%3A00%2B00%3A00");

    let result = m.match_path(&url).unwrap();
    assert_eq!(result.endpoint().route_type_name(), "Events");
    assert_eq!(Event::from_params(result.params()), Some(event));
}

#[test]
fn test_datetime_display_form_matches() {
    let m = matcher();
    let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    let values = RouteValues::new().value("at", at);
    let template = TemplateGenerator::template(&Event::descriptor()).unwrap();
    let url = UrlGenerator::expand(&template, &values).unwrap();
    assert_eq!(url, "/events/2024-01-15%2010%3A30%3A00%20UTC");

    let result = m.match_path(&url).unwrap();
    assert_eq!(result.params().get("at"), Some("2024-01-15 10:30:00 UTC"));
}

#[test]
fn test_typed_constraint_rejects_bad_value() {
    let m = matcher();
    assert!(m.match_path("/order/ann/seven").is_none());
}

// =============================================================================
// Matching properties
// =============================================================================

#[test]
fn test_optional_suffix() {
    let m = matcher();
    let full = m.match_path("/api/files/document.pdf/v2").unwrap();
    assert_eq!(
        full.params().iter().collect::<Vec<_>>(),
        [("path", "document.pdf"), ("version", "v2")]
    );

    let short = m.match_path("/api/files/document.pdf").unwrap();
    assert_eq!(short.params().iter().collect::<Vec<_>>(), [("path", "document.pdf")]);
}

#[test]
fn test_constraint_gating() {
    let m = matcher();
    assert!(m
        .match_path("/users/123e4567-e89b-12d3-a456-426614174000")
        .is_some());
    assert!(m.match_path("/users/not-a-guid").is_none());
}

#[test]
fn test_case_and_slash_normalization() {
    let m = matcher();
    assert!(m.match_path("/SIMPLEROUTE").is_some());
    assert!(m.match_path("/simpleroute/").is_some());
}

#[test]
fn test_root_and_empty_path() {
    let m = matcher();
    let root = m.match_path("/").unwrap();
    assert_eq!(root.endpoint().template().source(), "/");
    assert!(m.match_path("").is_none());
}

#[test]
fn test_determinism_including_cache_hits() {
    let m = matcher();
    let first = m.match_path("/order/ann/7").unwrap();
    let second = m.match_path("/order/ann/7").unwrap();
    assert_eq!(first.params(), second.params());
    assert_eq!(
        first.endpoint().template().source(),
        second.endpoint().template().source()
    );
}

#[test]
fn test_cache_size_is_monotonic_until_cleared() {
    let m = matcher();
    let paths = ["/order/a/1", "/order/b/2", "/simpleroute", "/api/files/x", "/"];
    let mut last = 0;
    for (n, path) in paths.iter().enumerate() {
        assert!(m.match_path(path).is_some());
        let size = m.cache_size();
        assert!(size >= n + 1);
        assert!(size >= last);
        last = size;
    }
    m.clear_cache();
    assert_eq!(m.cache_size(), 0);
}

#[test]
fn test_concurrent_matching() {
    let m = Arc::new(matcher());
    thread::scope(|scope| {
        for t in 0..4 {
            let m = Arc::clone(&m);
            scope.spawn(move || {
                for i in 0..200 {
                    let path = format!("/order/user{t}/{i}");
                    let result = m.match_path(&path).unwrap();
                    assert_eq!(result.params().parse::<i64>("id"), Some(i));
                }
            });
        }
    });
    assert!(m.cache_size() >= 800);
}

// =============================================================================
// Query strings
// =============================================================================

#[derive(Serialize)]
struct Filter {
    tags: Vec<&'static str>,
    active: bool,
    q: Option<&'static str>,
}

#[test]
fn test_query_serialization_and_extraction() {
    let order = GetOrder {
        user_id: "ann".into(),
        id: 1,
    };
    let url = UrlGenerator::generate_url_with_query(
        &order,
        Some(&Filter {
            tags: vec!["a", "b"],
            active: true,
            q: Some("x y"),
        }),
    )
    .unwrap();
    assert_eq!(url, "/order/ann/1?tags=a&tags=b&active=true&q=x%20y");

    let (path, raw_query) = url.split_once('?').unwrap();
    assert!(matcher().match_path(path).is_some());

    let query = QueryParams::parse(raw_query);
    assert_eq!(query.get_values::<String>("tags"), ["a", "b"]);
    assert_eq!(query.get_value::<bool>("active"), Some(true));
    assert_eq!(query.get_value::<String>("q").as_deref(), Some("x y"));
}

#[test]
fn test_null_query_bag_yields_bare_path() {
    let order = GetOrder {
        user_id: "ann".into(),
        id: 1,
    };
    let url = UrlGenerator::generate_url_with_query::<_, Filter>(&order, None).unwrap();
    assert_eq!(url, "/order/ann/1");
}
