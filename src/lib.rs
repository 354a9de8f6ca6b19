//! Mock Dispatch
//!
//! A pattern-based request-matching and mock-response-dispatch engine:
//! register rules that bind a URL pattern, an optional HTTP method filter
//! and an optional predicate to a responder generator, then dispatch
//! inbound requests against them.
//!
//! # Features
//!
//! - **URL Patterns**: `/users/:id`-style patterns, compiled once per rule
//! - **Parameter Extraction**: capture segments record raw path values
//! - **Method Filters**: case-insensitive HTTP method sets
//! - **Predicates**: free-form per-rule request checks
//! - **Ordered Registry**: first-registered rule wins; lookups are safe
//!   under concurrent requests
//! - **Canned Responses**: serde-described [`StaticResponder`] definitions
//!
//! # Example
//!
//! ```
//! use mock_dispatch::{MockRule, RequestParts, RuleRegistry, StaticResponder};
//! use std::sync::Arc;
//!
//! let registry = RuleRegistry::new();
//! let rule = MockRule::with_methods("/users/:id", ["GET"], |_request, params| {
//!     Box::new(
//!         StaticResponder::ok()
//!             .with_body_json(serde_json::json!({ "id": params["id"] })),
//!     )
//! })
//! .unwrap();
//! registry.register(Arc::new(rule));
//!
//! let responder = registry.dispatch(&RequestParts::get("/users/42?verbose=1"));
//! assert!(responder.is_some());
//! ```

pub mod matcher;
pub mod pattern;
pub mod registry;
pub mod request;
pub mod responder;
pub mod rule;

pub use matcher::evaluate;
pub use pattern::{PathParams, PatternError, Segment, UrlPattern};
pub use registry::{MatchedRule, RuleRegistry};
pub use request::{Request, RequestParts};
pub use responder::{Responder, ResponderError, StaticResponder, StubBody};
pub use rule::{MockRule, Predicate, ResponderGenerator, RuleBuilder, RuleError};
