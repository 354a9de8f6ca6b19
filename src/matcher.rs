//! Request matching logic.
//!
//! Evaluates a single rule against an inbound request. Checks run in order
//! and short-circuit on the first failure: method filter, path shape,
//! per-segment comparison, then the free-form predicate.

use crate::pattern::{path_of, PathParams};
use crate::request::Request;
use crate::rule::MockRule;
use tracing::trace;

/// Evaluate a rule against a request.
///
/// Returns the extracted path parameters on a match, `None` otherwise.
/// A non-match is a terminal, immediate result; nothing in here retries or
/// raises. The rule's responder generator is never invoked from evaluation.
pub fn evaluate(rule: &MockRule, request: &dyn Request) -> Option<PathParams> {
    if !rule.allows_method(request.method()) {
        trace!(
            rule = %rule.label(),
            method = %request.method(),
            "method filter rejected request"
        );
        return None;
    }

    // Only the path participates; the query string never affects matching.
    let path = path_of(request.url());
    let params = match rule.pattern().match_path(path) {
        Some(params) => params,
        None => {
            trace!(rule = %rule.label(), path = %path, "path did not match pattern");
            return None;
        }
    };

    if !rule.passes_predicate(request) {
        trace!(rule = %rule.label(), "predicate rejected request");
        return None;
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestParts;
    use crate::responder::{Responder, StaticResponder};

    fn ok_generator(_: &dyn Request, _: &PathParams) -> Box<dyn Responder> {
        Box::new(StaticResponder::ok())
    }

    #[test]
    fn test_capture_match() {
        let rule = MockRule::new("/users/:id", ok_generator).unwrap();

        let params = evaluate(&rule, &RequestParts::get("/users/42")).unwrap();
        assert_eq!(params.get("id"), Some(&"42".to_string()));

        assert!(evaluate(&rule, &RequestParts::get("/users/42/edit")).is_none());
        assert!(evaluate(&rule, &RequestParts::get("/users")).is_none());
    }

    #[test]
    fn test_method_filter_is_case_insensitive() {
        let rule = MockRule::with_methods("/users/:id", ["GET"], ok_generator).unwrap();

        assert!(evaluate(&rule, &RequestParts::new("get", "/users/42")).is_some());
        assert!(evaluate(&rule, &RequestParts::new("POST", "/users/42")).is_none());
    }

    #[test]
    fn test_segment_count_mismatch_beats_everything() {
        // Method passes and the predicate would accept, but the shape is wrong.
        let rule = MockRule::builder("/a/:b")
            .predicate(|_| true)
            .respond_with(ok_generator)
            .build()
            .unwrap();

        assert!(evaluate(&rule, &RequestParts::get("/a")).is_none());
        assert!(evaluate(&rule, &RequestParts::get("/a/b/c")).is_none());
    }

    #[test]
    fn test_false_predicate_never_matches() {
        let rule = MockRule::builder("/users/:id")
            .methods(["GET"])
            .predicate(|_| false)
            .respond_with(ok_generator)
            .build()
            .unwrap();

        assert!(evaluate(&rule, &RequestParts::get("/users/42")).is_none());
    }

    #[test]
    fn test_predicate_sees_full_request() {
        let rule = MockRule::builder("/items/:id")
            .predicate(|request| request.url().contains("sort=desc"))
            .respond_with(ok_generator)
            .build()
            .unwrap();

        assert!(evaluate(&rule, &RequestParts::get("/items/7?sort=desc")).is_some());
        assert!(evaluate(&rule, &RequestParts::get("/items/7?sort=asc")).is_none());
    }

    #[test]
    fn test_query_string_never_affects_matching() {
        let rule = MockRule::new("/items/:id", ok_generator).unwrap();

        let desc = evaluate(&rule, &RequestParts::get("/items/7?sort=desc")).unwrap();
        let asc = evaluate(&rule, &RequestParts::get("/items/7?sort=asc")).unwrap();
        assert_eq!(desc, asc);
        assert_eq!(desc.get("id"), Some(&"7".to_string()));
    }

    #[test]
    fn test_absolute_url_request() {
        let rule = MockRule::new("/users/:id", ok_generator).unwrap();

        let params = evaluate(
            &rule,
            &RequestParts::get("https://api.example.com/users/42?verbose=1"),
        )
        .unwrap();
        assert_eq!(params.get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn test_captured_values_are_not_percent_decoded() {
        let rule = MockRule::new("/files/:name", ok_generator).unwrap();

        let params = evaluate(&rule, &RequestParts::get("/files/report%202024")).unwrap();
        assert_eq!(params.get("name"), Some(&"report%202024".to_string()));
    }
}
