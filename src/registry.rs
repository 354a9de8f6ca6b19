//! Ordered rule registry and responder dispatch.
//!
//! Holds registered rules behind a readers-writer lock: lookups share a read
//! lock so many in-flight requests can be evaluated concurrently, while
//! register/unregister take the write lock. Rules are immutable once
//! visible, so no further locking is needed per rule.

use crate::matcher::evaluate;
use crate::pattern::PathParams;
use crate::request::Request;
use crate::responder::Responder;
use crate::rule::MockRule;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// A rule selected for a request, with the parameters its pattern extracted.
#[derive(Debug, Clone)]
pub struct MatchedRule {
    /// The matched rule
    pub rule: Arc<MockRule>,
    /// Path parameters extracted during matching
    pub params: PathParams,
}

/// An ordered collection of mock rules.
///
/// Tie-break policy: when several rules would match the same request, the
/// first one in registration order wins. Tests that want a different rule to
/// take effect unregister the earlier one.
///
/// Registries are plain values with no global state; tests instantiate
/// independent registries to avoid cross-test leakage.
#[derive(Default)]
pub struct RuleRegistry {
    rules: RwLock<Vec<Arc<MockRule>>>,
    /// Total lookups performed.
    lookups_total: AtomicU64,
    /// Lookups that selected a rule.
    lookups_matched: AtomicU64,
    /// Lookups that found no rule.
    lookups_unmatched: AtomicU64,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Registration order is the tie-break order.
    pub fn register(&self, rule: Arc<MockRule>) {
        debug!(rule = %rule.label(), "registering rule");
        self.write_rules().push(rule);
    }

    /// Remove a previously registered rule, compared by pointer identity.
    /// Returns whether the rule was present.
    pub fn unregister(&self, rule: &Arc<MockRule>) -> bool {
        let mut rules = self.write_rules();
        let before = rules.len();
        rules.retain(|r| !Arc::ptr_eq(r, rule));
        let removed = rules.len() != before;
        if removed {
            debug!(rule = %rule.label(), "unregistered rule");
        }
        removed
    }

    /// Remove all registered rules.
    pub fn clear(&self) {
        self.write_rules().clear();
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.read_rules().len()
    }

    /// Whether the registry holds no rules.
    pub fn is_empty(&self) -> bool {
        self.read_rules().is_empty()
    }

    /// Find the first rule, in registration order, that matches the request.
    pub fn first_match(&self, request: &dyn Request) -> Option<MatchedRule> {
        self.lookups_total.fetch_add(1, Ordering::Relaxed);

        let matched = {
            let rules = self.read_rules();
            rules.iter().find_map(|rule| {
                evaluate(rule.as_ref(), request).map(|params| MatchedRule {
                    rule: Arc::clone(rule),
                    params,
                })
            })
        };

        match &matched {
            Some(m) => {
                self.lookups_matched.fetch_add(1, Ordering::Relaxed);
                info!(
                    rule = %m.rule.label(),
                    method = %request.method(),
                    url = %request.url(),
                    "request matched rule"
                );
            }
            None => {
                self.lookups_unmatched.fetch_add(1, Ordering::Relaxed);
                warn!(
                    method = %request.method(),
                    url = %request.url(),
                    "no matching rule found"
                );
            }
        }

        matched
    }

    /// Find the first matching rule and invoke its responder generator.
    ///
    /// The generator runs exactly once per matched request, synchronously on
    /// the calling thread, after the registry lock has been released; it is
    /// never invoked for rules that did not match.
    pub fn dispatch(&self, request: &dyn Request) -> Option<Box<dyn Responder>> {
        let matched = self.first_match(request)?;
        Some(matched.rule.respond(request, &matched.params))
    }

    /// Total lookups performed.
    pub fn total_lookups(&self) -> u64 {
        self.lookups_total.load(Ordering::Relaxed)
    }

    /// Total lookups that selected a rule.
    pub fn total_matched(&self) -> u64 {
        self.lookups_matched.load(Ordering::Relaxed)
    }

    /// Total lookups that found no rule.
    pub fn total_unmatched(&self) -> u64 {
        self.lookups_unmatched.load(Ordering::Relaxed)
    }

    // A poisoned lock means another test thread panicked mid-mutation; the
    // Vec itself is still structurally sound, so recover the guard rather
    // than cascade the panic.
    fn read_rules(&self) -> RwLockReadGuard<'_, Vec<Arc<MockRule>>> {
        match self.rules.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_rules(&self) -> RwLockWriteGuard<'_, Vec<Arc<MockRule>>> {
        match self.rules.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.len())
            .field("total_lookups", &self.total_lookups())
            .finish()
    }
}
