//! Mock rule definitions.
//!
//! A [`MockRule`] binds a compiled URL pattern, an optional HTTP method
//! filter, an optional request predicate, and a responder generator. Rules
//! are immutable once built and shared with the registry via `Arc`.

use crate::pattern::{PathParams, PatternError, UrlPattern};
use crate::request::Request;
use crate::responder::Responder;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Per-rule predicate invoked with the full request after the pattern and
/// method checks pass. Its boolean result is the final verdict.
pub type Predicate = Box<dyn Fn(&dyn Request) -> bool + Send + Sync>;

/// Produces a responder for a matched request and its extracted path
/// parameters. The return type guarantees a responder is always produced;
/// there is no absent case to fall through to "no match".
pub type ResponderGenerator =
    Box<dyn Fn(&dyn Request, &PathParams) -> Box<dyn Responder> + Send + Sync>;

/// Error raised while constructing a [`MockRule`].
#[derive(Debug, Error)]
pub enum RuleError {
    /// The URL pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// No responder generator was supplied before `build`.
    #[error("rule has no responder generator")]
    MissingGenerator,
}

/// A registered mock rule.
pub struct MockRule {
    pattern: UrlPattern,
    /// Uppercased method filter; `None` (or empty) matches any method.
    methods: Option<HashSet<String>>,
    predicate: Option<Predicate>,
    generator: ResponderGenerator,
    name: Option<String>,
    dispatch_count: AtomicU64,
}

impl MockRule {
    /// Create a rule that matches any HTTP method.
    pub fn new<G>(pattern: &str, generator: G) -> Result<Self, RuleError>
    where
        G: Fn(&dyn Request, &PathParams) -> Box<dyn Responder> + Send + Sync + 'static,
    {
        Self::builder(pattern).respond_with(generator).build()
    }

    /// Create a rule restricted to the given HTTP methods.
    pub fn with_methods<I, S, G>(pattern: &str, methods: I, generator: G) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        G: Fn(&dyn Request, &PathParams) -> Box<dyn Responder> + Send + Sync + 'static,
    {
        Self::builder(pattern)
            .methods(methods)
            .respond_with(generator)
            .build()
    }

    /// Start building a rule. This is the canonical construction path; the
    /// convenience constructors above funnel into it.
    pub fn builder(pattern: &str) -> RuleBuilder {
        RuleBuilder {
            pattern: pattern.to_string(),
            methods: None,
            predicate: None,
            generator: None,
            name: None,
        }
    }

    /// The compiled URL pattern.
    pub fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    /// Optional diagnostic name, surfaced in dispatch logs.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Label used in logs: the rule's name if set, otherwise its pattern.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.pattern.as_str())
    }

    /// Whether the given HTTP method passes this rule's method filter.
    /// Comparison is case-insensitive; an absent or empty filter passes
    /// any method.
    pub fn allows_method(&self, method: &str) -> bool {
        match &self.methods {
            Some(set) if !set.is_empty() => set.contains(&method.to_uppercase()),
            _ => true,
        }
    }

    /// Run the rule's predicate against a request. Absence of a predicate
    /// passes.
    pub fn passes_predicate(&self, request: &dyn Request) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(request),
            None => true,
        }
    }

    /// Invoke the responder generator for a matched request.
    ///
    /// Callers must invoke this at most once per matched request and never
    /// speculatively: the generator may carry side effects (call counters
    /// and the like).
    pub fn respond(&self, request: &dyn Request, params: &PathParams) -> Box<dyn Responder> {
        self.dispatch_count.fetch_add(1, Ordering::Relaxed);
        (self.generator)(request, params)
    }

    /// How many times this rule's generator has been invoked.
    pub fn times_dispatched(&self) -> u64 {
        self.dispatch_count.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for MockRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRule")
            .field("pattern", &self.pattern.as_str())
            .field("methods", &self.methods)
            .field("has_predicate", &self.predicate.is_some())
            .field("name", &self.name)
            .finish()
    }
}

/// Builder for [`MockRule`].
pub struct RuleBuilder {
    pattern: String,
    methods: Option<Vec<String>>,
    predicate: Option<Predicate>,
    generator: Option<ResponderGenerator>,
    name: Option<String>,
}

impl RuleBuilder {
    /// Restrict the rule to the given HTTP methods (stored uppercased).
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// Add a free-form predicate, run after the pattern and method checks.
    pub fn predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&dyn Request) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Set the responder generator. Required.
    pub fn respond_with<G>(mut self, generator: G) -> Self
    where
        G: Fn(&dyn Request, &PathParams) -> Box<dyn Responder> + Send + Sync + 'static,
    {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Set a diagnostic name for logging.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build the rule, compiling its pattern.
    pub fn build(self) -> Result<MockRule, RuleError> {
        let pattern = UrlPattern::compile(&self.pattern)?;
        let generator = self.generator.ok_or(RuleError::MissingGenerator)?;
        let methods = self
            .methods
            .map(|m| m.into_iter().map(|s| s.to_uppercase()).collect());

        Ok(MockRule {
            pattern,
            methods,
            predicate: self.predicate,
            generator,
            name: self.name,
            dispatch_count: AtomicU64::new(0),
        })
    }
}
