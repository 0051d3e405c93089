//! Route constraints.
//!
//! # Responsibilities
//! - Accept or reject a template match based on request attributes
//! - Match HTTP method (case-insensitive)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Constraints are stateless and shared read-only across requests
//! - A route without constraints matches on its template alone
//! - Constraints see the extracted values, so they can validate placeholders

use std::fmt;

use axum::body::Body;
use axum::http::Request;

use super::template::RouteValues;

/// A predicate that must hold, beyond the template, for a route to match.
pub trait Constraint: Send + Sync + fmt::Debug {
    /// Returns true if the request satisfies this constraint.
    fn matches(&self, req: &Request<Body>, values: &RouteValues) -> bool;
}

/// Matches the request method against one or more allowed methods.
#[derive(Debug, Clone)]
pub struct HttpMethodConstraint {
    allowed: Vec<String>,
}

impl HttpMethodConstraint {
    /// Create a method constraint.
    /// Methods are normalized to uppercase for case-insensitive matching.
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: methods
                .into_iter()
                .map(|m| m.as_ref().to_ascii_uppercase())
                .collect(),
        }
    }

    /// Shorthand for a constraint allowing a single method.
    pub fn only(method: &str) -> Self {
        Self::new([method])
    }

    /// Compare a raw method name against the allowed set.
    pub fn allows(&self, method: &str) -> bool {
        let method = method.to_ascii_uppercase();
        self.allowed.iter().any(|m| *m == method)
    }
}

impl Constraint for HttpMethodConstraint {
    fn matches(&self, req: &Request<Body>, _values: &RouteValues) -> bool {
        self.allows(req.method().as_str())
    }
}

/// Combines multiple constraints with AND semantics.
#[derive(Debug)]
pub struct AndConstraint {
    constraints: Vec<Box<dyn Constraint>>,
}

impl AndConstraint {
    pub fn new(constraints: Vec<Box<dyn Constraint>>) -> Self {
        Self { constraints }
    }
}

impl Constraint for AndConstraint {
    fn matches(&self, req: &Request<Body>, values: &RouteValues) -> bool {
        self.constraints.iter().all(|c| c.matches(req, values))
    }
}

/// Adapts a closure into a constraint.
pub struct FnConstraint<F> {
    label: &'static str,
    f: F,
}

impl<F> fmt::Debug for FnConstraint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConstraint").field("label", &self.label).finish()
    }
}

impl<F> Constraint for FnConstraint<F>
where
    F: Fn(&Request<Body>, &RouteValues) -> bool + Send + Sync,
{
    fn matches(&self, req: &Request<Body>, values: &RouteValues) -> bool {
        (self.f)(req, values)
    }
}

/// Build a constraint from a closure; `label` shows up in debug output.
pub fn fn_constraint<F>(label: &'static str, f: F) -> FnConstraint<F>
where
    F: Fn(&Request<Body>, &RouteValues) -> bool + Send + Sync,
{
    FnConstraint { label, f }
}
