//! Route registration and lookup.
//!
//! # Responsibilities
//! - Collect named route entries in registration order
//! - Freeze them into an immutable table
//! - Find the first entry whose template and constraints match
//!
//! # Design Decisions
//! - Immutable after `build()` (thread-safe without locks)
//! - O(n) scan in registration order (acceptable for typical route counts)
//! - Duplicate names are rejected at registration instead of shadowed
//! - A miss hands the request back untouched

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use super::constraint::Constraint;
use super::dispatch::{HandlerError, MatchContext, RouteHandler};
use super::engine::RouteEngine;
use super::template::{RouteTemplate, RouteValues};
use super::RouteError;

/// Per-route options.
#[derive(Default, Clone)]
pub struct RouteOptions {
    /// Values used for placeholders the path omits. Keys that are not
    /// placeholders are copied into the extracted values unchanged.
    pub defaults: BTreeMap<String, String>,

    /// Named predicates; every one must accept for the route to match.
    pub constraints: Vec<(String, Arc<dyn Constraint>)>,

    /// Opaque metadata handed to the handler, never used for matching.
    pub data_tokens: BTreeMap<String, String>,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn constraint(mut self, key: impl Into<String>, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push((key.into(), Arc::new(constraint)));
        self
    }

    pub fn data_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_tokens.insert(name.into(), value.into());
        self
    }
}

impl fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("defaults", &self.defaults)
            .field("constraints", &self.constraints)
            .field("data_tokens", &self.data_tokens)
            .finish()
    }
}

/// A registered route.
pub struct RouteEntry {
    name: Arc<str>,
    template: RouteTemplate,
    defaults: BTreeMap<String, String>,
    constraints: Vec<(String, Arc<dyn Constraint>)>,
    data_tokens: Arc<BTreeMap<String, String>>,
    handler: Arc<dyn RouteHandler>,
}

impl RouteEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    /// Template match followed by every constraint.
    fn try_match(&self, req: &Request<Body>) -> Option<RouteValues> {
        let values = self.template.match_path(req.uri().path(), &self.defaults)?;

        for (key, constraint) in &self.constraints {
            if !constraint.matches(req, &values) {
                tracing::trace!(route = %self.name, constraint = %key, "Constraint rejected request");
                return None;
            }
        }

        Some(values)
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("name", &self.name)
            .field("template", &self.template.as_str())
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

/// Accumulates routes before freezing them.
#[derive(Default, Debug)]
pub struct RouteTableBuilder {
    entries: Vec<Arc<RouteEntry>>,
    names: HashSet<Arc<str>>,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Order of registration is match priority.
    pub fn register(
        &mut self,
        name: &str,
        template: &str,
        options: RouteOptions,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<&mut Self, RouteError> {
        if self.names.contains(name) {
            return Err(RouteError::DuplicateName(name.to_string()));
        }

        let template = RouteTemplate::parse(template)?;
        let name: Arc<str> = Arc::from(name);

        tracing::debug!(route = %name, template = %template.as_str(), "Route registered");

        self.names.insert(name.clone());
        self.entries.push(Arc::new(RouteEntry {
            name,
            template,
            defaults: options.defaults,
            constraints: options.constraints,
            data_tokens: Arc::new(options.data_tokens),
            handler,
        }));
        Ok(self)
    }

    /// Freeze the registered routes.
    ///
    /// The builder keeps its entries, so building twice yields two tables
    /// with identical behavior.
    pub fn build(&self) -> RouteTable {
        RouteTable {
            entries: self.entries.clone(),
        }
    }
}

/// Immutable, ordered route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<Arc<RouteEntry>>,
}

impl RouteTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter().map(AsRef::as_ref)
    }

    /// Look up a route by name (first registration wins).
    pub fn get(&self, name: &str) -> Option<&RouteEntry> {
        self.entries().find(|e| e.name() == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| &*e.name == name)
    }
}

impl RouteEngine for RouteTable {
    fn match_request(&self, req: Request<Body>) -> Result<MatchContext, Request<Body>> {
        let found = self
            .entries
            .iter()
            .find_map(|entry| entry.try_match(&req).map(|values| (entry, values)));

        match found {
            Some((entry, values)) => Ok(MatchContext::new(
                entry.name.clone(),
                values,
                entry.data_tokens.clone(),
                req,
            )),
            None => Err(req),
        }
    }

    fn invoke(&self, ctx: MatchContext) -> BoxFuture<'static, Result<Response, HandlerError>> {
        match self.position(ctx.route()) {
            Some(index) => self.entries[index].handler.call(ctx),
            None => {
                let route = ctx.route().to_string();
                Box::pin(async move {
                    Err(HandlerError::internal(format!("route '{route}' is not in this table")))
                })
            }
        }
    }
}
