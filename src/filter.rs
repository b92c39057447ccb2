//! # Filter Chains (chain-of-responsibility)
//!
//! Each [`FilterLink`] carries a [`Predicate`]. A request travels down the
//! chain in assembly order; the first link whose predicate matches answers
//! it and the rest of the chain is never consulted. A request nobody matches
//! comes back as `None`, which is an ordinary outcome rather than an error.
//!
//! ```rust
//! use delegate_rs::{FilterChain, FilterLink};
//!
//! let chain = FilterChain::builder()
//!     .link(FilterLink::equals("AutomationA", "A"))
//!     .link(FilterLink::equals("AutomationB", "B"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(chain.handle("B").as_deref(), Some("AutomationB: B"));
//! assert_eq!(chain.handle("D"), None);
//! ```

use crate::chain::{Chain, SubChain, Walk};
use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};
use crate::link::{Link, LinkId, Next};
use std::fmt;
use std::sync::Arc;

type MatchFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Decides whether a link answers a request
#[derive(Clone)]
pub enum Predicate {
    /// Request equals the tag
    Equals(String),
    /// Request equals any of the tags
    OneOf(Vec<String>),
    /// Arbitrary test
    Custom(MatchFn),
}

impl Predicate {
    pub fn custom<F>(test: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom(Arc::new(test))
    }

    pub fn matches(&self, request: &str) -> bool {
        match self {
            Predicate::Equals(tag) => tag == request,
            Predicate::OneOf(tags) => tags.iter().any(|tag| tag == request),
            Predicate::Custom(test) => test(request),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals(tag) => f.debug_tuple("Equals").field(tag).finish(),
            Predicate::OneOf(tags) => f.debug_tuple("OneOf").field(tags).finish(),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How a link words its reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFormat {
    /// `"<name>: <request>"`
    #[default]
    Colon,
    /// `"<name> <request>"`, kept for output parity with the legacy demo
    Bare,
}

impl ReplyFormat {
    pub fn render(&self, name: &str, request: &str) -> String {
        match self {
            ReplyFormat::Colon => format!("{}: {}", name, request),
            ReplyFormat::Bare => format!("{} {}", name, request),
        }
    }
}

/// A link that answers matching requests and forwards the rest
#[derive(Debug, Clone)]
pub struct FilterLink {
    name: String,
    predicate: Predicate,
    format: ReplyFormat,
}

impl FilterLink {
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
            format: ReplyFormat::default(),
        }
    }

    /// A link answering requests equal to `tag`
    pub fn equals(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::new(name, Predicate::Equals(tag.into()))
    }

    pub fn with_format(mut self, format: ReplyFormat) -> Self {
        self.format = format;
        self
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn format(&self) -> ReplyFormat {
        self.format
    }

    /// This link's own reply, without consulting its successor
    pub fn answer(&self, request: &str) -> Option<String> {
        if !self.predicate.matches(request) {
            return None;
        }
        tracing::trace!(link = %self.name, request, "handled");
        Some(self.format.render(&self.name, request))
    }
}

impl Link for FilterLink {
    type Request = str;
    type Output = Option<String>;

    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, request: &str, next: Next<'_, Self>) -> Option<String> {
        self.answer(request).or_else(|| next.run(request))
    }

    fn end_of_chain(request: &str) -> Option<String> {
        tracing::trace!(request, "unhandled");
        None
    }
}

/// Outcome of one request in a client run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub request: String,
    pub reply: Option<String>,
}

impl Dispatch {
    pub fn is_handled(&self) -> bool {
        self.reply.is_some()
    }
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reply {
            Some(reply) => f.write_str(reply),
            None => write!(f, "Automation {} has not been initiated.", self.request),
        }
    }
}

/// First reply along `links`, found without nesting a call per hop
fn first_answer(mut links: Walk<'_, FilterLink>, request: &str) -> Option<String> {
    links
        .find_map(|(_, link)| link.answer(request))
        .or_else(|| FilterLink::end_of_chain(request))
}

fn run_requests<'r, I>(requests: I, mut handle: impl FnMut(&str) -> Option<String>) -> Vec<Dispatch>
where
    I: IntoIterator<Item = &'r str>,
{
    requests
        .into_iter()
        .map(|request| Dispatch {
            request: request.to_string(),
            reply: handle(request),
        })
        .collect()
}

/// An assembled, immutable filter chain
pub struct FilterChain {
    chain: Chain<FilterLink>,
    head: LinkId,
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("links", &self.describe())
            .finish()
    }
}

impl FilterChain {
    pub fn builder() -> FilterChainBuilder {
        FilterChainBuilder::new()
    }

    /// Adopt a chain assembled by hand, dispatching from `head`
    pub fn from_chain(chain: Chain<FilterLink>, head: LinkId) -> ChainResult<Self> {
        chain.validate(head)?;
        Ok(Self { chain, head })
    }

    /// First matching reply, or `None` when no link answers
    pub fn handle(&self, request: &str) -> Option<String> {
        first_answer(self.chain.walk(self.head), request)
    }

    /// Handle every request in order
    pub fn run<'r, I>(&self, requests: I) -> Vec<Dispatch>
    where
        I: IntoIterator<Item = &'r str>,
    {
        run_requests(requests, |request| self.handle(request))
    }

    /// View starting at an interior link; earlier links are skipped entirely
    pub fn sub_chain(&self, head: LinkId) -> ChainResult<SubChain<'_, FilterLink>> {
        self.chain.sub_chain(head)
    }

    /// Sub-chain starting at the first link with the given name
    pub fn sub_chain_named(&self, name: &str) -> ChainResult<SubChain<'_, FilterLink>> {
        let head = self
            .find(name)
            .ok_or_else(|| ChainError::invalid(format!("no link named '{}'", name)))?;
        self.sub_chain(head)
    }

    /// Id of the first link reachable from the head with the given name
    pub fn find(&self, name: &str) -> Option<LinkId> {
        self.chain
            .walk(self.head)
            .find(|(_, link)| link.name() == name)
            .map(|(id, _)| id)
    }

    pub fn head(&self) -> LinkId {
        self.head
    }

    /// Link names in dispatch order, e.g. `"AutomationA > AutomationB"`
    pub fn describe(&self) -> String {
        self.chain.describe(self.head)
    }

    pub fn len(&self) -> usize {
        self.chain.walk(self.head).count()
    }

    /// Always `false`: a built chain always has a head link
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn config(&self) -> &ChainConfig {
        self.chain.config()
    }
}

impl<'a> SubChain<'a, FilterLink> {
    /// Handle every request in order, starting at this sub-chain's head
    pub fn run<'r, I>(&self, requests: I) -> Vec<Dispatch>
    where
        I: IntoIterator<Item = &'r str>,
    {
        run_requests(requests, |request| first_answer(self.walk(), request))
    }
}

/// Builder assembling links in the order they are given
#[derive(Default)]
pub struct FilterChainBuilder {
    links: Vec<FilterLink>,
    config: ChainConfig,
}

impl FilterChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a link after the ones already given
    pub fn link(mut self, link: FilterLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> ChainResult<FilterChain> {
        if self.links.is_empty() {
            return Err(ChainError::invalid("a filter chain needs at least one link"));
        }

        let mut chain = Chain::with_config(self.config)?;
        let mut ids = Vec::with_capacity(self.links.len());
        for link in self.links {
            ids.push(chain.add(link)?);
        }
        for pair in ids.windows(2) {
            chain.set_next(pair[0], pair[1])?;
        }

        let head = ids[0];
        tracing::debug!(chain = %chain.config().label, links = %chain.describe(head), "filter chain built");
        Ok(FilterChain { chain, head })
    }
}
