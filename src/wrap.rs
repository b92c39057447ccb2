//! # Wrap Chains (decorator)
//!
//! A wrap chain ends in exactly one base link, which produces the core
//! value. Every wrapper in front of it forwards the request inwards first and
//! transforms the reply on the way out, so the wrapper added last is the
//! outermost layer of the result:
//!
//! ```rust
//! use delegate_rs::{BaseValue, WrapChain, WrapLink};
//!
//! let mut notifier =
//!     WrapChain::new(WrapLink::base("TextNotifier", BaseValue::fixed("Text notifier")))?;
//! notifier
//!     .wrap(WrapLink::wrapper("SMSDecorator"))?
//!     .wrap(WrapLink::wrapper("FacebookDecorator"))?;
//!
//! assert_eq!(
//!     notifier.handle(""),
//!     "FacebookDecorator(SMSDecorator(Text notifier))"
//! );
//! # Ok::<(), delegate_rs::ChainError>(())
//! ```

use crate::chain::Chain;
use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};
use crate::link::{Link, LinkId, Next};
use std::fmt;
use std::sync::Arc;

type TransformFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// What a base link produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseValue {
    /// The same text for every request
    Fixed(String),
    /// The request itself
    Request,
}

impl BaseValue {
    pub fn fixed(value: impl Into<String>) -> Self {
        BaseValue::Fixed(value.into())
    }

    fn resolve(&self, request: &str) -> String {
        match self {
            BaseValue::Fixed(value) => value.clone(),
            BaseValue::Request => request.to_string(),
        }
    }
}

/// How a wrapper rewrites the inner reply
#[derive(Clone, Default)]
pub enum Transform {
    /// `"<name>(<inner>)"`
    #[default]
    Enclose,
    /// Called with `(name, inner)`
    Custom(TransformFn),
}

impl Transform {
    pub fn custom<F>(transform: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Transform::Custom(Arc::new(transform))
    }

    pub fn apply(&self, name: &str, inner: &str) -> String {
        match self {
            Transform::Enclose => format!("{}({})", name, inner),
            Transform::Custom(transform) => transform(name, inner),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Enclose => f.write_str("Enclose"),
            Transform::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A link of a wrap chain
#[derive(Debug, Clone)]
pub enum WrapLink {
    /// Innermost link, never has a successor
    Base { name: String, value: BaseValue },
    /// Wraps exactly one inner link
    Wrapper { name: String, transform: Transform },
}

impl WrapLink {
    pub fn base(name: impl Into<String>, value: BaseValue) -> Self {
        WrapLink::Base {
            name: name.into(),
            value,
        }
    }

    /// Wrapper rendering `"<name>(<inner>)"`
    pub fn wrapper(name: impl Into<String>) -> Self {
        Self::wrapper_with(name, Transform::Enclose)
    }

    pub fn wrapper_with(name: impl Into<String>, transform: Transform) -> Self {
        WrapLink::Wrapper {
            name: name.into(),
            transform,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, WrapLink::Base { .. })
    }
}

impl Link for WrapLink {
    type Request = str;
    type Output = String;

    fn name(&self) -> &str {
        match self {
            WrapLink::Base { name, .. } | WrapLink::Wrapper { name, .. } => name,
        }
    }

    fn handle(&self, request: &str, next: Next<'_, Self>) -> String {
        match self {
            WrapLink::Base { value, .. } => value.resolve(request),
            WrapLink::Wrapper { name, transform } => {
                let inner = next.run(request);
                transform.apply(name, &inner)
            }
        }
    }

    // Only reachable from an unvalidated chain; `validate` rejects wrappers
    // without an inner link.
    fn end_of_chain(_request: &str) -> String {
        String::new()
    }

    fn accepts_successor(&self) -> bool {
        !self.is_base()
    }

    fn requires_successor(&self) -> bool {
        !self.is_base()
    }
}

/// An assembled wrap chain; always ends in a base link
pub struct WrapChain {
    chain: Chain<WrapLink>,
    head: LinkId,
}

impl fmt::Debug for WrapChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapChain")
            .field("layers", &self.layers())
            .finish()
    }
}

impl WrapChain {
    /// Start from a base link
    pub fn new(base: WrapLink) -> ChainResult<Self> {
        Self::with_config(base, ChainConfig::default())
    }

    /// Start from a base link under `config`, which must validate
    pub fn with_config(base: WrapLink, config: ChainConfig) -> ChainResult<Self> {
        if !base.is_base() {
            return Err(ChainError::invalid(format!(
                "wrapper '{}' has no inner component to wrap",
                base.name()
            )));
        }

        let mut chain = Chain::with_config(config)?;
        let head = chain.add(base)?;
        Ok(Self { chain, head })
    }

    pub fn builder() -> WrapChainBuilder {
        WrapChainBuilder::new()
    }

    /// Adopt a chain assembled by hand; every wrapper must reach a base link
    pub fn from_chain(chain: Chain<WrapLink>, head: LinkId) -> ChainResult<Self> {
        chain.validate(head)?;
        Ok(Self { chain, head })
    }

    /// Add an outer layer around the current chain.
    ///
    /// On error the chain is left as it was.
    pub fn wrap(&mut self, wrapper: WrapLink) -> ChainResult<&mut Self> {
        if wrapper.is_base() {
            return Err(ChainError::invalid(format!(
                "base link '{}' cannot wrap another link",
                wrapper.name()
            )));
        }

        let id = self.chain.add(wrapper)?;
        self.chain.set_next(id, self.head)?;
        self.head = id;
        tracing::trace!(chain = %self.chain.config().label, layer = %id, "wrapped");
        Ok(self)
    }

    pub fn handle(&self, request: &str) -> String {
        self.chain.dispatch(self.head, request)
    }

    /// Link names, outermost first
    pub fn layers(&self) -> Vec<&str> {
        self.chain
            .walk(self.head)
            .map(|(_, link)| link.name())
            .collect()
    }

    pub fn describe(&self) -> String {
        self.chain.describe(self.head)
    }

    /// Number of wrappers around the base link
    pub fn depth(&self) -> usize {
        self.chain.walk(self.head).count().saturating_sub(1)
    }

    pub fn head(&self) -> LinkId {
        self.head
    }
}

/// Builder collecting a base link and its wrappers, innermost first
#[derive(Default)]
pub struct WrapChainBuilder {
    base: Option<WrapLink>,
    wrappers: Vec<WrapLink>,
    config: ChainConfig,
}

impl WrapChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, base: WrapLink) -> Self {
        self.base = Some(base);
        self
    }

    /// Wrap everything given so far
    pub fn wrap(mut self, wrapper: WrapLink) -> Self {
        self.wrappers.push(wrapper);
        self
    }

    pub fn config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> ChainResult<WrapChain> {
        let base = match self.base {
            Some(base) => base,
            None => {
                let name = self
                    .wrappers
                    .first()
                    .map(|wrapper| wrapper.name().to_string())
                    .unwrap_or_default();
                return Err(ChainError::invalid(format!(
                    "wrapper '{}' has no inner component to wrap",
                    name
                )));
            }
        };

        let mut chain = WrapChain::with_config(base, self.config)?;
        for wrapper in self.wrappers {
            chain.wrap(wrapper)?;
        }

        tracing::debug!(chain = %chain.chain.config().label, layers = %chain.describe(), "wrap chain built");
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_LINKS_CEILING;

    fn text() -> WrapLink {
        WrapLink::base("TextNotifier", BaseValue::fixed("Text notifier"))
    }

    #[test]
    fn test_base_only() {
        let chain = WrapChain::new(text()).unwrap();

        assert_eq!(chain.handle(""), "Text notifier");
        assert_eq!(chain.depth(), 0);
    }

    #[test]
    fn test_nesting_follows_reverse_construction_order() {
        let chain = WrapChain::builder()
            .base(text())
            .wrap(WrapLink::wrapper("SMSDecorator"))
            .wrap(WrapLink::wrapper("FacebookDecorator"))
            .build()
            .unwrap();

        assert_eq!(
            chain.handle(""),
            "FacebookDecorator(SMSDecorator(Text notifier))"
        );
        assert_eq!(
            chain.layers(),
            vec!["FacebookDecorator", "SMSDecorator", "TextNotifier"]
        );
        assert_eq!(chain.depth(), 2);
    }

    #[test]
    fn test_wrapper_without_inner_rejected() {
        let result = WrapChain::builder()
            .wrap(WrapLink::wrapper("SMSDecorator"))
            .build();
        assert!(matches!(result, Err(ChainError::InvalidConfiguration(_))));

        let result = WrapChain::new(WrapLink::wrapper("SMSDecorator"));
        assert!(matches!(result, Err(ChainError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_base_cannot_wrap() {
        let mut chain = WrapChain::new(text()).unwrap();
        let result = chain.wrap(text()).map(|_| ());
        assert!(matches!(result, Err(ChainError::InvalidConfiguration(_))));
        assert_eq!(chain.handle(""), "Text notifier");
    }

    #[test]
    fn test_request_derived_base() {
        let mut chain = WrapChain::new(WrapLink::base("Echo", BaseValue::Request)).unwrap();
        chain.wrap(WrapLink::wrapper("Slack")).unwrap();

        assert_eq!(chain.handle("deploy done"), "Slack(deploy done)");
    }

    #[test]
    fn test_custom_transform() {
        let shout = Transform::custom(|name, inner| format!("{}!{}", name, inner.to_uppercase()));
        let mut chain = WrapChain::new(text()).unwrap();
        chain.wrap(WrapLink::wrapper_with("Loud", shout)).unwrap();

        assert_eq!(chain.handle(""), "Loud!TEXT NOTIFIER");
    }

    #[test]
    fn test_hand_assembled_chain_validated() {
        let mut chain = Chain::new();
        let sms = chain.add(WrapLink::wrapper("SMSDecorator")).unwrap();
        let result = WrapChain::from_chain(chain, sms);
        assert!(matches!(result, Err(ChainError::InvalidConfiguration(_))));

        let mut chain = Chain::new();
        let sms = chain.add(WrapLink::wrapper("SMSDecorator")).unwrap();
        let base = chain.add(text()).unwrap();
        chain.set_next(sms, base).unwrap();
        let wrapped = WrapChain::from_chain(chain, sms).unwrap();
        assert_eq!(wrapped.handle(""), "SMSDecorator(Text notifier)");
    }

    #[test]
    fn test_base_refuses_successor() {
        let mut chain = Chain::new();
        let base = chain.add(text()).unwrap();
        let sms = chain.add(WrapLink::wrapper("SMSDecorator")).unwrap();

        assert!(matches!(
            chain.set_next(base, sms),
            Err(ChainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_capacity_applies_to_wrappers() {
        let result = WrapChain::builder()
            .config(ChainConfig::default().max_links(2))
            .base(text())
            .wrap(WrapLink::wrapper("SMSDecorator"))
            .wrap(WrapLink::wrapper("FacebookDecorator"))
            .build();

        assert!(matches!(result, Err(ChainError::CapacityExceeded(2))));
    }

    #[test]
    fn test_failed_wrap_keeps_chain() {
        let mut chain = WrapChain::with_config(text(), ChainConfig::default().max_links(2)).unwrap();
        chain.wrap(WrapLink::wrapper("SMSDecorator")).unwrap();

        let result = chain.wrap(WrapLink::wrapper("FacebookDecorator")).map(|_| ());
        assert!(matches!(result, Err(ChainError::CapacityExceeded(2))));
        assert_eq!(chain.handle(""), "SMSDecorator(Text notifier)");
        assert_eq!(chain.depth(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        for max_links in [0, MAX_LINKS_CEILING + 1] {
            let config = ChainConfig::default().max_links(max_links);
            assert!(matches!(
                WrapChain::with_config(text(), config.clone()),
                Err(ChainError::InvalidConfiguration(_))
            ));
            assert!(matches!(
                WrapChain::builder().config(config).base(text()).build(),
                Err(ChainError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_depth_at_capacity_ceiling() {
        let chain = (1..MAX_LINKS_CEILING)
            .fold(
                WrapChain::builder()
                    .config(ChainConfig::default().max_links(MAX_LINKS_CEILING))
                    .base(WrapLink::base("Core", BaseValue::Request)),
                |builder, _| builder.wrap(WrapLink::wrapper("W")),
            )
            .build()
            .unwrap();

        let wrappers = MAX_LINKS_CEILING - 1;
        let expected = format!("{}x{}", "W(".repeat(wrappers), ")".repeat(wrappers));
        assert_eq!(chain.depth(), wrappers);
        assert_eq!(chain.handle("x"), expected);
    }
}
