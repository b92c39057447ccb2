//! # delegate-rs
//!
//! Linked delegation chains in Rust. One link abstraction drives two classic
//! patterns:
//!
//! - **Filter chains** (chain-of-responsibility): the first link whose
//!   predicate matches answers the request; if none does, the result is
//!   `None`.
//! - **Wrap chains** (decorator): every wrapper forwards the request inwards
//!   and transforms the reply coming back; the innermost base link always
//!   produces a value.
//!
//! ## 🏗️ Feature Architecture
//!
//! ### Core (always available)
//! - `link`: the [`Link`] trait, [`LinkId`] handles and the [`Next`] continuation
//! - `chain`: the [`Chain`] arena, successor wiring with cycle rejection, sub-chains
//! - `filter` / `wrap`: the two chain modes
//! - `config` / `error`: [`ChainConfig`] and [`ChainError`]
//!
//! ### Built-in Components
//! - `catalog` (default): the automation handlers and notifiers used by the demos
//!
//! ## Example
//!
//! ```rust
//! use delegate_rs::prelude::*;
//!
//! let automations = FilterChain::builder()
//!     .link(FilterLink::equals("AutomationA", "A"))
//!     .link(FilterLink::equals("AutomationB", "B"))
//!     .build()?;
//! assert_eq!(automations.handle("A").as_deref(), Some("AutomationA: A"));
//! assert_eq!(automations.handle("Z"), None);
//!
//! let notifier = WrapChain::builder()
//!     .base(WrapLink::base("TextNotifier", BaseValue::fixed("Text notifier")))
//!     .wrap(WrapLink::wrapper("SMSDecorator"))
//!     .build()?;
//! assert_eq!(notifier.handle(""), "SMSDecorator(Text notifier)");
//! # Ok::<(), ChainError>(())
//! ```

// ============================================================================
// CORE MODULES (always available)
// ============================================================================

pub mod chain;
pub mod config;
pub mod error;
pub mod filter;
pub mod link;
pub mod wrap;

/// Demo domain (feature: `catalog`)
#[cfg(feature = "catalog")]
pub mod catalog;

// ============================================================================
// CORE RE-EXPORTS
// ============================================================================

pub use chain::{Chain, Linker, SubChain, Walk};
pub use config::{ChainConfig, MAX_LINKS_CEILING};
pub use error::{ChainError, ChainResult};
pub use filter::{Dispatch, FilterChain, FilterChainBuilder, FilterLink, Predicate, ReplyFormat};
pub use link::{Link, LinkId, Next};
pub use wrap::{BaseValue, Transform, WrapChain, WrapChainBuilder, WrapLink};

/// Convenient re-exports for common types and traits
pub mod prelude {
    pub use crate::{
        BaseValue, Chain, ChainConfig, ChainError, ChainResult, Dispatch, FilterChain,
        FilterLink, Link, LinkId, Next, Predicate, ReplyFormat, SubChain, Transform, WrapChain,
        WrapLink,
    };

    #[cfg(feature = "catalog")]
    pub use crate::catalog::{DEMO_REQUESTS, Notifier, automation_chain, notify, text_notifier};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_chains_are_shareable() {
        assert_send_sync::<FilterChain>();
        assert_send_sync::<WrapChain>();
        assert_send_sync::<Chain<FilterLink>>();
    }

    #[test]
    fn test_handle_is_idempotent() {
        let filter = FilterChain::builder()
            .link(FilterLink::equals("AutomationA", "A"))
            .build()
            .unwrap();
        assert_eq!(filter.handle("A"), filter.handle("A"));
        assert_eq!(filter.handle("B"), filter.handle("B"));

        let mut wrap = WrapChain::new(WrapLink::base("Echo", BaseValue::Request)).unwrap();
        wrap.wrap(WrapLink::wrapper("Twice")).unwrap();
        assert_eq!(wrap.handle("x"), wrap.handle("x"));
    }
}
