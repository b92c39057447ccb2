//! Ready-made chains for the demo domain
//!
//! This module provides the concrete links used by the walkthroughs in
//! `demos/`:
//!
//! - Automation handlers (`AutomationA`, `AutomationB`, `AutomationC`)
//! - Notifiers (`TextNotifier` wrapped by SMS, Facebook and Slack decorators)
//!
//! Enabled by the `catalog` feature.

use crate::config::ChainConfig;
use crate::error::ChainResult;
use crate::filter::{FilterChain, FilterLink, ReplyFormat};
use crate::wrap::{BaseValue, WrapChain, WrapLink};

// ============================================================================
// AUTOMATION HANDLERS
// ============================================================================

/// Requests sent by the automation walkthrough
pub const DEMO_REQUESTS: [&str; 4] = ["A", "D", "B", "C"];

/// `AutomationA > AutomationB > AutomationC`, each answering its own letter.
///
/// With `legacy_reply_format` set, `AutomationC` replies `"AutomationC C"`
/// like the first release of the demo did.
pub fn automation_chain(config: &ChainConfig) -> ChainResult<FilterChain> {
    let c_format = if config.legacy_reply_format {
        ReplyFormat::Bare
    } else {
        ReplyFormat::Colon
    };

    FilterChain::builder()
        .config(config.clone())
        .link(FilterLink::equals("AutomationA", "A"))
        .link(FilterLink::equals("AutomationB", "B"))
        .link(FilterLink::equals("AutomationC", "C").with_format(c_format))
        .build()
}

// ============================================================================
// NOTIFIERS
// ============================================================================

/// Decorators available around the text notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notifier {
    Sms,
    Facebook,
    Slack,
}

impl Notifier {
    pub fn name(&self) -> &'static str {
        match self {
            Notifier::Sms => "SMSDecorator",
            Notifier::Facebook => "FacebookDecorator",
            Notifier::Slack => "SlackDecorator",
        }
    }

    fn link(&self) -> WrapLink {
        WrapLink::wrapper(self.name())
    }
}

/// The undecorated notifier
pub fn text_notifier() -> ChainResult<WrapChain> {
    WrapChain::new(WrapLink::base(
        "TextNotifier",
        BaseValue::fixed("Text notifier"),
    ))
}

/// Text notifier wrapped by `layers`, first entry innermost
pub fn notify(layers: &[Notifier]) -> ChainResult<WrapChain> {
    let mut chain = text_notifier()?;
    for layer in layers {
        chain.wrap(layer.link())?;
    }
    Ok(chain)
}
