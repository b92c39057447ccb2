//! # Link Abstraction
//!
//! A [`Link`] is one node of a delegation chain. When a request reaches a
//! link it receives the request together with a [`Next`] continuation that
//! points at its successor. What the link does with the continuation is the
//! only difference between the two chain modes:
//!
//! - **decide, then forward**: a filter link answers when its predicate
//!   matches and only calls `next.run(..)` otherwise
//!   (chain-of-responsibility).
//! - **forward, then decide**: a wrapping link calls `next.run(..)` first and
//!   transforms whatever comes back (decorator).
//!
//! Links never own their successor. The [`Chain`](crate::Chain) arena owns
//! every link, and a link's successor is a [`LinkId`] set once during
//! assembly.
//!
//! ## Implementing a link
//!
//! ```rust
//! use delegate_rs::{Chain, Link, Next};
//!
//! struct Upper;
//!
//! impl Link for Upper {
//!     type Request = str;
//!     type Output = String;
//!
//!     fn name(&self) -> &str {
//!         "Upper"
//!     }
//!
//!     fn handle(&self, request: &str, next: Next<'_, Self>) -> String {
//!         next.run(request).to_uppercase()
//!     }
//!
//!     fn end_of_chain(request: &str) -> String {
//!         request.to_string()
//!     }
//! }
//!
//! let mut chain = Chain::new();
//! let head = chain.add(Upper).unwrap();
//! assert_eq!(chain.handle_from(head, "quiet").unwrap(), "QUIET");
//! ```

use crate::chain::Chain;
use std::fmt;
use uuid::Uuid;

/// Handle to a link inside one [`Chain`] instance.
///
/// Ids carry the id of the chain that minted them, so passing a handle to a
/// different chain is reported as [`ChainError::UnknownLink`](crate::ChainError::UnknownLink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId {
    chain: Uuid,
    index: usize,
}

impl LinkId {
    pub(crate) fn new(chain: Uuid, index: usize) -> Self {
        Self { chain, index }
    }

    pub(crate) fn chain(&self) -> Uuid {
        self.chain
    }

    /// Position of the link in assembly order
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Core trait for a node of a delegation chain.
pub trait Link: Send + Sync + Sized {
    /// Input passed down the chain
    type Request: ?Sized;
    /// What a link produces for a request
    type Output;

    /// Name used in replies, descriptions and logs
    fn name(&self) -> &str;

    /// Handle a request. `next` forwards it to the successor.
    fn handle(&self, request: &Self::Request, next: Next<'_, Self>) -> Self::Output;

    /// What forwarding past the last link yields
    fn end_of_chain(request: &Self::Request) -> Self::Output;

    /// Whether `set_next` may give this link a successor
    fn accepts_successor(&self) -> bool {
        true
    }

    /// Whether the link is incomplete without a successor
    fn requires_successor(&self) -> bool {
        false
    }
}

/// Continuation handed to [`Link::handle`], pointing at the successor.
pub struct Next<'a, L> {
    chain: &'a Chain<L>,
    successor: Option<LinkId>,
}

impl<'a, L: Link> Next<'a, L> {
    pub(crate) fn new(chain: &'a Chain<L>, successor: Option<LinkId>) -> Self {
        Self { chain, successor }
    }

    /// Forward the request to the successor, or end the chain
    pub fn run(self, request: &L::Request) -> L::Output {
        match self.successor {
            Some(id) => self.chain.dispatch(id, request),
            None => L::end_of_chain(request),
        }
    }

    /// True when there is no successor to forward to
    pub fn is_end(&self) -> bool {
        self.successor.is_none()
    }

    /// The link the request would be forwarded to
    pub fn peek(&self) -> Option<&'a L> {
        self.successor.and_then(|id| self.chain.get(id))
    }
}
