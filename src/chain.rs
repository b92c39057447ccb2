//! # Chain Assembly and Dispatch
//!
//! [`Chain`] is the arena that owns every link of one chain instance. Links
//! are added individually, then wired with [`Chain::set_next`] (or the fluent
//! [`Linker`]) by client code. A successor is set once and never re-pointed.
//!
//! ## Assembly guarantees
//!
//! `set_next` refuses, leaving the chain untouched:
//! - ids minted by another chain (`UnknownLink`)
//! - re-pointing a link that already forwards elsewhere (`SuccessorAlreadySet`)
//! - a successor on a link that does not accept one (`InvalidConfiguration`)
//! - a successor whose own chain leads back to the link, including the link
//!   itself (`CycleDetected`)
//!
//! Since cycles cannot be built, every walk from a head terminates. The
//! recursion depth of a dispatch is bounded by the chain length, which
//! [`ChainConfig::max_links`] caps at [`MAX_LINKS_CEILING`].
//!
//! [`MAX_LINKS_CEILING`]: crate::config::MAX_LINKS_CEILING
//!
//! ## Sub-chains
//!
//! Any link can serve as a head. [`Chain::sub_chain`] returns a view that
//! dispatches from an interior link, never consulting the links before it.

use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};
use crate::link::{Link, LinkId, Next};
use uuid::Uuid;

struct Slot<L> {
    link: L,
    next: Option<LinkId>,
}

/// Arena owning the links of one chain instance
pub struct Chain<L> {
    id: Uuid,
    slots: Vec<Slot<L>>,
    config: ChainConfig,
}

impl<L: Link> Default for Chain<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Link> Chain<L> {
    /// Create an empty chain with the default configuration
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            slots: Vec::new(),
            config: ChainConfig::default(),
        }
    }

    /// Create an empty chain with a custom configuration.
    ///
    /// Fails with `InvalidConfiguration` when `config` does not validate.
    pub fn with_config(config: ChainConfig) -> ChainResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Take ownership of a link. It starts without a successor.
    pub fn add(&mut self, link: L) -> ChainResult<LinkId> {
        if self.slots.len() >= self.config.max_links {
            tracing::warn!(
                chain = %self.config.label,
                link = link.name(),
                max_links = self.config.max_links,
                "chain is full"
            );
            return Err(ChainError::CapacityExceeded(self.config.max_links));
        }

        let id = LinkId::new(self.id, self.slots.len());
        tracing::debug!(chain = %self.config.label, link = link.name(), %id, "link added");
        self.slots.push(Slot { link, next: None });
        Ok(id)
    }

    /// Get a link by id
    pub fn get(&self, id: LinkId) -> Option<&L> {
        self.slot(id).ok().map(|slot| &slot.link)
    }

    /// The successor of a link, if one was set
    pub fn successor(&self, id: LinkId) -> Option<LinkId> {
        self.slot(id).ok().and_then(|slot| slot.next)
    }

    /// All ids in assembly order
    pub fn ids(&self) -> impl Iterator<Item = LinkId> + '_ {
        (0..self.slots.len()).map(|index| LinkId::new(self.id, index))
    }

    /// First link (in assembly order) with the given name
    pub fn find(&self, name: &str) -> Option<LinkId> {
        self.ids()
            .zip(&self.slots)
            .find(|(_, slot)| slot.link.name() == name)
            .map(|(id, _)| id)
    }

    /// Make `to` the successor of `from` and return `to`.
    ///
    /// Setting the successor a link already has is a no-op.
    pub fn set_next(&mut self, from: LinkId, to: LinkId) -> ChainResult<LinkId> {
        let from_slot = self.slot(from)?;
        self.slot(to)?;

        if let Some(existing) = from_slot.next {
            if existing == to {
                return Ok(to);
            }
            tracing::warn!(chain = %self.config.label, link = %from, %existing, "successor already set");
            return Err(ChainError::SuccessorAlreadySet {
                link: from,
                existing,
            });
        }

        if !from_slot.link.accepts_successor() {
            return Err(ChainError::invalid(format!(
                "link '{}' cannot forward to a successor",
                from_slot.link.name()
            )));
        }

        if let Some(path) = self.cycle_path(from, to) {
            tracing::warn!(chain = %self.config.label, path = %path.join(" -> "), "cycle rejected");
            return Err(ChainError::CycleDetected(path));
        }

        tracing::debug!(chain = %self.config.label, %from, %to, "successor set");
        self.slots[from.index()].next = Some(to);
        Ok(to)
    }

    /// Start fluent assembly at `id`
    pub fn link(&mut self, id: LinkId) -> ChainResult<Linker<'_, L>> {
        self.slot(id)?;
        Ok(Linker { chain: self, id })
    }

    /// Iterate from `head` following successors
    pub fn walk(&self, head: LinkId) -> Walk<'_, L> {
        let cursor = self.slot(head).ok().map(|_| head);
        Walk { chain: self, cursor }
    }

    /// Link names from `head`, joined with `" > "`
    pub fn describe(&self, head: LinkId) -> String {
        self.walk(head)
            .map(|(_, link)| link.name())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Check that every link reachable from `head` is complete
    pub fn validate(&self, head: LinkId) -> ChainResult<()> {
        self.slot(head)?;

        for (id, link) in self.walk(head) {
            if link.requires_successor() && self.successor(id).is_none() {
                return Err(ChainError::invalid(format!(
                    "link '{}' has no inner link to delegate to",
                    link.name()
                )));
            }
        }

        Ok(())
    }

    /// Dispatch a request starting at `id`
    pub fn handle_from(&self, id: LinkId, request: &L::Request) -> ChainResult<L::Output> {
        self.slot(id)?;
        Ok(self.dispatch(id, request))
    }

    /// View of the chain starting at an interior link
    pub fn sub_chain(&self, head: LinkId) -> ChainResult<SubChain<'_, L>> {
        self.slot(head)?;
        Ok(SubChain { chain: self, head })
    }

    /// `id` must come from this chain
    pub(crate) fn dispatch(&self, id: LinkId, request: &L::Request) -> L::Output {
        let slot = &self.slots[id.index()];
        tracing::trace!(chain = %self.config.label, link = slot.link.name(), "dispatch");
        slot.link.handle(request, Next::new(self, slot.next))
    }

    fn slot(&self, id: LinkId) -> ChainResult<&Slot<L>> {
        if id.chain() != self.id {
            return Err(ChainError::UnknownLink(id));
        }
        self.slots.get(id.index()).ok_or(ChainError::UnknownLink(id))
    }

    /// Names along the loop `from -> to -> ... -> from`, if `to` leads back
    fn cycle_path(&self, from: LinkId, to: LinkId) -> Option<Vec<String>> {
        let mut path = vec![self.slots[from.index()].link.name().to_string()];

        for (id, link) in self.walk(to) {
            path.push(link.name().to_string());
            if id == from {
                return Some(path);
            }
        }

        None
    }
}

/// Fluent assembler returned by [`Chain::link`]
pub struct Linker<'a, L> {
    chain: &'a mut Chain<L>,
    id: LinkId,
}

impl<'a, L: Link> Linker<'a, L> {
    /// Set the successor and continue assembly from it
    pub fn set_next(self, to: LinkId) -> ChainResult<Linker<'a, L>> {
        let to = self.chain.set_next(self.id, to)?;
        Ok(Linker {
            chain: self.chain,
            id: to,
        })
    }

    /// The link assembly currently points at
    pub fn id(&self) -> LinkId {
        self.id
    }
}

/// Iterator over `(id, link)` pairs following successors
pub struct Walk<'a, L> {
    chain: &'a Chain<L>,
    cursor: Option<LinkId>,
}

impl<'a, L: Link> Iterator for Walk<'a, L> {
    type Item = (LinkId, &'a L);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let chain = self.chain;
        let slot = &chain.slots[id.index()];
        self.cursor = slot.next;
        Some((id, &slot.link))
    }
}

/// A chain viewed from one of its links
pub struct SubChain<'a, L> {
    pub(crate) chain: &'a Chain<L>,
    pub(crate) head: LinkId,
}

impl<'a, L: Link> SubChain<'a, L> {
    pub fn handle(&self, request: &L::Request) -> L::Output {
        self.chain.dispatch(self.head, request)
    }

    pub fn head(&self) -> LinkId {
        self.head
    }

    pub fn describe(&self) -> String {
        self.chain.describe(self.head)
    }

    pub fn walk(&self) -> Walk<'a, L> {
        self.chain.walk(self.head)
    }
}
