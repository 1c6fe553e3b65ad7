//! Paged bump arena for tree nodes.
//!
//! Slots are handed out from the tail page until it is full, then a new page
//! is chained on. Nothing is freed per slot: the whole chain goes at once.

use std::mem::size_of;
use std::ops::{Index, IndexMut};

use log::trace;

use crate::options::ArenaConfig;
use crate::{Error, Result};

/// Stable address of a slot: page index plus slot index within the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    page: u32,
    slot: u32,
}

impl NodeId {
    pub(crate) fn new(page: usize, slot: usize) -> Self {
        Self {
            page: page as u32,
            slot: slot as u32,
        }
    }

    pub fn page(self) -> usize {
        self.page as usize
    }

    pub fn slot(self) -> usize {
        self.slot as usize
    }
}

#[derive(Debug)]
struct Page<T> {
    slots: Vec<T>,
    capacity: usize,
}

impl<T> Page<T> {
    fn remaining(&self) -> usize {
        self.capacity - self.slots.len()
    }
}

#[derive(Debug)]
pub struct Arena<T> {
    pages: Vec<Page<T>>,
    page_slots: usize,
    max_pages: Option<usize>,
    len: usize,
}

impl<T: Default> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> Arena<T> {
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    pub fn with_config(config: ArenaConfig) -> Self {
        let page_slots = (config.page_bytes / size_of::<T>().max(1)).max(1);
        Self {
            pages: Vec::new(),
            page_slots,
            max_pages: config.max_pages,
            len: 0,
        }
    }

    /// Allocates one default-initialised slot.
    pub fn alloc(&mut self) -> Result<NodeId> {
        self.alloc_block(1)
    }

    /// Allocates `len` contiguous default-initialised slots on a single page
    /// and returns the id of the first one.
    ///
    /// A block larger than the regular page size gets a page of its own.
    pub fn alloc_block(&mut self, len: usize) -> Result<NodeId> {
        let len = len.max(1);
        let fits = self
            .pages
            .last()
            .is_some_and(|page| page.remaining() >= len);
        if !fits {
            self.grow(len)?;
        }

        let page_idx = self.pages.len() - 1;
        let page = &mut self.pages[page_idx];
        let slot = page.slots.len();
        page.slots.resize_with(slot + len, T::default);
        self.len += len;
        Ok(NodeId::new(page_idx, slot))
    }

    fn grow(&mut self, len: usize) -> Result<()> {
        let capacity = self.page_slots.max(len);
        let requested = capacity.saturating_mul(size_of::<T>());
        if self
            .max_pages
            .is_some_and(|max_pages| self.pages.len() >= max_pages)
        {
            return Err(Error::allocation(requested));
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| Error::allocation(requested))?;
        trace!(
            "arena page {} opened with {capacity} slots ({requested} bytes)",
            self.pages.len()
        );
        self.pages.push(Page { slots, capacity });
        Ok(())
    }
}

impl<T> Arena<T> {
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.pages.get(id.page())?.slots.get(id.slot())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.pages.get_mut(id.page())?.slots.get_mut(id.slot())
    }

    /// Number of slots handed out.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total slots across every page, used or not.
    pub fn capacity(&self) -> usize {
        self.pages.iter().map(|page| page.capacity).sum()
    }

    pub fn allocated_bytes(&self) -> usize {
        self.capacity().saturating_mul(size_of::<T>())
    }

    /// Frees every page. Calling it again is a no-op.
    pub fn release(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        trace!("arena released {} pages", self.pages.len());
        self.pages = Vec::new();
        self.len = 0;
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.pages[id.page()].slots[id.slot()]
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.pages[id.page()].slots[id.slot()]
    }
}
