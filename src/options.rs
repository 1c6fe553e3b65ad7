use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAGE_BYTES;

/// Order in which siblings are linked while the tree is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Append each child at the tail; siblings keep source order.
    #[default]
    Forward,
    /// Prepend each child at the head; siblings come out in reverse source order.
    Reverse,
}

impl ParseMode {
    pub fn is_reverse(self) -> bool {
        matches!(self, ParseMode::Reverse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Capacity of a regular page in bytes.
    pub page_bytes: usize,
    /// Upper bound on the number of pages; `None` grows until the host refuses.
    pub max_pages: Option<usize>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            page_bytes: DEFAULT_PAGE_BYTES,
            max_pages: None,
        }
    }
}

impl ArenaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_bytes(mut self, page_bytes: usize) -> Self {
        self.page_bytes = page_bytes;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub mode: ParseMode,
    pub arena: ArenaConfig,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forward() -> Self {
        Self::default()
    }

    pub fn reverse() -> Self {
        Self::default().with_mode(ParseMode::Reverse)
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }

    pub fn with_page_bytes(mut self, page_bytes: usize) -> Self {
        self.arena.page_bytes = page_bytes;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.arena.max_pages = max_pages;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.mode, ParseMode::Forward);
        assert_eq!(options.arena.page_bytes, DEFAULT_PAGE_BYTES);
        assert_eq!(options.arena.max_pages, None);
    }

    #[rstest::rstest]
    fn test_builders() {
        let options = ParseOptions::reverse()
            .with_page_bytes(256)
            .with_max_pages(Some(4));
        assert!(options.mode.is_reverse());
        assert_eq!(options.arena, ArenaConfig::new().with_page_bytes(256).with_max_pages(Some(4)));
    }

    #[rstest::rstest]
    fn test_deserialize_partial_config() {
        let options: ParseOptions =
            serde_json::from_str(r#"{"mode":"reverse","arena":{"max_pages":8}}"#).unwrap();
        assert_eq!(options.mode, ParseMode::Reverse);
        assert_eq!(options.arena.page_bytes, DEFAULT_PAGE_BYTES);
        assert_eq!(options.arena.max_pages, Some(8));
    }
}
