pub const LITERALS: &[&str] = &["null", "true", "false"];

/// Default arena page capacity in bytes.
pub const DEFAULT_PAGE_BYTES: usize = 16 * 1024;

/// Inline capacity of the open-container stack before it spills to the heap.
pub const INLINE_DEPTH: usize = 32;

#[inline]
pub fn is_structural_byte(byte: u8) -> bool {
    matches!(byte, b'{' | b'}' | b'[' | b']' | b',')
}

#[inline]
pub fn is_quote(byte: u8) -> bool {
    matches!(byte, b'"' | b'\'')
}

/// Whitespace as the scanner sees it. Form feeds and vertical tabs are content.
#[inline]
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

#[inline]
pub fn is_literal(s: &str) -> bool {
    LITERALS.contains(&s)
}
