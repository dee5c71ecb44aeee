//! # The Forge: Content Identity Engine
//!
//! Computes a 128-bit content digest over the **verbatim** source text of a
//! code unit (a Python function or class definition) and groups units that
//! share a digest into [`DuplicateGroup`]s.
//!
//! ## Exact-Match Rule
//! Nothing is normalized. Whitespace, comments, docstrings and identifier
//! names all contribute to the digest, so two definitions group together only
//! when their text is byte-identical:
//!
//! ```
//! use forge::content_digest;
//!
//! let a = content_digest("def add(a, b):\n    return a + b");
//! let b = content_digest("def add(a, b):\n    return a + b");
//! let c = content_digest("def add(a, b):\n    return a+b");
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! ```

pub mod index;

pub use index::{DigestIndex, DuplicateGroup, Location};

use serde::{Serialize, Serializer};
use std::fmt;

/// Kind of a code unit.
///
/// Ordering is significant: functions sort before classes when duplicate
/// groups are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// `def foo(): ...` or `async def foo(): ...`, at any nesting depth.
    Function,
    /// `class Foo: ...`
    Class,
}

impl UnitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Function => "function",
            UnitKind::Class => "class",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 128-bit content fingerprint (BLAKE3 truncated to 16 bytes).
///
/// Serializes as a 32-character lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentDigest([u8; 16]);

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Computes the content digest of `text`.
///
/// Truncates the 256-bit BLAKE3 digest to its first 16 bytes.
pub fn content_digest(text: &str) -> ContentDigest {
    let digest = blake3::hash(text.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest.as_bytes()[..16]);
    ContentDigest(bytes)
}

/// A named function or class definition extracted from a source file.
///
/// Created once during extraction and never mutated. The digest is computed
/// from `text` at construction, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnit {
    kind: UnitKind,
    file: String,
    start_line: u32,
    text: String,
    digest: ContentDigest,
}

impl CodeUnit {
    /// Builds a unit and digests its text.
    ///
    /// `file` is the normalized owning path; `start_line` is 1-indexed.
    pub fn new(kind: UnitKind, file: impl Into<String>, start_line: u32, text: String) -> Self {
        let digest = content_digest(&text);
        Self {
            kind,
            file: file.into(),
            start_line,
            text,
            digest,
        }
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    /// Last line of the unit: the start line plus the number of `\n` in its text.
    ///
    /// ```
    /// use forge::{CodeUnit, UnitKind};
    ///
    /// let unit = CodeUnit::new(UnitKind::Function, "a.py", 3, "def f():\n    pass".into());
    /// assert_eq!(unit.end_line(), 4);
    /// ```
    pub fn end_line(&self) -> u32 {
        let newlines = self.text.bytes().filter(|&b| b == b'\n').count() as u32;
        self.start_line.saturating_add(newlines)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn digest(&self) -> ContentDigest {
        self.digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_same_digest() {
        let src = "def foo(x):\n    return x * 2\n";
        assert_eq!(content_digest(src), content_digest(src));
    }

    #[test]
    fn test_whitespace_breaks_match() {
        let h1 = content_digest("def add(a, b):\n    return a + b");
        let h2 = content_digest("def add(a, b):\n        return a + b");
        assert_ne!(h1, h2, "Indentation differences must produce different digests");
    }

    #[test]
    fn test_renamed_identifier_differs() {
        let h1 = content_digest("def add(a, b):\n    return a + b");
        let h2 = content_digest("def add(x, y):\n    return x + y");
        assert_ne!(h1, h2, "Exact-match digests do not normalize names");
    }

    #[test]
    fn test_digest_hex_display() {
        let hex = content_digest("class A:\n    pass").to_string();
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_digest_serializes_as_hex_string() {
        let digest = content_digest("x");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{digest}\""));
    }

    #[test]
    fn test_unit_end_line_single_line() {
        let unit = CodeUnit::new(UnitKind::Function, "a.py", 7, "def f(): pass".into());
        assert_eq!(unit.end_line(), 7);
    }

    #[test]
    fn test_unit_digest_matches_text() {
        let unit = CodeUnit::new(UnitKind::Class, "m.py", 1, "class A:\n    x = 1".into());
        assert_eq!(unit.digest(), content_digest("class A:\n    x = 1"));
        assert_eq!(unit.kind(), UnitKind::Class);
        assert_eq!(unit.file(), "m.py");
    }

    #[test]
    fn test_kind_ordering_functions_first() {
        assert!(UnitKind::Function < UnitKind::Class);
        assert_eq!(UnitKind::Class.to_string(), "class");
    }
}
