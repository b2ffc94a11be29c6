//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for every shape, flow and container
//! in a converted diagram, together with the XML-name sanitization applied to
//! identifiers taken from an export.

use std::{
    borrow::Cow,
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Prefix given to identifiers that would otherwise start with a digit.
pub const SANITIZED_PREFIX: &str = "id_";

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Efficient identifier type using string interning
///
/// Identifiers are `Copy`, so containers and flow indexes refer to shapes
/// by `Id` without owning them.
///
/// # Examples
///
/// ```
/// use bpmnport_core::identifier::Id;
///
/// let task = Id::new("sid-7E1F");
/// assert_eq!(task, "sid-7E1F");
///
/// let numeric = Id::sanitized("123");
/// assert_eq!(numeric, "id_123");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str, exactly as given.
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// Creates an `Id` from a raw export identifier, applying [`sanitize`].
    pub fn sanitized(raw: &str) -> Self {
        Self::new(&sanitize(raw))
    }

    /// Creates a new `Id` by appending `suffix` to this identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use bpmnport_core::identifier::Id;
    ///
    /// let event = Id::new("StartEvent_1");
    /// assert_eq!(event.with_suffix("_def"), "StartEvent_1_def");
    /// ```
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let base = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let name = format!("{base}{suffix}");
        let symbol = interner.get_or_intern(&name);
        Self(symbol)
    }
}

/// Makes an export identifier usable as an XML name.
///
/// Identifiers that begin with an ASCII digit get the [`SANITIZED_PREFIX`];
/// everything else passes through unchanged.
///
/// # Examples
///
/// ```
/// use bpmnport_core::identifier::sanitize;
///
/// assert_eq!(sanitize("123"), "id_123");
/// assert_eq!(sanitize("sid-123"), "sid-123");
/// assert_eq!(sanitize(""), "");
/// ```
pub fn sanitize(raw: &str) -> Cow<'_, str> {
    match raw.chars().next() {
        Some(first) if first.is_ascii_digit() => Cow::Owned(format!("{SANITIZED_PREFIX}{raw}")),
        _ => Cow::Borrowed(raw),
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
