//! Interned type identities.
//!
//! Every type in a hierarchy is keyed by its qualified name. [`TypeId`]
//! interns that name once so identities are `Copy`, cheap to hash and cheap
//! to compare, which matters because the layout engine looks them up in
//! several side tables per symbol.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::Deserialize;
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by all diagrams of the process.
///
/// # Thread Safety
///
/// Diagrams may be rendered concurrently, so access goes through a `Mutex`.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// The identity of a type: its interned qualified name.
///
/// # Examples
///
/// ```
/// use lineage_core::identifier::TypeId;
///
/// let shape = TypeId::new("geo.Shape");
/// assert_eq!(shape, TypeId::new("geo.Shape"));
/// assert_eq!(shape, "geo.Shape");
/// assert_eq!(shape.simple_name(), "Shape");
/// assert_eq!(shape.package(), Some("geo".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub struct TypeId(DefaultSymbol);

impl TypeId {
    /// Creates a `TypeId` from a qualified name.
    pub fn new(qualified_name: &str) -> Self {
        Self(with_interner(|interner| {
            interner.get_or_intern(qualified_name)
        }))
    }

    /// Returns the qualified name this identity was created from.
    pub fn qualified_name(&self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        })
    }

    /// Returns the last dot-separated segment of the qualified name.
    pub fn simple_name(&self) -> String {
        let qualified = self.qualified_name();
        match qualified.rsplit_once('.') {
            Some((_, simple)) => simple.to_string(),
            None => qualified,
        }
    }

    /// Returns everything before the last dot, if the name has a package.
    pub fn package(&self) -> Option<String> {
        self.qualified_name()
            .rsplit_once('.')
            .map(|(package, _)| package.to_string())
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.qualified_name();
        write!(f, "{name}")
    }
}

impl From<&str> for TypeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl PartialEq<&str> for TypeId {
    fn eq(&self, other: &&str) -> bool {
        self.qualified_name() == *other
    }
}

impl PartialEq<str> for TypeId {
    fn eq(&self, other: &str) -> bool {
        self.qualified_name() == other
    }
}
