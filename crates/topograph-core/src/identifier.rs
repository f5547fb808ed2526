//! Interned identifiers for diagram entities.
//!
//! Node and cluster identifiers are compared and hashed constantly while a
//! graph is being built (uniqueness checks, edge resolution), so they are
//! stored once in a global string interner and passed around as a copyable
//! [`Id`] symbol.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Separator placed between the segments of a fully-qualified path.
pub const PATH_SEPARATOR: &str = "::";

static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Identifier of a node or cluster.
///
/// # Examples
///
/// ```
/// use topograph_core::identifier::Id;
///
/// let vpc = Id::new("vpc");
/// let nodes = Id::new("nodes_a");
///
/// assert_eq!(vpc.create_nested(nodes), "vpc::nodes_a");
/// assert_eq!(Id::from_anonymous(3), "__3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates an identifier for an entity the caller did not name.
    ///
    /// The `__` prefix keeps generated identifiers out of the way of
    /// ordinary names.
    pub fn from_anonymous(idx: usize) -> Self {
        Self::new(&format!("__{idx}"))
    }

    /// Joins `self` and `child_id` with [`PATH_SEPARATOR`].
    pub fn create_nested(&self, child_id: Id) -> Self {
        let mut interner = interner();
        let nested = format!(
            "{}{PATH_SEPARATOR}{}",
            interner.resolve(self.0).unwrap_or_default(),
            interner.resolve(child_id.0).unwrap_or_default(),
        );
        Self(interner.get_or_intern(nested))
    }

    /// Returns `true` if `self` can stand as one segment of a path: it is
    /// non-empty and does not contain [`PATH_SEPARATOR`].
    pub fn is_path_segment(&self) -> bool {
        interner()
            .resolve(self.0)
            .is_some_and(|name| !name.is_empty() && !name.contains(PATH_SEPARATOR))
    }

    /// Returns `true` for identifiers produced by [`Id::from_anonymous`].
    pub fn is_anonymous(&self) -> bool {
        interner()
            .resolve(self.0)
            .and_then(|name| name.strip_prefix("__"))
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = interner().resolve(self.0).map(str::to_owned);
        f.write_str(name.as_deref().unwrap_or_default())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
