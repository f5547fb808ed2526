//! Flat identifier registry shared by every scope of a session.

use indexmap::IndexMap;
use log::trace;

use topograph_core::identifier::Id;

use crate::error::TopographError;

/// What an identifier was registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EntityKind {
    Node,
    Cluster,
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    kind: EntityKind,
    path: Id,
}

/// Maps every identifier declared in a session to its kind and
/// fully-qualified path, in declaration order.
///
/// Uniqueness is checked here at insertion time so that a collision is
/// reported by the call that caused it. Caller-chosen identifiers of nodes
/// and clusters share one namespace. Identifiers generated for unnamed
/// clusters live in a table of their own: they only have to stay clear of
/// other cluster identifiers, so a caller may still name a node `__0`.
#[derive(Debug, Default)]
pub(super) struct Registry {
    entries: IndexMap<Id, Registration>,
    generated: IndexMap<Id, Id>,
}

impl Registry {
    /// Records the caller-chosen `id` under `path`.
    ///
    /// # Errors
    ///
    /// - [`TopographError::InvalidId`] if `id` is empty or contains `::`.
    /// - [`TopographError::DuplicateId`] if `id` is already taken; the
    ///   existing entry is left untouched.
    pub(super) fn register(
        &mut self,
        id: Id,
        kind: EntityKind,
        path: Id,
    ) -> Result<(), TopographError> {
        if !id.is_path_segment() {
            return Err(TopographError::InvalidId(id));
        }

        let existing = match kind {
            EntityKind::Node => self.entries.get(&id).map(|entry| entry.path),
            EntityKind::Cluster => self
                .entries
                .get(&id)
                .map(|entry| entry.path)
                .or_else(|| self.generated.get(&id).copied()),
        };
        if let Some(existing) = existing {
            return Err(TopographError::DuplicateId { id, existing });
        }

        trace!(id = id.to_string(), path = path.to_string(), kind:?; "Registering identifier");
        self.entries.insert(id, Registration { kind, path });
        Ok(())
    }

    /// Picks the first `__n` identifier at or after `*next` that is not
    /// taken, records it as an unnamed cluster under the path built by
    /// `qualify`, and advances `*next` past it.
    pub(super) fn register_generated(
        &mut self,
        next: &mut usize,
        qualify: impl FnOnce(Id) -> Id,
    ) -> Id {
        let mut id = Id::from_anonymous(*next);
        while self.contains(id) {
            *next += 1;
            id = Id::from_anonymous(*next);
        }
        *next += 1;

        let path = qualify(id);
        trace!(id = id.to_string(), path = path.to_string(); "Registering generated cluster identifier");
        self.generated.insert(id, path);
        id
    }

    /// Returns the path of the node registered under `id`.
    ///
    /// Fails with [`TopographError::Reference`] if `id` is unknown or names a
    /// cluster.
    pub(super) fn resolve_node(&self, id: Id) -> Result<Id, TopographError> {
        match self.entries.get(&id) {
            Some(Registration {
                kind: EntityKind::Node,
                path,
            }) => Ok(*path),
            _ => Err(TopographError::Reference(id)),
        }
    }

    pub(super) fn contains(&self, id: Id) -> bool {
        self.entries.contains_key(&id) || self.generated.contains_key(&id)
    }

    pub(super) fn count(&self, kind: EntityKind) -> usize {
        let named = self
            .entries
            .values()
            .filter(|registration| registration.kind == kind)
            .count();
        match kind {
            EntityKind::Node => named,
            EntityKind::Cluster => named + self.generated.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = Registry::default();
        registry
            .register(Id::new("igw"), EntityKind::Node, Id::new("account::igw"))
            .unwrap();

        assert_eq!(registry.resolve_node(Id::new("igw")).unwrap(), "account::igw");
        assert!(registry.contains(Id::new("igw")));
        assert_eq!(registry.count(EntityKind::Node), 1);
    }

    #[test]
    fn test_duplicate_keeps_existing() {
        let mut registry = Registry::default();
        registry
            .register(Id::new("eks"), EntityKind::Node, Id::new("vpc::eks"))
            .unwrap();

        let err = registry
            .register(Id::new("eks"), EntityKind::Cluster, Id::new("eks"))
            .unwrap_err();

        match err {
            TopographError::DuplicateId { id, existing } => {
                assert_eq!(id, "eks");
                assert_eq!(existing, "vpc::eks");
            }
            other => panic!("Expected DuplicateId, got {other:?}"),
        }
        assert_eq!(registry.resolve_node(Id::new("eks")).unwrap(), "vpc::eks");
        assert_eq!(registry.count(EntityKind::Cluster), 0);
    }

    #[test]
    fn test_cluster_is_not_a_node_reference() {
        let mut registry = Registry::default();
        registry
            .register(Id::new("vpc"), EntityKind::Cluster, Id::new("vpc"))
            .unwrap();

        assert!(matches!(
            registry.resolve_node(Id::new("vpc")),
            Err(TopographError::Reference(_))
        ));
        assert!(matches!(
            registry.resolve_node(Id::new("nowhere")),
            Err(TopographError::Reference(_))
        ));
    }

    #[test]
    fn test_generated_ids_do_not_block_node_names() {
        let mut registry = Registry::default();
        let mut next = 0;
        let generated = registry.register_generated(&mut next, |id| id);

        assert_eq!(generated, "__0");
        assert_eq!(next, 1);
        registry
            .register(Id::new("__0"), EntityKind::Node, Id::new("__0::__0"))
            .unwrap();
        assert_eq!(registry.resolve_node(Id::new("__0")).unwrap(), "__0::__0");

        let err = registry
            .register(Id::new("__0"), EntityKind::Cluster, Id::new("__0"))
            .unwrap_err();
        assert!(matches!(err, TopographError::DuplicateId { .. }));
        assert_eq!(registry.count(EntityKind::Cluster), 1);
    }

    #[test]
    fn test_generated_ids_skip_taken_names() {
        let mut registry = Registry::default();
        registry
            .register(Id::new("__0"), EntityKind::Node, Id::new("__0"))
            .unwrap();
        let mut next = 0;

        assert_eq!(registry.register_generated(&mut next, |id| id), "__1");
        assert_eq!(registry.register_generated(&mut next, |id| id), "__2");
        assert_eq!(next, 3);
    }

    #[test]
    fn test_rejects_path_separator() {
        let mut registry = Registry::default();

        for bad in ["vpc::alb", ""] {
            let err = registry
                .register(Id::new(bad), EntityKind::Node, Id::new(bad))
                .unwrap_err();
            assert!(matches!(err, TopographError::InvalidId(id) if id == bad));
        }
        assert_eq!(registry.count(EntityKind::Node), 0);
    }
}
