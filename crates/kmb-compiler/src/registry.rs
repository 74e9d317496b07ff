//! Join synchronization for nodes with several predecessors.
//!
//! A join record is created the first time a predecessor reaches a node that
//! waits on more than one id: a multi-input layer (one role) or a model
//! (an input role and an output role). Each role keeps a remaining count
//! that is decremented once per distinct declared id; the node is released
//! when every role reaches zero. Arrival order never matters.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use log::trace;

use kmb_core::identifier::NodeId;

/// Outcome of recording one arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arrival {
    /// At least one declared id is still outstanding.
    Pending,
    /// This arrival completed the last outstanding id. Reported once.
    Satisfied,
    /// The arriving id is not declared by any role of the node.
    Undeclared,
}

#[derive(Debug)]
struct RoleJoin {
    declared: IndexSet<NodeId>,
    arrived: HashSet<NodeId>,
    remaining: usize,
}

impl RoleJoin {
    fn new(declared: impl IntoIterator<Item = NodeId>) -> Self {
        let declared: IndexSet<NodeId> = declared.into_iter().collect();
        let remaining = declared.len();
        Self {
            declared,
            arrived: HashSet::new(),
            remaining,
        }
    }
}

#[derive(Debug)]
struct JoinRecord {
    roles: Vec<RoleJoin>,
    released: bool,
}

/// Join records for one compilation.
#[derive(Debug, Default)]
pub(crate) struct JoinRegistry {
    records: HashMap<NodeId, JoinRecord>,
}

impl JoinRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates the join record for `node` unless one already exists.
    ///
    /// Each item of `roles` is one declared predecessor set; an id may appear
    /// in several roles and then counts towards each of them.
    pub(crate) fn register<R>(&mut self, node: NodeId, roles: R)
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = NodeId>,
    {
        self.records.entry(node).or_insert_with(|| {
            let roles: Vec<RoleJoin> = roles.into_iter().map(RoleJoin::new).collect();
            trace!(node:% = node, roles = roles.len(); "Registering join");
            JoinRecord {
                roles,
                released: false,
            }
        });
    }

    /// Records that `from` has been emitted and reached `node`.
    pub(crate) fn arrive(&mut self, node: NodeId, from: NodeId) -> Arrival {
        let Some(record) = self.records.get_mut(&node) else {
            return Arrival::Undeclared;
        };

        let mut declared = false;
        for role in record.roles.iter_mut() {
            if role.declared.contains(&from) {
                declared = true;
                if role.arrived.insert(from) {
                    role.remaining -= 1;
                }
            }
        }
        if !declared {
            return Arrival::Undeclared;
        }

        if !record.released && record.roles.iter().all(|role| role.remaining == 0) {
            record.released = true;
            trace!(node:% = node, from:% = from; "Join satisfied");
            return Arrival::Satisfied;
        }
        Arrival::Pending
    }

    /// Returns `true` if `node` has a record that has not been released yet.
    pub(crate) fn is_pending(&self, node: NodeId) -> bool {
        self.records
            .get(&node)
            .is_some_and(|record| !record.released)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| NodeId::new(n)).collect()
    }

    #[test]
    fn test_single_role_join() {
        let mut registry = JoinRegistry::new();
        let node = NodeId::new("concat");
        registry.register(node, [ids(&["a", "b"])]);

        assert_eq!(registry.arrive(node, NodeId::new("b")), Arrival::Pending);
        assert!(registry.is_pending(node));
        assert_eq!(registry.arrive(node, NodeId::new("a")), Arrival::Satisfied);
        assert!(!registry.is_pending(node));
    }

    #[test]
    fn test_satisfied_reported_once() {
        let mut registry = JoinRegistry::new();
        let node = NodeId::new("add");
        registry.register(node, [ids(&["a"])]);

        assert_eq!(registry.arrive(node, NodeId::new("a")), Arrival::Satisfied);
        assert_eq!(registry.arrive(node, NodeId::new("a")), Arrival::Pending);
    }

    #[test]
    fn test_duplicate_arrival_does_not_count_twice() {
        let mut registry = JoinRegistry::new();
        let node = NodeId::new("concat");
        registry.register(node, [ids(&["a", "b"])]);

        assert_eq!(registry.arrive(node, NodeId::new("a")), Arrival::Pending);
        assert_eq!(registry.arrive(node, NodeId::new("a")), Arrival::Pending);
        assert_eq!(registry.arrive(node, NodeId::new("b")), Arrival::Satisfied);
    }

    #[test]
    fn test_undeclared_arrival() {
        let mut registry = JoinRegistry::new();
        let node = NodeId::new("concat");
        registry.register(node, [ids(&["a", "b"])]);

        assert_eq!(registry.arrive(node, NodeId::new("z")), Arrival::Undeclared);
        assert_eq!(
            registry.arrive(NodeId::new("unknown"), NodeId::new("a")),
            Arrival::Undeclared
        );
    }

    #[test]
    fn test_model_roles_tracked_independently() {
        let mut registry = JoinRegistry::new();
        let model = NodeId::new("model");
        registry.register(model, [ids(&["x", "y"]), ids(&["z"])]);

        assert_eq!(registry.arrive(model, NodeId::new("z")), Arrival::Pending);
        assert_eq!(registry.arrive(model, NodeId::new("x")), Arrival::Pending);
        assert_eq!(registry.arrive(model, NodeId::new("y")), Arrival::Satisfied);
    }

    #[test]
    fn test_id_in_both_roles_counts_for_both() {
        let mut registry = JoinRegistry::new();
        let model = NodeId::new("model");
        registry.register(model, [ids(&["d"]), ids(&["d"])]);

        assert_eq!(registry.arrive(model, NodeId::new("d")), Arrival::Satisfied);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = JoinRegistry::new();
        let node = NodeId::new("concat");
        registry.register(node, [ids(&["a", "b"])]);
        registry.arrive(node, NodeId::new("a"));
        registry.register(node, [ids(&["a", "b"])]);

        assert_eq!(registry.arrive(node, NodeId::new("b")), Arrival::Satisfied);
    }

    proptest! {
        #[test]
        fn prop_join_releases_on_last_arrival(
            order in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let declared: Vec<NodeId> = (0..6).map(|i| NodeId::new(&format!("p{i}"))).collect();

            let mut registry = JoinRegistry::new();
            let node = NodeId::new("join");
            registry.register(node, [declared.clone()]);

            for (step, &index) in order.iter().enumerate() {
                let arrival = registry.arrive(node, declared[index]);
                if step + 1 == order.len() {
                    prop_assert_eq!(arrival, Arrival::Satisfied);
                } else {
                    prop_assert_eq!(arrival, Arrival::Pending);
                }
            }
        }
    }
}
