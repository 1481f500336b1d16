//! Presence tracking.
//!
//! Pure functions over the connection map. Presence is never stored: a name is
//! online iff at least one connection currently carries it.

use std::collections::{BTreeSet, HashMap};

use super::{
    entity::Connection,
    value_object::{ConnectionId, DisplayName},
};

pub type ConnectionMap = HashMap<ConnectionId, Connection>;

/// Names that appeared or disappeared between two connection maps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceTransitions {
    pub joins: BTreeSet<DisplayName>,
    pub leaves: BTreeSet<DisplayName>,
}

impl PresenceTransitions {
    pub fn is_empty(&self) -> bool {
        self.joins.is_empty() && self.leaves.is_empty()
    }
}

/// Distinct online names ordered by each name's earliest `joined_at`.
///
/// Ties are broken by the lowest registration sequence among the name's
/// connections, then by the name itself, so the order only changes when the
/// map does.
pub fn compute_online_names(connections: &ConnectionMap) -> Vec<DisplayName> {
    let mut earliest: HashMap<&DisplayName, (i64, u64)> = HashMap::new();

    for connection in connections.values() {
        let Some(presence) = &connection.presence else {
            continue;
        };
        let key = (presence.joined_at.value(), connection.seq);
        earliest
            .entry(&presence.display_name)
            .and_modify(|current| {
                if key < *current {
                    *current = key;
                }
            })
            .or_insert(key);
    }

    let mut names: Vec<(&DisplayName, (i64, u64))> = earliest.into_iter().collect();
    names.sort_by(|(a_name, a_key), (b_name, b_key)| {
        a_key.cmp(b_key).then_with(|| a_name.cmp(b_name))
    });
    names.into_iter().map(|(name, _)| name.clone()).collect()
}

/// Number of connections per present name
pub fn presence_counts(connections: &ConnectionMap) -> HashMap<&DisplayName, usize> {
    let mut counts = HashMap::new();
    for name in connections.values().filter_map(Connection::display_name) {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}

/// Whether `name` is carried by at least one live connection
pub fn is_present(connections: &ConnectionMap, name: &DisplayName) -> bool {
    connections
        .values()
        .any(|c| c.display_name() == Some(name))
}

/// Join/leave edges between `old` and `new`.
///
/// A join is a name going from zero connections to at least one, a leave the
/// reverse. A rename can yield both in one call.
pub fn compute_transitions(old: &ConnectionMap, new: &ConnectionMap) -> PresenceTransitions {
    let old_counts = presence_counts(old);
    let new_counts = presence_counts(new);

    let joins = new_counts
        .keys()
        .filter(|name| !old_counts.contains_key(*name))
        .map(|name| (*name).clone())
        .collect();
    let leaves = old_counts
        .keys()
        .filter(|name| !new_counts.contains_key(*name))
        .map(|name| (*name).clone())
        .collect();

    PresenceTransitions { joins, leaves }
}
