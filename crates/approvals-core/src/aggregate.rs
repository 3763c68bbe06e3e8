//! Grouping grants by client.
//!
//! The approvals page shows one section per client, in the order clients
//! first appear in the store's collection. Grants within a section keep the
//! order the store returned them in.

use indexmap::IndexMap;
use indexmap::map::Iter;
use serde::Serialize;

use crate::types::Grant;

/// Grants grouped by client id, in first-seen client order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedView {
    groups: IndexMap<String, Vec<Grant>>,
}

impl GroupedView {
    /// Returns the grants of one client.
    #[must_use]
    pub fn get(&self, client_id: &str) -> Option<&[Grant]> {
        self.groups.get(client_id).map(Vec::as_slice)
    }

    /// Iterates `(client_id, grants)` in client order.
    pub fn iter(&self) -> Iter<'_, String, Vec<Grant>> {
        self.groups.iter()
    }

    /// Client ids in display order.
    pub fn client_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    #[must_use]
    pub fn client_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of grants across all clients.
    #[must_use]
    pub fn grant_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Concatenates the groups in client order.
    #[must_use]
    pub fn flatten(self) -> Vec<Grant> {
        let mut out = Vec::with_capacity(self.grant_count());
        for (_, grants) in self.groups {
            out.extend(grants);
        }
        out
    }
}

impl<'a> IntoIterator for &'a GroupedView {
    type Item = (&'a String, &'a Vec<Grant>);
    type IntoIter = Iter<'a, String, Vec<Grant>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Groups `grants` by `client_id`.
///
/// Every input grant lands in exactly one group; duplicates are kept.
pub fn group_by_client<I>(grants: I) -> GroupedView
where
    I: IntoIterator<Item = Grant>,
{
    let mut groups: IndexMap<String, Vec<Grant>> = IndexMap::new();
    for grant in grants {
        groups.entry(grant.client_id.clone()).or_default().push(grant);
    }
    GroupedView { groups }
}
