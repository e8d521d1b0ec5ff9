use crate::identifiers::group::GroupIdentifier;
use crate::mls::group::Group;
use crate::mls::utilities::error::{Error, Result};

/// Owns any number of groups and hands out exclusive access to one group at a
/// time, so two commits can never be applied against the same epoch
/// concurrently. Different groups don't block each other.
#[derive(Default)]
pub struct GroupRegistry {
    groups: scc::HashMap<GroupIdentifier, Group>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, group: Group) -> Result<()> {
        self.groups
            .insert(group.group_id(), group)
            .map_err(|_| Error::GroupExists)
    }

    /// Runs `f` with exclusive access to the group. Group operations are
    /// atomic, so an `Err` from `f` leaves the group as it was before the
    /// failing operation.
    pub fn update<R>(
        &self,
        group_id: &GroupIdentifier,
        f: impl FnOnce(&mut Group) -> Result<R>,
    ) -> Result<R> {
        self.groups
            .update(group_id, |_, group| f(group))
            .ok_or(Error::UnknownGroup)?
    }

    pub fn read<R>(&self, group_id: &GroupIdentifier, f: impl FnOnce(&Group) -> R) -> Result<R> {
        self.groups
            .read(group_id, |_, group| f(group))
            .ok_or(Error::UnknownGroup)
    }

    pub fn remove(&self, group_id: &GroupIdentifier) -> Option<Group> {
        self.groups.remove(group_id).map(|(_, group)| group)
    }

    pub fn contains(&self, group_id: &GroupIdentifier) -> bool {
        self.groups.contains(group_id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
