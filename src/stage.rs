//! Stages: ordered collections of groups.

use crate::error::{CompetitionError, Result};
use crate::group::Group;
use crate::id::Id;
use std::collections::HashMap;

/// A stage of a competition, such as "pools" or "finals".
///
/// Later stages may reference the results of earlier ones.
#[derive(Debug, Clone)]
pub struct Stage {
    id: Id,
    pub name: Option<String>,
    pub notes: Option<String>,
    groups: Vec<Group>,
    group_index: HashMap<Id, usize>,
}

impl Stage {
    /// Create an empty stage.
    pub fn new(id: Id) -> Self {
        Self {
            id,
            name: None,
            notes: None,
            groups: Vec::new(),
            group_index: HashMap::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Append a group to the stage.
    ///
    /// # Arguments
    ///
    /// * `group` - The group to add; its ID must be unique within the stage
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the duplicate ID.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vbcomp::{Group, Id, Stage};
    ///
    /// let mut stage = Stage::new(Id::new("C").unwrap());
    /// stage.add_group(Group::crossover(Id::new("CO").unwrap())).unwrap();
    /// assert!(stage.add_group(Group::crossover(Id::new("CO").unwrap())).is_err());
    /// ```
    pub fn add_group(&mut self, group: Group) -> Result<()> {
        if self.group_index.contains_key(group.id()) {
            return Err(CompetitionError::duplicate("Group", group.id(), "stage"));
        }
        self.group_index.insert(group.id().clone(), self.groups.len());
        self.groups.push(group);
        Ok(())
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Whether a group with this ID exists in the stage.
    pub fn has_group(&self, id: &Id) -> bool {
        self.group_index.contains_key(id)
    }

    /// Look up a group, failing with `UnknownGroup`.
    pub fn get_group(&self, id: &Id) -> Result<&Group> {
        self.group_index
            .get(id)
            .map(|&i| &self.groups[i])
            .ok_or_else(|| self.unknown_group(id))
    }

    /// Mutable form of [`Stage::get_group`].
    pub fn get_group_mut(&mut self, id: &Id) -> Result<&mut Group> {
        match self.group_index.get(id) {
            Some(&i) => Ok(&mut self.groups[i]),
            None => Err(self.unknown_group(id)),
        }
    }

    fn unknown_group(&self, id: &Id) -> CompetitionError {
        CompetitionError::UnknownGroup {
            stage: self.id.to_string(),
            group: id.to_string(),
        }
    }

    /// True when every group in the stage is complete.
    pub fn is_complete(&self) -> bool {
        self.groups.iter().all(Group::is_complete)
    }
}
