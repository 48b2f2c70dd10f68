//! Clubs, teams and team contacts.
//!
//! These are plain validated records. Resolution only ever needs a team's
//! ID; everything else here is descriptive.

use crate::error::{CompetitionError, Result};
use crate::id::Id;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A club that one or more teams belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Club {
    id: Id,
    pub name: String,
    pub notes: Option<String>,
}

impl Club {
    /// Create a club.
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            notes: None,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }
}

/// A role a team contact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactRole {
    Secretary,
    Treasurer,
    Manager,
    Captain,
    Coach,
    AssistantCoach,
    Medic,
}

/// A person to contact about a team. One contact may hold several roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    id: Id,
    pub name: Option<String>,
    roles: BTreeSet<ContactRole>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl Contact {
    /// Create a contact. At least one role is required.
    pub fn new(id: Id, roles: impl IntoIterator<Item = ContactRole>) -> Result<Self> {
        let roles: BTreeSet<ContactRole> = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(CompetitionError::Validation(format!(
                "Contact \"{}\" must have at least one role",
                id
            )));
        }
        Ok(Self {
            id,
            name: None,
            roles,
            emails: Vec::new(),
            phones: Vec::new(),
        })
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Roles held, in sorted order.
    pub fn roles(&self) -> impl Iterator<Item = ContactRole> + '_ {
        self.roles.iter().copied()
    }

    pub fn has_role(&self, role: ContactRole) -> bool {
        self.roles.contains(&role)
    }

    /// Grant a role. Adding a held role is a no-op.
    pub fn add_role(&mut self, role: ContactRole) {
        self.roles.insert(role);
    }

    /// Remove a role. The last role cannot be removed.
    pub fn remove_role(&mut self, role: ContactRole) -> Result<()> {
        if self.roles.len() == 1 && self.roles.contains(&role) {
            return Err(CompetitionError::Validation(format!(
                "Contact \"{}\" must keep at least one role",
                self.id
            )));
        }
        self.roles.remove(&role);
        Ok(())
    }
}

/// A team entered in the competition.
///
/// The club link is a lookup by ID through the owning competition, never an
/// owning pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionTeam {
    id: Id,
    pub name: String,
    pub notes: Option<String>,
    pub(crate) club: Option<Id>,
    contacts: Vec<Contact>,
    contact_index: HashMap<Id, usize>,
}

impl CompetitionTeam {
    /// Create a team with no club and no contacts.
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            notes: None,
            club: None,
            contacts: Vec::new(),
            contact_index: HashMap::new(),
        }
    }

    /// Set the club before the team is added to a competition, which checks
    /// that the club exists.
    pub fn with_club(mut self, club: Id) -> Self {
        self.club = Some(club);
        self
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// ID of the club this team belongs to, if any.
    pub fn club_id(&self) -> Option<&Id> {
        self.club.as_ref()
    }

    pub fn has_club(&self) -> bool {
        self.club.is_some()
    }

    /// Add a contact to the team.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the team already has a contact with this ID.
    pub fn add_contact(&mut self, contact: Contact) -> Result<()> {
        if self.contact_index.contains_key(contact.id()) {
            return Err(CompetitionError::Validation(format!(
                "Contact with ID \"{}\" already exists in the team \"{}\"",
                contact.id(),
                self.id
            )));
        }
        self.contact_index.insert(contact.id().clone(), self.contacts.len());
        self.contacts.push(contact);
        Ok(())
    }

    /// Contacts in the order they were added.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn has_contact(&self, id: &Id) -> bool {
        self.contact_index.contains_key(id)
    }

    /// Look up a contact, failing with `NotFound`.
    pub fn get_contact(&self, id: &Id) -> Result<&Contact> {
        self.contact_index
            .get(id)
            .map(|&i| &self.contacts[i])
            .ok_or_else(|| CompetitionError::not_found("Contact", id))
    }

    pub fn get_contact_mut(&mut self, id: &Id) -> Result<&mut Contact> {
        match self.contact_index.get(id) {
            Some(&i) => Ok(&mut self.contacts[i]),
            None => Err(CompetitionError::not_found("Contact", id)),
        }
    }

    /// Contacts holding `role`, in the order they were added.
    pub fn contacts_with_role(&self, role: ContactRole) -> impl Iterator<Item = &Contact> {
        self.contacts.iter().filter(move |c| c.has_role(role))
    }
}
