//! Participants

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Participant Key
    pub struct ParticipantKey;
}

/// Participant gender, kept for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    /// Male
    Male,

    /// Female
    Female,
}

/// A member of the trip group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Display name. Settlement is keyed by this name.
    pub name: String,

    /// Optional gender
    pub gender: Option<Gender>,
}

impl Participant {
    /// Create a participant with no gender set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: None,
        }
    }
}

/// Registered participants, used to resolve occupant names back to keys.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    participants: SlotMap<ParticipantKey, Participant>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant and return its key.
    pub fn insert(&mut self, participant: Participant) -> ParticipantKey {
        self.participants.insert(participant)
    }

    /// Lookup a participant by key.
    pub fn get(&self, key: ParticipantKey) -> Option<&Participant> {
        self.participants.get(key)
    }

    /// First participant registered under `name`.
    ///
    /// Names are not unique; two participants sharing a name are
    /// indistinguishable to the settlement engine.
    pub fn find_by_name(&self, name: &str) -> Option<ParticipantKey> {
        self.participants
            .iter()
            .find(|(_, participant)| participant.name == name)
            .map(|(key, _)| key)
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Check if the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Iterate over all participants.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantKey, &Participant)> {
        self.participants.iter()
    }
}
