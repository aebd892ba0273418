//! Participant (pairing) data structure.

use serde::{Deserialize, Serialize};

/// Unique identifier for a participant (used in matches and lookups).
pub type ParticipantId = u64;

/// A competing identity: a solo player or a team.
///
/// Participants are created outside this engine and only referenced by matches.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub label: String,
    /// Optional link to an external account.
    #[serde(default)]
    pub account: Option<String>,
    /// Set externally when an organizer has to act (e.g. pending guarantee).
    #[serde(default)]
    pub requires_action: bool,
}

impl Participant {
    /// Create a participant with the given id and display label.
    pub fn new(id: ParticipantId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            account: None,
            requires_action: false,
        }
    }

    /// Attach an external account link.
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Flag the participant as requiring organizer action.
    pub fn flag_requires_action(mut self) -> Self {
        self.requires_action = true;
        self
    }
}
