use std::fmt;

use splitledger_core::{Participants, RowId};

/// State that outlives a single interaction, owned by the caller and handed to the tracker.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Session {
    last_payer: Option<String>,
    last_merchant: Option<String>,
    pending_deletion: Vec<RowId>,
    notice: Option<Notice>,
}

/// A one-shot status message for the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(message) | Notice::Error(message) => f.write_str(message),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn remember(&mut self, payer: &str, merchant: &str) {
        self.last_payer = Some(payer.to_string());
        self.last_merchant = Some(merchant.to_string());
    }

    pub fn last_payer(&self) -> Option<&str> {
        self.last_payer.as_deref()
    }

    pub fn last_merchant(&self) -> Option<&str> {
        self.last_merchant.as_deref()
    }

    /// The payer to preselect for the next expense: the last one used if it is still a
    /// participant, otherwise the first participant.
    pub fn default_payer<'a>(&'a self, participants: &'a Participants) -> &'a str {
        match self.last_payer() {
            Some(payer) if participants.is_registered(payer) => payer,
            _ => &participants.first,
        }
    }

    /// Rows waiting for the user to confirm their deletion, lowest position first.
    pub fn pending_deletion(&self) -> &[RowId] {
        &self.pending_deletion
    }

    pub fn awaiting_confirmation(&self) -> bool {
        !self.pending_deletion.is_empty()
    }

    /// Replaces any earlier request.
    pub(crate) fn request_deletion(&mut self, mut rows: Vec<RowId>) {
        rows.sort();
        rows.dedup();
        self.pending_deletion = rows;
    }

    pub fn cancel_deletion(&mut self) {
        self.pending_deletion.clear();
    }

    pub(crate) fn take_pending_deletion(&mut self) -> Vec<RowId> {
        std::mem::take(&mut self.pending_deletion)
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Returns the latest notice and clears it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
