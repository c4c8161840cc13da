//! Admin draw panel state: preview card, winner list and per-action busy flags.

use crate::dto::draw::{PotentialWinnerDto, WinnerDto};

/// Phases of the admin draw panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DrawPhase {
    /// Nothing previewed and nothing in flight.
    #[default]
    NoPreview,
    /// A potential winner card is displayed; nothing is committed yet.
    PreviewShown(PotentialWinnerDto),
    /// A commit is in flight.
    Confirming,
    /// A reset is in flight.
    Resetting,
}

/// Action kinds guarded by their own busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawAction {
    /// Ask for an uncommitted candidate.
    Preview,
    /// Commit a winner.
    Confirm,
    /// Delete every winner.
    Reset,
}

/// One flag per action; a set flag disables the matching button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusyFlags {
    /// A preview request is in flight.
    pub previewing: bool,
    /// A commit request is in flight.
    pub confirming: bool,
    /// A reset request is in flight.
    pub resetting: bool,
}

impl BusyFlags {
    fn flag_mut(&mut self, action: DrawAction) -> &mut bool {
        match action {
            DrawAction::Preview => &mut self.previewing,
            DrawAction::Confirm => &mut self.confirming,
            DrawAction::Reset => &mut self.resetting,
        }
    }

    /// True while a request of `action`'s kind is in flight.
    pub fn is_busy(&self, action: DrawAction) -> bool {
        match action {
            DrawAction::Preview => self.previewing,
            DrawAction::Confirm => self.confirming,
            DrawAction::Reset => self.resetting,
        }
    }
}

/// Everything the admin panel renders.
///
/// The phase is derived from the busy flags and the preview card, so a failed
/// request only has to clear its own flag for the previous phase to come back.
/// Commit and reset exclude each other; previews may overlap with either.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrawPanel {
    preview: Option<PotentialWinnerDto>,
    /// Card taken off the panel by an in-flight commit, put back if the commit fails.
    committing: Option<PotentialWinnerDto>,
    winners: Vec<WinnerDto>,
    busy: BusyFlags,
}

impl DrawPanel {
    /// Phase shown to the admin.
    pub fn phase(&self) -> DrawPhase {
        if self.busy.resetting {
            DrawPhase::Resetting
        } else if self.busy.confirming {
            DrawPhase::Confirming
        } else if let Some(candidate) = &self.preview {
            DrawPhase::PreviewShown(candidate.clone())
        } else {
            DrawPhase::NoPreview
        }
    }

    /// Committed winners, in draw order.
    pub fn winners(&self) -> &[WinnerDto] {
        &self.winners
    }

    /// Current busy flags.
    pub fn busy(&self) -> BusyFlags {
        self.busy
    }

    /// Number on the preview card, if one is shown.
    pub fn previewed_number(&self) -> Option<u32> {
        match self.phase() {
            DrawPhase::PreviewShown(candidate) => Some(candidate.number),
            _ => None,
        }
    }

    /// Set the busy flag of `action`. Returns false, changing nothing, when a
    /// request of that kind is in flight or when commit and reset would overlap.
    pub fn begin(&mut self, action: DrawAction) -> bool {
        let blocked = match action {
            DrawAction::Preview => self.busy.previewing,
            DrawAction::Confirm => self.busy.confirming || self.busy.resetting,
            DrawAction::Reset => self.busy.resetting || self.busy.confirming,
        };
        if blocked {
            return false;
        }

        *self.busy.flag_mut(action) = true;
        if action == DrawAction::Confirm {
            self.committing = self.preview.take();
        }
        true
    }

    /// Clear the busy flag of `action` after a failed request.
    pub fn fail(&mut self, action: DrawAction) {
        *self.busy.flag_mut(action) = false;
        if action == DrawAction::Confirm {
            let committing = self.committing.take();
            // A preview that landed meanwhile is newer than the card being committed.
            if self.preview.is_none() {
                self.preview = committing;
            }
        }
    }

    /// Show `candidate`, replacing any previous card.
    pub fn preview_succeeded(&mut self, candidate: PotentialWinnerDto) {
        self.busy.previewing = false;
        self.preview = Some(candidate);
    }

    /// The commit landed: its card is dropped; the winner list is refreshed separately.
    pub fn confirm_succeeded(&mut self) {
        self.busy.confirming = false;
        self.committing = None;
    }

    /// Winners were wiped: preview and list are cleared until the next fetch.
    pub fn reset_succeeded(&mut self) {
        self.busy.resetting = false;
        self.preview = None;
        self.winners.clear();
    }

    /// Drop the preview card without committing.
    pub fn discard(&mut self) {
        if matches!(self.phase(), DrawPhase::PreviewShown(_)) {
            self.preview = None;
        }
    }

    /// Replace the winner list with a fresh fetch.
    pub fn set_winners(&mut self, winners: Vec<WinnerDto>) {
        self.winners = winners;
    }
}
