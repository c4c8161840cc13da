//! Player-side selection flow: at most one pending number, confirmed through the server.

use thiserror::Error;

use crate::dto::ticket::TicketDto;

/// Phases of the selection flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    /// Nothing selected.
    #[default]
    Idle,
    /// A number is selected locally and waits for "Confirm".
    NumberPending(u32),
    /// The claim for this number is in flight.
    Submitting(u32),
    /// The server created the ticket.
    Confirmed(TicketDto),
    /// The server refused the claim; acknowledged right away back to `NumberPending`.
    Error {
        /// Number that was refused.
        number: u32,
        /// Message shown to the user.
        message: String,
    },
}

/// Events driving the selection flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A grid click accepted by the grid guard.
    Select(u32),
    /// "Cancel" button.
    Cancel,
    /// "Confirm" button.
    Confirm,
    /// Server accepted the claim.
    Succeeded(TicketDto),
    /// Server refused the claim.
    Rejected(String),
    /// The error was shown; the user may pick again.
    Acknowledged,
}

/// Error returned when an event cannot be applied in the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selection transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidSelectionTransition {
    pub from: SelectionPhase,
    pub event: SelectionEvent,
}

/// Selection state machine. Holds no network handles; the player view drives it.
#[derive(Debug, Clone, Default)]
pub struct SelectionFlow {
    phase: SelectionPhase,
    last_error: Option<String>,
}

impl SelectionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    /// Locally selected number, including while its claim is in flight.
    pub fn pending(&self) -> Option<u32> {
        match &self.phase {
            SelectionPhase::NumberPending(number)
            | SelectionPhase::Submitting(number)
            | SelectionPhase::Error { number, .. } => Some(*number),
            SelectionPhase::Idle | SelectionPhase::Confirmed(_) => None,
        }
    }

    /// "Confirm" is enabled only with a pending number that is not being submitted.
    pub fn can_confirm(&self) -> bool {
        matches!(self.phase, SelectionPhase::NumberPending(_))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, SelectionPhase::Submitting(_))
    }

    /// Message of the last refused claim, cleared by the next selection or success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Apply `event`, returning the new phase.
    pub fn apply(
        &mut self,
        event: SelectionEvent,
    ) -> Result<&SelectionPhase, InvalidSelectionTransition> {
        let next = self.compute_transition(event.clone())?;

        match &event {
            SelectionEvent::Select(_) | SelectionEvent::Succeeded(_) | SelectionEvent::Cancel => {
                self.last_error = None;
            }
            SelectionEvent::Rejected(message) => self.last_error = Some(message.clone()),
            SelectionEvent::Confirm | SelectionEvent::Acknowledged => {}
        }

        self.phase = next;
        Ok(&self.phase)
    }

    fn compute_transition(
        &self,
        event: SelectionEvent,
    ) -> Result<SelectionPhase, InvalidSelectionTransition> {
        let next = match (&self.phase, event) {
            (
                SelectionPhase::Idle
                | SelectionPhase::NumberPending(_)
                | SelectionPhase::Confirmed(_),
                SelectionEvent::Select(number),
            ) => SelectionPhase::NumberPending(number),
            (SelectionPhase::NumberPending(_), SelectionEvent::Cancel) => SelectionPhase::Idle,
            (SelectionPhase::NumberPending(number), SelectionEvent::Confirm) => {
                SelectionPhase::Submitting(*number)
            }
            (SelectionPhase::Submitting(_), SelectionEvent::Succeeded(ticket)) => {
                SelectionPhase::Confirmed(ticket)
            }
            (SelectionPhase::Submitting(number), SelectionEvent::Rejected(message)) => {
                SelectionPhase::Error {
                    number: *number,
                    message,
                }
            }
            (SelectionPhase::Error { number, .. }, SelectionEvent::Acknowledged) => {
                SelectionPhase::NumberPending(*number)
            }
            (from, event) => {
                return Err(InvalidSelectionTransition {
                    from: from.clone(),
                    event,
                });
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use uuid::Uuid;

    use super::*;

    fn ticket(number: u32) -> TicketDto {
        TicketDto {
            id: Uuid::new_v4(),
            minigame_id: Uuid::new_v4(),
            user_id: "u-1".into(),
            number,
            created_at: datetime!(2026-10-19 10:00 UTC),
        }
    }

    #[test]
    fn happy_path_ends_confirmed() {
        let mut flow = SelectionFlow::new();
        assert_eq!(flow.phase(), &SelectionPhase::Idle);
        assert!(!flow.can_confirm());

        flow.apply(SelectionEvent::Select(7)).unwrap();
        assert!(flow.can_confirm());
        assert_eq!(flow.pending(), Some(7));

        flow.apply(SelectionEvent::Confirm).unwrap();
        assert!(flow.is_submitting());
        assert!(!flow.can_confirm());

        let confirmed = ticket(7);
        flow.apply(SelectionEvent::Succeeded(confirmed.clone()))
            .unwrap();
        assert_eq!(flow.phase(), &SelectionPhase::Confirmed(confirmed));
        assert_eq!(flow.pending(), None);
    }

    #[test]
    fn selecting_again_replaces_the_pending_number() {
        let mut flow = SelectionFlow::new();
        flow.apply(SelectionEvent::Select(3)).unwrap();
        flow.apply(SelectionEvent::Select(5)).unwrap();
        assert_eq!(flow.phase(), &SelectionPhase::NumberPending(5));
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut flow = SelectionFlow::new();
        flow.apply(SelectionEvent::Select(3)).unwrap();
        flow.apply(SelectionEvent::Cancel).unwrap();
        assert_eq!(flow.phase(), &SelectionPhase::Idle);
        assert!(flow.apply(SelectionEvent::Cancel).is_err());
    }

    #[test]
    fn rejection_goes_through_error_back_to_pending() {
        let mut flow = SelectionFlow::new();
        flow.apply(SelectionEvent::Select(4)).unwrap();
        flow.apply(SelectionEvent::Confirm).unwrap();

        let phase = flow
            .apply(SelectionEvent::Rejected("number 4 is already taken".into()))
            .unwrap();
        assert_eq!(
            phase,
            &SelectionPhase::Error {
                number: 4,
                message: "number 4 is already taken".into()
            }
        );
        assert!(!flow.can_confirm());

        flow.apply(SelectionEvent::Acknowledged).unwrap();
        assert_eq!(flow.phase(), &SelectionPhase::NumberPending(4));
        assert_eq!(flow.last_error(), Some("number 4 is already taken"));

        flow.apply(SelectionEvent::Select(6)).unwrap();
        assert_eq!(flow.last_error(), None);
    }

    #[test]
    fn confirm_is_ignored_while_submitting() {
        let mut flow = SelectionFlow::new();
        flow.apply(SelectionEvent::Select(2)).unwrap();
        flow.apply(SelectionEvent::Confirm).unwrap();

        let err = flow.apply(SelectionEvent::Confirm).unwrap_err();
        assert_eq!(err.from, SelectionPhase::Submitting(2));
        assert_eq!(err.event, SelectionEvent::Confirm);
        assert!(flow.apply(SelectionEvent::Select(3)).is_err());
    }

    #[test]
    fn confirm_without_selection_is_invalid() {
        let mut flow = SelectionFlow::new();
        assert!(flow.apply(SelectionEvent::Confirm).is_err());
        assert!(
            flow.apply(SelectionEvent::Succeeded(ticket(1)))
                .is_err()
        );
    }
}
