//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dto::minigame::CreateMinigameRequest;

/// Validates that the registration window closes after it opens and that the
/// winner cap fits on the grid.
pub fn validate_minigame_window(request: &CreateMinigameRequest) -> Result<(), ValidationError> {
    if request.end_time <= request.start_time {
        let mut err = ValidationError::new("minigame_window");
        err.message = Some("endTime must be later than startTime".into());
        return Err(err);
    }

    if request.max_winners > request.max_number {
        let mut err = ValidationError::new("minigame_winner_cap");
        err.message = Some(
            format!(
                "maxWinners ({}) cannot exceed maxNumber ({})",
                request.max_winners, request.max_number
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use validator::Validate;

    use super::*;

    fn request() -> CreateMinigameRequest {
        CreateMinigameRequest {
            name: "Vòng quay may mắn".into(),
            contest_id: "webdesign-2026".into(),
            start_time: datetime!(2026-10-20 08:00 UTC),
            end_time: datetime!(2026-10-20 20:00 UTC),
            max_number: 100,
            max_winners: 3,
            is_active: true,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_minigame_window(&request()).is_ok());
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_window_must_be_ordered() {
        let mut req = request();
        req.end_time = req.start_time;
        assert!(validate_minigame_window(&req).is_err());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_winner_cap_fits_grid() {
        let mut req = request();
        req.max_winners = 101;
        assert!(validate_minigame_window(&req).is_err());
    }

    #[test]
    fn test_field_ranges() {
        let mut req = request();
        req.max_number = 0;
        req.max_winners = 0;
        assert!(req.validate().is_err());

        let mut req = request();
        req.name.clear();
        assert!(req.validate().is_err());
    }
}
