//! Domain error taxonomy for the season engine.
//!
//! Three classes of failure, mirrored by [`SeasonError::class`]:
//! validation errors (the caller must change its input), state errors
//! (the caller re-reads current state and retries), and not-found.
//! Infrastructure failures are not modelled here — the engine layer wraps
//! `sqlx::Error` separately.

use uuid::Uuid;

/// Coarse error class, used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    State,
    NotFound,
}

/// Errors produced by season lifecycle, registration, and fixture
/// generation operations.
#[derive(Debug, thiserror::Error)]
pub enum SeasonError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("season has {registered} registered team(s) but requires at least {min}")]
    InsufficientTeams { registered: i32, min: i32 },

    #[error("season has {registered} registered team(s) but allows at most {max}")]
    TooManyTeams { registered: i32, max: i32 },

    #[error("cannot build a schedule for {found} team(s); at least 2 are required")]
    NotEnoughTeamsToSchedule { found: usize },

    #[error(
        "schedule needs {required_days} day(s) from the start date but the season window only spans {available_days}"
    )]
    ScheduleExceedsSeasonWindow {
        required_days: i64,
        available_days: i64,
    },

    #[error("team {team_id} is already registered for this season")]
    DuplicateRegistration { team_id: Uuid },

    #[error("registration is closed: {0}")]
    RegistrationClosed(String),

    #[error("season is full ({max} teams)")]
    SeasonFull { max: i32 },

    #[error("operation '{operation}' is not allowed in state '{from}'")]
    InvalidStateTransition {
        from: &'static str,
        operation: &'static str,
    },

    #[error("fixture generation is already in progress for this season")]
    GenerationInProgress,

    #[error("season was modified concurrently; re-read and retry")]
    ConcurrentModification,

    #[error("validation failed: {0}")]
    Validation(String),
}

impl SeasonError {
    /// Stable machine-readable code for the service boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InsufficientTeams { .. } => "INSUFFICIENT_TEAMS",
            Self::TooManyTeams { .. } => "TOO_MANY_TEAMS",
            Self::NotEnoughTeamsToSchedule { .. } => "NOT_ENOUGH_TEAMS_TO_SCHEDULE",
            Self::ScheduleExceedsSeasonWindow { .. } => "SCHEDULE_EXCEEDS_SEASON_WINDOW",
            Self::DuplicateRegistration { .. } => "DUPLICATE_REGISTRATION",
            Self::RegistrationClosed(_) => "REGISTRATION_CLOSED",
            Self::SeasonFull { .. } => "SEASON_FULL",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::GenerationInProgress => "GENERATION_IN_PROGRESS",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::InvalidStateTransition { .. }
            | Self::GenerationInProgress
            | Self::ConcurrentModification
            | Self::DuplicateRegistration { .. }
            | Self::SeasonFull { .. } => ErrorClass::State,
            _ => ErrorClass::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        let errors = [
            SeasonError::GenerationInProgress,
            SeasonError::ConcurrentModification,
            SeasonError::NotEnoughTeamsToSchedule { found: 1 },
        ];
        for err in errors {
            let code = err.code();
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn state_errors_classified_as_state() {
        assert_eq!(SeasonError::GenerationInProgress.class(), ErrorClass::State);
        assert_eq!(
            SeasonError::ConcurrentModification.class(),
            ErrorClass::State
        );
    }

    #[test]
    fn window_errors_classified_as_validation() {
        let err = SeasonError::ScheduleExceedsSeasonWindow {
            required_days: 20,
            available_days: 14,
        };
        assert_eq!(err.class(), ErrorClass::Validation);
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = SeasonError::NotFound {
            entity: "Season",
            id: Uuid::nil(),
        };
        assert!(err.to_string().contains("Season"));
    }
}
