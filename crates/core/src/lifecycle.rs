//! Season and fixture-pipeline state machines.
//!
//! Lives in `core` (zero internal deps) so the db, engine, and api layers
//! all consult the same transition tables. Status ids are 1-based and must
//! match the enums in `sideline-db`'s `models/status.rs`.

/// Season lifecycle transitions.
///
/// `draft -> registration -> active -> completed`, with `cancelled`
/// reachable from every non-terminal state.
pub mod season_state {
    pub const DRAFT: i16 = 1;
    pub const REGISTRATION: i16 = 2;
    pub const ACTIVE: i16 = 3;
    pub const COMPLETED: i16 = 4;
    pub const CANCELLED: i16 = 5;

    /// Returns the set of valid target status ids reachable from `from`.
    ///
    /// Terminal states (`COMPLETED`, `CANCELLED`) return an empty slice.
    pub fn valid_transitions(from: i16) -> &'static [i16] {
        match from {
            DRAFT => &[REGISTRATION, CANCELLED],
            REGISTRATION => &[ACTIVE, CANCELLED],
            ACTIVE => &[COMPLETED, CANCELLED],
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// A season in a terminal state accepts no further transitions.
    pub fn is_terminal(status: i16) -> bool {
        valid_transitions(status).is_empty()
    }

    /// Human-readable name for a status id (for error messages).
    pub fn status_name(id: i16) -> &'static str {
        match id {
            DRAFT => "draft",
            REGISTRATION => "registration",
            ACTIVE => "active",
            COMPLETED => "completed",
            CANCELLED => "cancelled",
            _ => "unknown",
        }
    }
}

/// Fixture generation pipeline transitions, independent of the season's
/// own lifecycle.
///
/// `pending -> generating -> {completed, error}`; `error -> generating`
/// is the retry path and `completed -> generating` the regeneration path.
/// Both re-entries are only meaningful while the season is still in
/// registration, which the lifecycle manager enforces — the table itself
/// stays season-agnostic.
pub mod fixtures_state {
    pub const PENDING: i16 = 1;
    pub const GENERATING: i16 = 2;
    pub const COMPLETED: i16 = 3;
    pub const ERROR: i16 = 4;

    /// Returns the set of valid target status ids reachable from `from`.
    pub fn valid_transitions(from: i16) -> &'static [i16] {
        match from {
            PENDING => &[GENERATING],
            GENERATING => &[COMPLETED, ERROR],
            COMPLETED => &[GENERATING],
            ERROR => &[GENERATING],
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Human-readable name for a status id (for error messages).
    pub fn status_name(id: i16) -> &'static str {
        match id {
            PENDING => "pending",
            GENERATING => "generating",
            COMPLETED => "completed",
            ERROR => "error",
            _ => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    // -----------------------------------------------------------------------
    // Season lifecycle
    // -----------------------------------------------------------------------

    mod season {
        use crate::lifecycle::season_state::*;

        #[test]
        fn draft_to_registration() {
            assert!(can_transition(DRAFT, REGISTRATION));
        }

        #[test]
        fn registration_to_active() {
            assert!(can_transition(REGISTRATION, ACTIVE));
        }

        #[test]
        fn active_to_completed() {
            assert!(can_transition(ACTIVE, COMPLETED));
        }

        #[test]
        fn cancelled_reachable_from_draft() {
            assert!(can_transition(DRAFT, CANCELLED));
        }

        #[test]
        fn cancelled_reachable_from_registration() {
            assert!(can_transition(REGISTRATION, CANCELLED));
        }

        #[test]
        fn cancelled_reachable_from_active() {
            assert!(can_transition(ACTIVE, CANCELLED));
        }

        #[test]
        fn draft_cannot_skip_to_active() {
            assert!(!can_transition(DRAFT, ACTIVE));
        }

        #[test]
        fn registration_cannot_skip_to_completed() {
            assert!(!can_transition(REGISTRATION, COMPLETED));
        }

        #[test]
        fn completed_has_no_transitions() {
            assert!(valid_transitions(COMPLETED).is_empty());
        }

        #[test]
        fn cancelled_has_no_transitions() {
            assert!(valid_transitions(CANCELLED).is_empty());
        }

        #[test]
        fn terminal_states_flagged() {
            assert!(is_terminal(COMPLETED));
            assert!(is_terminal(CANCELLED));
            assert!(!is_terminal(DRAFT));
            assert!(!is_terminal(ACTIVE));
        }

        #[test]
        fn unknown_status_has_no_transitions() {
            assert!(valid_transitions(99).is_empty());
        }

        #[test]
        fn status_names_resolve() {
            assert_eq!(status_name(DRAFT), "draft");
            assert_eq!(status_name(99), "unknown");
        }
    }

    // -----------------------------------------------------------------------
    // Fixture pipeline
    // -----------------------------------------------------------------------

    mod fixtures {
        use crate::lifecycle::fixtures_state::*;

        #[test]
        fn pending_to_generating() {
            assert!(can_transition(PENDING, GENERATING));
        }

        #[test]
        fn generating_to_completed() {
            assert!(can_transition(GENERATING, COMPLETED));
        }

        #[test]
        fn generating_to_error() {
            assert!(can_transition(GENERATING, ERROR));
        }

        #[test]
        fn error_retry_to_generating() {
            assert!(can_transition(ERROR, GENERATING));
        }

        #[test]
        fn completed_regeneration_to_generating() {
            assert!(can_transition(COMPLETED, GENERATING));
        }

        #[test]
        fn pending_cannot_skip_to_completed() {
            assert!(!can_transition(PENDING, COMPLETED));
        }

        #[test]
        fn completed_cannot_move_to_error_directly() {
            assert!(!can_transition(COMPLETED, ERROR));
        }

        #[test]
        fn generating_cannot_return_to_pending() {
            assert!(!can_transition(GENERATING, PENDING));
        }
    }
}
