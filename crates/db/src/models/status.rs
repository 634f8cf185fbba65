//! Status helper enums mapping to SMALLINT status columns.
//!
//! Discriminants are 1-based and must match the transition tables in
//! `sideline_core::lifecycle`, which are duplicated there on purpose —
//! `core` carries no internal dependencies.

/// Status id type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status id.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Season lifecycle status.
    SeasonStatus {
        Draft = 1,
        Registration = 2,
        Active = 3,
        Completed = 4,
        Cancelled = 5,
    }
}

define_status_enum! {
    /// Fixture generation pipeline status, tracked independently of the
    /// season lifecycle status.
    FixturesStatus {
        Pending = 1,
        Generating = 2,
        Completed = 3,
        Error = 4,
    }
}

define_status_enum! {
    /// Team membership status within a season. Withdrawn rows are kept
    /// as history and excluded from the active-team count.
    SeasonTeamStatus {
        Registered = 1,
        Confirmed = 2,
        Withdrawn = 3,
    }
}

define_status_enum! {
    /// Match status. Scores and the completed/in-progress transitions are
    /// owned by the result-recording collaborator, not this engine.
    MatchStatus {
        Scheduled = 1,
        InProgress = 2,
        Completed = 3,
        Cancelled = 4,
    }
}

#[cfg(test)]
mod tests {
    use sideline_core::lifecycle::{fixtures_state, season_state};

    use super::*;

    #[test]
    fn season_ids_match_core_lifecycle_constants() {
        assert_eq!(SeasonStatus::Draft.id(), season_state::DRAFT);
        assert_eq!(SeasonStatus::Registration.id(), season_state::REGISTRATION);
        assert_eq!(SeasonStatus::Active.id(), season_state::ACTIVE);
        assert_eq!(SeasonStatus::Completed.id(), season_state::COMPLETED);
        assert_eq!(SeasonStatus::Cancelled.id(), season_state::CANCELLED);
    }

    #[test]
    fn fixtures_ids_match_core_lifecycle_constants() {
        assert_eq!(FixturesStatus::Pending.id(), fixtures_state::PENDING);
        assert_eq!(FixturesStatus::Generating.id(), fixtures_state::GENERATING);
        assert_eq!(FixturesStatus::Completed.id(), fixtures_state::COMPLETED);
        assert_eq!(FixturesStatus::Error.id(), fixtures_state::ERROR);
    }
}
