/// Season, team, and match identities are UUIDs issued by the surrounding
/// platform (teams and leagues live in external services).
pub type TeamId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
