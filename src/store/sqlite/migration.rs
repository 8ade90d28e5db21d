// The title is the natural key; clients rely on the store owning the
// uniqueness invariant.
pub(crate) const MIGRATION: &str = r#"
    PRAGMA journal_mode = WAL;

    CREATE TABLE IF NOT EXISTS items (
        title TEXT NOT NULL UNIQUE,
        state TEXT NOT NULL
    );
"#;
