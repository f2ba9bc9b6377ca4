mod repository;

pub use repository::*;

/// SQL migration for the initial schema on PostgreSQL
pub const MIGRATION_001_POSTGRES: &str = include_str!("migrations/postgres_001_initial.sql");

/// SQL migration for the initial schema on SQLite
pub const MIGRATION_001_SQLITE: &str = include_str!("migrations/sqlite_001_initial.sql");

/// Database engine behind a connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Some(Backend::Sqlite)
        } else {
            None
        }
    }

    /// Schema statements for this backend, in execution order.
    pub fn migration_statements(self) -> impl Iterator<Item = &'static str> {
        let script = match self {
            Backend::Postgres => MIGRATION_001_POSTGRES,
            Backend::Sqlite => MIGRATION_001_SQLITE,
        };
        script
            .split(';')
            .map(str::trim)
            .filter(|statement| !statement.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            Backend::from_url("postgres://u:p@localhost:5432/banking"),
            Some(Backend::Postgres)
        );
        assert_eq!(
            Backend::from_url("postgresql://localhost/banking"),
            Some(Backend::Postgres)
        );
        assert_eq!(
            Backend::from_url("sqlite:ledger.db?mode=rwc"),
            Some(Backend::Sqlite)
        );
        assert_eq!(Backend::from_url("mysql://localhost/banking"), None);
    }

    #[test]
    fn test_migration_statements_split() {
        for backend in [Backend::Postgres, Backend::Sqlite] {
            let statements: Vec<_> = backend.migration_statements().collect();
            assert_eq!(statements.len(), 3);
            assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS accounts"));
            assert!(statements[1].starts_with("CREATE TABLE IF NOT EXISTS transactions"));
            assert!(statements[2].starts_with("CREATE INDEX"));
        }
    }
}
