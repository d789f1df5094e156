use souq_types::domain::seed::CatalogError;
use souq_types::ports::reference_store::StoreError;
use std::fmt;
use thiserror::Error;

/// Where in the bootstrap sequence a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Connectivity,
    Schema,
    Seeding,
    Launch,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Config => "config",
            Stage::Connectivity => "connectivity",
            Stage::Schema => "schema",
            Stage::Seeding => "seeding",
            Stage::Launch => "launch",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid seed catalog")]
    Catalog(#[from] CatalogError),

    #[error("Database connection failed")]
    Connectivity(#[source] StoreError),

    #[error("Schema creation failed")]
    Schema(#[source] StoreError),

    #[error("Reference data seeding failed")]
    Seeding(#[source] StoreError),

    #[error("Failed to launch `{program}`")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl BootstrapError {
    pub fn stage(&self) -> Stage {
        match self {
            BootstrapError::Config(_) | BootstrapError::Catalog(_) => Stage::Config,
            BootstrapError::Connectivity(_) => Stage::Connectivity,
            BootstrapError::Schema(_) => Stage::Schema,
            BootstrapError::Seeding(_) => Stage::Seeding,
            BootstrapError::Launch { .. } => Stage::Launch,
        }
    }

    /// Process exit status for this failure; never 0.
    pub fn exit_code(&self) -> u8 {
        match self.stage() {
            Stage::Config => 2,
            Stage::Connectivity => 3,
            Stage::Schema => 4,
            Stage::Seeding => 5,
            Stage::Launch => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_has_a_distinct_nonzero_code() {
        let errors = [
            BootstrapError::Config("DATABASE_URL".into()),
            BootstrapError::Connectivity(StoreError::Unreachable("refused".into())),
            BootstrapError::Schema(StoreError::DbError("readonly".into())),
            BootstrapError::Seeding(StoreError::DbError("locked".into())),
            BootstrapError::Launch {
                program: "gunicorn".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
        ];
        let mut codes: Vec<u8> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn store_error_is_kept_as_source() {
        let err = BootstrapError::Schema(StoreError::DbError("disk I/O error".into()));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("db error: disk I/O error"));
        assert_eq!(err.stage(), Stage::Schema);
    }
}
