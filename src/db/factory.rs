//! Repository factory for dependency injection.
//!
//! Creates repository instances based on runtime configuration, so callers
//! depend on the trait and never on a concrete backend.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{RepositoryError, RepositoryResult, TimetableRepository};
use crate::config::AppConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from the `REPOSITORY_TYPE` environment variable,
    /// defaulting to Local.
    pub fn from_env() -> Self {
        match std::env::var("REPOSITORY_TYPE") {
            Ok(val) => val.parse().unwrap_or(Self::Local),
            Err(_) => Self::Local,
        }
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn TimetableRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn TimetableRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    pub fn from_env() -> RepositoryResult<Arc<dyn TimetableRepository>> {
        Self::create(RepositoryType::from_env())
    }

    /// Create repository from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn TimetableRepository>> {
        let config = AppConfig::from_file(config_path)
            .map_err(|e| RepositoryError::configuration(e.to_string()))?;
        let repo_type = config
            .repository_type()
            .map_err(RepositoryError::configuration)?;
        Self::create(repo_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!("local".parse::<RepositoryType>().unwrap(), RepositoryType::Local);
        assert_eq!("Memory".parse::<RepositoryType>().unwrap(), RepositoryType::Local);
        assert!("postgres".parse::<RepositoryType>().is_err());
    }

    #[tokio::test]
    async fn test_create_local_is_healthy() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }
}
