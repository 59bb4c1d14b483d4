//! Connection parameters and environment loading.

use std::fmt;
use std::path::{Path, PathBuf};

use mongodb::options::Credential;

use crate::error::{Error, Result};

pub const ENV_HOST: &str = "MONGO_HOST";
pub const ENV_USER: &str = "MONGO_USER";
pub const ENV_PASSWORD: &str = "MONGO_PASSWORD";
pub const ENV_DATABASE: &str = "MONGO_DATABASE";
pub const ENV_COLLECTION: &str = "MONGO_COLLECTION";

pub const REDACTED_PASSWORD: &str = "*****";

/// Host, credentials and target namespace for both the CRUD facade and the importer.
///
/// Values are immutable once built; the `with_*` methods return a new set of
/// parameters rather than mutating in place.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub collection: String,
}

impl ConnectionParams {
    /// Parameters for an unauthenticated connection.
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: String::new(),
            password: String::new(),
            database: database.into(),
            collection: collection.into(),
        }
    }

    pub fn with_credentials(self, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self { user: user.into(), password: password.into(), ..self }
    }

    pub fn with_database(self, database: impl Into<String>) -> Self {
        Self { database: database.into(), ..self }
    }

    pub fn with_collection(self, collection: impl Into<String>) -> Self {
        Self { collection: collection.into(), ..self }
    }

    /// Read parameters from `MONGO_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read parameters through an arbitrary key lookup.
    /// Host, database and collection are required; user and password default to empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{key} is not set")))
        };

        let params = Self {
            host: required(ENV_HOST)?,
            user: lookup(ENV_USER).unwrap_or_default(),
            password: lookup(ENV_PASSWORD).unwrap_or_default(),
            database: required(ENV_DATABASE)?,
            collection: required(ENV_COLLECTION)?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host is required".into()));
        }
        if self.host.contains("://") {
            return Err(Error::Config(format!(
                "host must not include a scheme (got {})",
                self.host
            )));
        }
        if self.database.trim().is_empty() {
            return Err(Error::Config("database name is required".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(Error::Config("collection name is required".into()));
        }
        if self.user.is_empty() && !self.password.is_empty() {
            return Err(Error::Config("password given without a user".into()));
        }
        Ok(())
    }

    /// Connection URI built from the host alone; credentials travel separately.
    pub fn uri(&self) -> String {
        format!("mongodb://{}", self.host)
    }

    /// Whether a username was supplied.
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty()
    }

    /// Credential authenticating against the target database as the auth source.
    /// `None` when no username is configured.
    pub fn credential(&self) -> Option<Credential> {
        if !self.has_credentials() {
            return None;
        }
        Some(
            Credential::builder()
                .username(self.user.clone())
                .password(self.password.clone())
                .source(self.database.clone())
                .build(),
        )
    }

    /// `database.collection`
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { REDACTED_PASSWORD };
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &password)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

/// Load a `.env` file into the process environment.
///
/// With no explicit path, a missing `.env` in the working directory is not an error.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .map_err(|e| Error::Config(format!("failed to load {}: {e}", path.display())))?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(Error::Config(format!("failed to load .env: {e}"))),
        },
    }
}
