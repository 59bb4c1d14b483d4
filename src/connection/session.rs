//! `MongoSession`: connection parameters plus the client, database and collection handles.

use mongodb::bson::{Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tokio::runtime::Runtime;

use crate::config::ConnectionParams;
use crate::error::{Error, Result};

/// Blocking facade over one MongoDB collection.
///
/// Handles are established in order: `connect_client`, `connect_database`,
/// `connect_collection`. Each step returns `&mut Self` so the sequence chains with `?`.
/// The collection handle is only ever valid for the database handle it was derived
/// from; `connect_database` clears it.
///
/// The session drives the async driver on its own Tokio runtime, so it must not be
/// used from inside another async runtime.
pub struct MongoSession {
    params: ConnectionParams,
    pub(crate) collection: Option<Collection<Document>>,
    database: Option<Database>,
    client: Option<Client>,
    pub(crate) runtime: Runtime,
}

impl MongoSession {
    /// Create an unconnected session. No network traffic happens until `connect_client`.
    pub fn new(params: ConnectionParams) -> Result<Self> {
        params.validate()?;
        let runtime = Runtime::new()?;
        Ok(Self { params, collection: None, database: None, client: None, runtime })
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Create the client from `mongodb://{host}` plus credentials, then ping to verify.
    ///
    /// Calling this again replaces the client and drops every handle derived from it.
    pub fn connect_client(&mut self) -> Result<&mut Self> {
        let uri = self.params.uri();
        let credential = self.params.credential();

        if self.params.has_credentials() {
            log::info!(
                "Connecting to {uri} as {} (authSource: {})",
                self.params.user,
                self.params.database
            );
        } else {
            log::info!("Connecting to {uri} without credentials");
        }

        let client = self.runtime.block_on(async move {
            let mut options = ClientOptions::parse(&uri).await?;
            options.credential = credential;
            let client = Client::with_options(options)?;

            // Ping to verify connection
            client.database("admin").run_command(doc! { "ping": 1 }).await?;

            Ok::<Client, Error>(client)
        })?;

        self.disconnect();
        self.client = Some(client);
        Ok(self)
    }

    /// Select the configured database. Clears any collection handle.
    pub fn connect_database(&mut self) -> Result<&mut Self> {
        let client = self.client.as_ref().ok_or(Error::NotConnected("client"))?;
        self.database = Some(client.database(&self.params.database));
        self.collection = None;
        log::debug!("Using database {}", self.params.database);
        Ok(self)
    }

    /// Select the configured collection within the current database.
    pub fn connect_collection(&mut self) -> Result<&mut Self> {
        let database = self.database.as_ref().ok_or(Error::NotConnected("database"))?;
        self.collection = Some(database.collection::<Document>(&self.params.collection));
        log::debug!("Using collection {}", self.params.namespace());
        Ok(self)
    }

    /// Point the session at another database.
    /// The collection handle is invalidated until `connect_collection` runs again.
    pub fn switch_database(&mut self, database: impl Into<String>) -> Result<&mut Self> {
        self.params = self.params.clone().with_database(database);
        self.connect_database()
    }

    /// Point the session at another collection in the current database.
    pub fn switch_collection(&mut self, collection: impl Into<String>) -> Result<&mut Self> {
        self.params = self.params.clone().with_collection(collection);
        self.connect_collection()
    }

    /// Release all handles and shut the client down. A no-op when not connected.
    pub fn disconnect(&mut self) {
        self.collection = None;
        self.database = None;
        if let Some(client) = self.client.take() {
            self.runtime.block_on(async { client.shutdown().await });
            log::info!("Disconnected from {}", self.params.host);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    pub fn collection(&self) -> Option<&Collection<Document>> {
        self.collection.as_ref()
    }
}

impl Drop for MongoSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for MongoSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSession")
            .field("params", &self.params)
            .field("client", &self.client.is_some())
            .field("database", &self.database.is_some())
            .field("collection", &self.collection.is_some())
            .finish()
    }
}
