//! Common test utilities and fixtures for integration tests using Testcontainers.
//!
//! A single MongoDB 7.0 container is shared per test binary (Rust compiles each
//! `tests/*.rs` file as a separate binary). Per-test isolation is achieved by
//! namespacing every database name with a short UUID suffix.
//!
//! The container runs on a dedicated background thread with its own tokio runtime.
//! `MongoSession` drives the driver on its own runtime too, so session tests are
//! plain `#[test]` functions rather than `#[tokio::test]`.
//!
//! An `atexit` hook ensures the container is removed when the process exits.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::OnceLock;

use mongolink::{ConnectionParams, MongoSession};
use mongodb::bson::doc;
use mongodb::{Client, options::ClientOptions};
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

/// Connection info for the shared container.
struct SharedContainer {
    host: String,
}

static SHARED: OnceLock<SharedContainer> = OnceLock::new();

/// Docker container ID — stored globally so the `atexit` handler can remove it.
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

unsafe extern "C" {
    fn atexit(f: extern "C" fn()) -> i32;
}

/// Called by the C runtime on process exit. Forcibly removes the shared container.
extern "C" fn remove_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", id])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

/// Initialize the shared container (called once per test binary).
fn get_or_init_shared() -> &'static SharedContainer {
    SHARED.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create container runtime");

            rt.block_on(async {
                let container = Mongo::default()
                    .with_tag("7.0")
                    .start()
                    .await
                    .expect("Failed to start MongoDB container");

                // Store container ID for the atexit cleanup hook.
                let _ = CONTAINER_ID.set(container.id().to_string());
                unsafe {
                    atexit(remove_container);
                }

                let host = container.get_host().await.expect("Failed to get host");
                let port = container.get_host_port_ipv4(27017).await.expect("Failed to get port");
                let host = format!("{}:{}", host, port);

                // Readiness probe
                let opts = ClientOptions::parse(format!("mongodb://{host}"))
                    .await
                    .expect("Failed to parse");
                let probe = Client::with_options(opts).expect("Failed to create probe client");
                for _ in 0..30 {
                    if probe.list_database_names().await.is_ok() {
                        break;
                    }
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
                drop(probe);

                tx.send(host).expect("Failed to send host");

                // Park forever — keeps the container alive until the process exits.
                std::future::pending::<()>().await;
            });
        });

        SharedContainer { host: rx.recv().expect("Failed to receive host") }
    })
}

/// A lightweight handle to the shared MongoDB container with per-test isolation.
///
/// Each handle gets a unique `test_id` so that `db_name("foo")` returns
/// `foo_{test_id}`, preventing cross-test interference.
pub struct MongoTestContainer {
    pub host: String,
    test_id: String,
}

impl MongoTestContainer {
    pub fn start() -> Self {
        let shared = get_or_init_shared();

        // Use first 8 chars of UUID v4 as a short, unique namespace suffix.
        let test_id = uuid::Uuid::new_v4().to_string()[..8].to_string();

        Self { host: shared.host.clone(), test_id }
    }

    /// Return the namespaced database name for this test.
    pub fn db_name(&self, name: &str) -> String {
        format!("{}_{}", name, self.test_id)
    }

    /// Unauthenticated parameters for a namespaced database.
    pub fn params(&self, db: &str, collection: &str) -> ConnectionParams {
        ConnectionParams::new(self.host.clone(), self.db_name(db), collection)
    }

    /// Create `user` with readWrite on the namespaced database `db`.
    ///
    /// The container runs without `--auth`, but credentials that are supplied are
    /// still checked, so this exercises the real authentication handshake.
    pub fn create_user(&self, db: &str, user: &str, password: &str) {
        let db_name = self.db_name(db);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create runtime");

        rt.block_on(async {
            let client = Client::with_uri_str(format!("mongodb://{}", self.host))
                .await
                .expect("Failed to create admin client");
            client
                .database(&db_name)
                .run_command(doc! {
                    "createUser": user,
                    "pwd": password,
                    "roles": [{ "role": "readWrite", "db": db_name.as_str() }],
                })
                .await
                .expect("Failed to create user");
            client.shutdown().await;
        });
    }

    /// A session with the full connect sequence already run.
    pub fn session(&self, db: &str, collection: &str) -> MongoSession {
        let mut session =
            MongoSession::new(self.params(db, collection)).expect("Failed to create session");
        session
            .connect_client()
            .expect("Failed to connect client")
            .connect_database()
            .expect("Failed to connect database")
            .connect_collection()
            .expect("Failed to connect collection");
        session
    }
}
