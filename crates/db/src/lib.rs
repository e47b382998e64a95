//! MongoDB client factory and the `db` lifecycle module.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use mongodb::{bson::doc, options::ClientOptions, Client, Collection, Database};
use shelf_kernel::{settings::DatabaseSettings, InitCtx, Module};

const APP_NAME: &str = "shelf";

/// Shared handle to the configured MongoDB database.
///
/// Cloning is cheap; the driver pools connections internally, so a single
/// store is created at startup and handed to every repository.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    client: Client,
    database: Database,
}

impl DocumentStore {
    /// Typed handle to a collection in the configured database.
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.database.collection::<T>(name)
    }

    /// Name of the configured database.
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Round-trip a `ping` command to the server.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .with_context(|| format!("failed to ping database '{}'", self.database.name()))?;
        Ok(())
    }

    /// Close pooled connections and wait for background driver tasks.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}

/// Build driver options from settings without touching the network.
pub async fn client_options(settings: &DatabaseSettings) -> anyhow::Result<ClientOptions> {
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .with_context(|| "failed to parse database connection string")?;

    let connect_timeout = Duration::from_millis(settings.connect_timeout_ms);
    options.app_name = Some(APP_NAME.to_string());
    options.connect_timeout = Some(connect_timeout);
    options.server_selection_timeout = Some(connect_timeout);

    Ok(options)
}

/// Connect to MongoDB and verify the server answers a ping.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DocumentStore> {
    let options = client_options(settings).await?;
    let client = Client::with_options(options).with_context(|| "failed to create database client")?;
    let database = client.database(&settings.name);
    let store = DocumentStore { client, database };

    store.ping().await?;

    tracing::info!(
        target: "shelf-db",
        database = %settings.name,
        "database connection established"
    );
    Ok(store)
}

/// Lifecycle module owning the database connection.
pub struct DatabaseModule {
    store: DocumentStore,
}

impl DatabaseModule {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.store.ping().await?;
        tracing::info!(
            module = self.name(),
            database = %self.store.database_name(),
            collection = %ctx.settings.database.collection,
            "db module initialized"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store.shutdown().await;
        tracing::info!(module = self.name(), "db module stopped");
        Ok(())
    }
}
