//! SHELF application library
//!
//! Book catalogue modules plus the startup wiring that binds them to storage.

pub mod modules;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use shelf_db::DatabaseModule;
use shelf_kernel::{
    settings::{Settings, StorageBackend},
    InitCtx, ModuleRegistry,
};

use modules::books::repository::{BookRepository, InMemoryBookRepository, MongoBookRepository};

/// Re-export commonly used types
pub use modules::*;

/// Construct every layer once, bound to the configured storage backend
pub async fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();

    let repository: Arc<dyn BookRepository> = match settings.database.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory book storage; data is lost on restart");
            Arc::new(InMemoryBookRepository::new())
        }
        StorageBackend::Mongodb => {
            let store = shelf_db::connect(&settings.database)
                .await
                .with_context(|| format!("failed to connect to {}", settings.database.uri))?;
            let repository = MongoBookRepository::new(
                &store,
                &settings.database.collection,
                Duration::from_millis(settings.database.operation_timeout_ms),
            );
            registry.register(Arc::new(DatabaseModule::new(store)));
            Arc::new(repository)
        }
    };

    modules::register_all(&mut registry, repository);
    Ok(registry)
}

/// Run the application until the HTTP server shuts down
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    served
}
