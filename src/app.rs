//! Composition root: store, views, modules, and the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use bookcase_kernel::{settings::Settings, InitCtx, ModuleRegistry, ViewRenderer};

use crate::modules::{
    self,
    books::{
        models::SeedBook,
        store::{BookStore, MemoryBookStore},
    },
};
use crate::views::HtmlRenderer;

/// Build the book store, loading the configured seed file if any.
pub async fn build_store(settings: &Settings) -> anyhow::Result<MemoryBookStore> {
    let Some(path) = &settings.database.seed_file else {
        return Ok(MemoryBookStore::new());
    };

    let seed: Vec<SeedBook> = bookcase_db::load_seed(path)?;
    MemoryBookStore::seeded(seed)
        .await
        .with_context(|| format!("failed to seed books from {}", path.display()))
}

/// Register every module against `store` and return the registry together
/// with the renderer shared by pages and the fault boundary.
pub fn compose(store: Arc<dyn BookStore>) -> (ModuleRegistry, Arc<dyn ViewRenderer>) {
    let views: Arc<dyn ViewRenderer> = Arc::new(HtmlRenderer::new());
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, views.clone());
    (registry, views)
}

/// The complete HTTP application over `store`, without binding a socket.
pub fn router(settings: &Settings, store: Arc<dyn BookStore>) -> Router {
    let (registry, views) = compose(store);
    bookcase_http::build_router(&registry, settings, views)
}

/// Run the application until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = build_store(&settings)
        .await
        .context("failed to build book store")?;
    let (registry, views) = compose(Arc::new(store));

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookcase_http::start_server(&registry, &settings, views).await;

    registry.stop_all().await?;
    served
}
