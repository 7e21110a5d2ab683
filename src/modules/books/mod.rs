pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookcase_kernel::{InitCtx, Module, ViewRenderer};

use routes::BooksState;
use store::BookStore;

/// Book catalog: list, create, view, edit, and delete through HTML forms.
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>, views: Arc<dyn ViewRenderer>) -> Self {
        Self {
            state: BooksState { store, views },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.state.store.list().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = books.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(
    store: Arc<dyn BookStore>,
    views: Arc<dyn ViewRenderer>,
) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store, views))
}
