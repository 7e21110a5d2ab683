pub mod books;

use std::sync::Arc;

use bookcase_kernel::{ModuleRegistry, ViewRenderer};

use books::store::BookStore;

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: Arc<dyn BookStore>,
    views: Arc<dyn ViewRenderer>,
) {
    registry.register(books::create_module(store, views));
}
