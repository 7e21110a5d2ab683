//! bookcase application library
//!
//! The book catalog module, its HTML views, and the composition root that
//! wires them to the kernel and HTTP crates.

pub mod app;
pub mod modules;
pub mod utils;
pub mod views;

pub use app::{build_store, compose, run};
pub use modules::books::models::{Book, BookForm};
pub use modules::books::store::{BookStore, MemoryBookStore, StoreError};
