//! Kernel for bookcase: module lifecycle, layered settings, and the view seam.

pub mod module;
pub mod registry;
pub mod settings;
pub mod view;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use view::{RenderError, ViewRenderer};
