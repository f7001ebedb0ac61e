/* src/loader/impls/mod.rs */

mod dyn_loader;
mod file_loader;
mod fn_loader;
mod source_loader;
mod static_loader;

pub use dyn_loader::{DynLoader, DynLoaderBuilder};
pub use file_loader::FileLoader;
pub use fn_loader::{FnLoader, loader_fn};
pub use source_loader::SourceLoader;
pub use static_loader::StaticLoader;
