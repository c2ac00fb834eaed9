pub mod books;

use anyhow::Context;
use booksearch_kernel::{settings::Settings, ModuleRegistry};

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let books = books::create_module(&settings.openlibrary)
        .with_context(|| "failed to create books module")?;
    registry.register(books)
}
