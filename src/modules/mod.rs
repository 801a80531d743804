pub mod authors;
pub mod books;

use bookshelf_db::Store;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// Register all catalogue modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: &Store, settings: &Settings) {
    let page_size = settings.pagination.page_size;
    registry.register_custom(books::create_module(store.clone(), page_size));
    registry.register_custom(authors::create_module(store.clone(), page_size));
}
