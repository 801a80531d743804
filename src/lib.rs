//! Bookshelf application library
//!
//! Book and author catalogue modules, the list query resolver and the
//! pagination they share.

pub mod modules;
pub mod query;

mod openapi;

use std::sync::Arc;

use bookshelf_db::{Store, StoreModule};
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// Registry with the store as core module and every catalogue module on top
pub fn build_registry(store: &Store, settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_core(Arc::new(StoreModule::new(store.clone())));
    modules::register_all(&mut registry, store, settings);
    registry
}
