use async_trait::async_trait;
use bookshelf_kernel::{InitCtx, Module};

use crate::fixtures;
use crate::store::Store;

/// Core module owning the catalogue store lifecycle
pub struct StoreModule {
    store: Store,
}

impl StoreModule {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for StoreModule {
    fn name(&self) -> &'static str {
        "db"
    }

    fn has_routes(&self) -> bool {
        false
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            target: "bookshelf-db",
            seed = ctx.settings.seed.enabled,
            "catalogue store ready"
        );
        Ok(())
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.seed.enabled && self.store.is_empty().await {
            let books = fixtures::seed_demo(&self.store).await;
            tracing::info!(target: "bookshelf-db", books, "demo catalogue loaded");
        }
        Ok(())
    }
}
