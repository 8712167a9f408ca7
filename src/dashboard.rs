//! Async facade pairing a [`Backend`] with a [`SyncCoordinator`].
//!
//! Each operation awaits its backend call first. Only a successful result
//! reaches the coordinator; a failure is returned unchanged and leaves the
//! store, markers and selection exactly as they were.

use crate::{
    backend::{Backend, EntityDraft},
    core::config::DashboardConfig,
    entity::{EntityKey, EntityKind},
    markers::{canvas::MarkerCanvas, registry::ReconcileReport, style::GlyphCatalog},
    sync::coordinator::SyncCoordinator,
    DashError, Result,
};

pub struct Dashboard<B: Backend, C: MarkerCanvas> {
    backend: B,
    sync: SyncCoordinator<C>,
    config: DashboardConfig,
}

impl<B: Backend, C: MarkerCanvas> Dashboard<B, C> {
    pub fn new(config: DashboardConfig, backend: B, canvas: C) -> Self {
        let sync = SyncCoordinator::new(&config, canvas);
        Self {
            backend,
            sync,
            config,
        }
    }

    pub fn with_glyphs(mut self, glyphs: GlyphCatalog) -> Self {
        self.sync = self.sync.with_glyphs(glyphs);
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn sync(&self) -> &SyncCoordinator<C> {
        &self.sync
    }

    /// Filter, selection and hover changes go straight to the coordinator
    pub fn sync_mut(&mut self) -> &mut SyncCoordinator<C> {
        &mut self.sync
    }

    /// Fetches places and events concurrently and replaces the store in one step
    pub async fn load(&mut self) -> Result<ReconcileReport> {
        let listed = futures::try_join!(self.backend.list_places(), self.backend.list_events());
        match listed {
            Ok((places, events)) => Ok(self.sync.on_loaded(places, events)),
            Err(e) => {
                log::error!("failed to load places and events: {}", e);
                Err(e)
            }
        }
    }

    pub async fn create(&mut self, kind: EntityKind, draft: &EntityDraft) -> Result<EntityKey> {
        match self.backend.create(kind, draft).await {
            Ok(entity) => {
                let key = entity.key();
                self.sync.on_created(entity);
                Ok(key)
            }
            Err(e) => {
                log::error!("failed to create {}: {}", kind, e);
                Err(e)
            }
        }
    }

    pub async fn update(&mut self, key: EntityKey, draft: &EntityDraft) -> Result<ReconcileReport> {
        match self.backend.update(key, draft).await {
            Ok(entity) if entity.key() == key => Ok(self.sync.on_updated(entity)),
            Ok(entity) => {
                log::error!("update of {} answered with {}", key, entity.key());
                Err(DashError::Backend {
                    status: 200,
                    message: format!("update of {} returned {}", key, entity.key()),
                })
            }
            Err(e) => {
                log::error!("failed to update {}: {}", key, e);
                Err(e)
            }
        }
    }

    /// Deletes an entity. Places in a protected category are refused
    /// before any backend call is made.
    pub async fn delete(&mut self, key: EntityKey) -> Result<ReconcileReport> {
        if let Some(category) = self
            .sync
            .store()
            .get(&key)
            .and_then(|e| e.category.as_deref())
            .filter(|c| self.config.is_protected_category(c))
        {
            return Err(DashError::ProtectedCategory {
                key,
                category: category.to_string(),
            });
        }

        match self.backend.delete(key).await {
            Ok(()) => Ok(self.sync.on_deleted(key)),
            Err(e) => {
                log::error!("failed to delete {}: {}", key, e);
                Err(e)
            }
        }
    }
}
