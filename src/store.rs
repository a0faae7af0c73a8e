//! Backing store context.
//!
//! A [`Store`] is opened once at process start and handed to every operation
//! that reads or writes the shared collections. Each collection keeps its
//! latest complete snapshot in a `watch` channel; writers call
//! [`Collection::refresh`] after committing so subscribers always receive a
//! full replacement view, never a diff.

use crate::entities::{Administrator, Announcement, MenuEntry, Order, Requester};
use crate::errors::Result;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

/// A complete, immutable view of one collection.
pub type Snapshot<T> = Arc<Vec<T>>;

/// One named collection and its snapshot channel.
pub struct Collection<E: EntityTrait> {
    name: &'static str,
    sender: watch::Sender<Snapshot<E::Model>>,
    // Serializes reload+publish so the last published snapshot is never older
    // than the last committed write.
    refresh_lock: Mutex<()>,
}

impl<E> Collection<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    async fn load(db: &DatabaseConnection, name: &'static str) -> Result<Self> {
        let rows = E::find().all(db).await?;
        debug!("Loaded {} documents from {}", rows.len(), name);
        let (sender, _) = watch::channel(Arc::new(rows));
        Ok(Self {
            name,
            sender,
            refresh_lock: Mutex::new(()),
        })
    }

    /// Collection name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Subscribes to full snapshots. The receiver starts at the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<E::Model>> {
        self.sender.subscribe()
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn current(&self) -> Snapshot<E::Model> {
        Arc::clone(&*self.sender.borrow())
    }

    /// Re-reads the whole collection and publishes it to every subscriber.
    pub async fn refresh(&self, db: &DatabaseConnection) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        let rows = E::find().all(db).await?;
        debug!("Publishing {} documents from {}", rows.len(), self.name);
        self.sender.send_replace(Arc::new(rows));
        Ok(())
    }

    /// Re-publishes after a committed write.
    ///
    /// The write stands even if the re-read fails: the error is logged and
    /// subscribers keep the previous snapshot until the next refresh.
    pub async fn publish(&self, db: &DatabaseConnection) {
        if let Err(e) = self.refresh(db).await {
            warn!("Snapshot of {} is stale after a committed write: {}", self.name, e);
        }
    }
}

/// Explicit store-access context threaded through every component.
pub struct Store {
    db: DatabaseConnection,
    /// Submitted orders
    pub orders: Collection<Order>,
    /// Daily menus
    pub menus: Collection<MenuEntry>,
    /// People orders can be placed for
    pub requesters: Collection<Requester>,
    /// Management accounts
    pub administrators: Collection<Administrator>,
    /// News feed
    pub announcements: Collection<Announcement>,
}

impl Store {
    /// Opens the store over an already-migrated connection and loads the
    /// initial snapshot of every collection.
    #[instrument(skip(db))]
    pub async fn open(db: DatabaseConnection) -> Result<Self> {
        let orders = Collection::load(&db, "orders").await?;
        let menus = Collection::load(&db, "menu_entries").await?;
        let requesters = Collection::load(&db, "requesters").await?;
        let administrators = Collection::load(&db, "administrators").await?;
        let announcements = Collection::load(&db, "announcements").await?;
        info!("Store opened");
        Ok(Self {
            db,
            orders,
            menus,
            requesters,
            administrators,
            announcements,
        })
    }

    /// Underlying connection, for writes.
    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Closes the connection. Subscribers see their channels close once the
    /// store is dropped.
    pub async fn close(self) -> Result<()> {
        self.db.close().await?;
        info!("Store closed");
        Ok(())
    }
}
