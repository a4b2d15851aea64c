//! Cloneable façade for issuing commands to one entity.
//!
//! [`EntityHandle`] hides channel plumbing. Every call is a round trip to the
//! entity's worker, so calls made through any clone of the handle are applied
//! one at a time in the order the worker receives them.

use std::time::Duration;

use combat_core::{EntityId, EntityState, LifeState, ScheduleHandle};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to a spawned entity.
#[derive(Clone)]
pub struct EntityHandle {
    id: EntityId,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl EntityHandle {
    pub(crate) fn new(id: EntityId, command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            id,
            command_tx,
            event_bus,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn take_damage(&self, amount: u32) -> Result<()> {
        self.request(|reply| Command::TakeDamage { amount, reply })
            .await
    }

    /// Returns `false` when health was already full or the entity is dead.
    pub async fn heal(&self, amount: u32) -> Result<bool> {
        self.request(|reply| Command::Heal { amount, reply }).await
    }

    pub async fn heal_full(&self) -> Result<bool> {
        self.request(|reply| Command::HealFull { reply }).await
    }

    /// Returns `false` when armor was already full or the entity is dead.
    pub async fn repair_armor(&self, amount: u32) -> Result<bool> {
        self.request(|reply| Command::RepairArmor { amount, reply })
            .await
    }

    pub async fn repair_armor_full(&self) -> Result<bool> {
        self.request(|reply| Command::RepairArmorFull { reply })
            .await
    }

    pub async fn kill(&self) -> Result<()> {
        self.kill_with(false).await
    }

    /// Kill now; with `force_destroy` the entity is removed regardless of policy.
    pub async fn kill_with(&self, force_destroy: bool) -> Result<()> {
        self.request(|reply| Command::Kill {
            force_destroy,
            reply,
        })
        .await
    }

    /// Schedule a kill after `delay`. Resolves as soon as the kill is
    /// scheduled, not when it fires.
    pub async fn kill_after_delay(
        &self,
        force_destroy: bool,
        delay: Duration,
    ) -> Result<Option<ScheduleHandle>> {
        self.request(|reply| Command::KillAfterDelay {
            force_destroy,
            delay,
            reply,
        })
        .await
    }

    pub async fn kill_after(&self, delay: Duration) -> Result<Option<ScheduleHandle>> {
        self.kill_after_delay(false, delay).await
    }

    /// Cancel every delayed kill still pending. Returns how many were cancelled.
    pub async fn cancel_pending_kills(&self) -> Result<usize> {
        self.request(|reply| Command::CancelPendingKills { reply })
            .await
    }

    /// Copy of the entity's current state.
    pub async fn snapshot(&self) -> Result<EntityState> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn life_state(&self) -> Result<LifeState> {
        self.request(|reply| Command::LifeState { reply }).await
    }

    /// Ask the entity to republish its current view on the display topic.
    pub async fn refresh_display(&self) -> Result<()> {
        self.request(|reply| Command::RefreshDisplay { reply })
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// The receiver sees events for every entity on the bus; filter with
    /// [`Event::entity`].
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}

impl std::fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityHandle")
            .field("id", &self.id)
            .field("closed", &self.command_tx.is_closed())
            .finish()
    }
}
