//! Entity worker that owns the authoritative [`CombatController`].
//!
//! Receives commands from [`crate::EntityHandle`] and from the entity's
//! [`crate::TokioScheduler`], and applies them one at a time. Timer
//! callbacks are ordinary commands on the same channel, so a delayed kill
//! never interleaves with another operation on the same entity.

use std::time::Duration;

use combat_core::{CombatController, DueKill, EntityState, LifeState, ScheduleHandle};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Commands that can be sent to an entity worker
pub enum Command {
    TakeDamage {
        amount: u32,
        reply: oneshot::Sender<()>,
    },
    Heal {
        amount: u32,
        reply: oneshot::Sender<bool>,
    },
    HealFull {
        reply: oneshot::Sender<bool>,
    },
    RepairArmor {
        amount: u32,
        reply: oneshot::Sender<bool>,
    },
    RepairArmorFull {
        reply: oneshot::Sender<bool>,
    },
    Kill {
        force_destroy: bool,
        reply: oneshot::Sender<()>,
    },
    KillAfterDelay {
        force_destroy: bool,
        delay: Duration,
        reply: oneshot::Sender<Option<ScheduleHandle>>,
    },
    CancelPendingKills {
        reply: oneshot::Sender<usize>,
    },
    Snapshot {
        reply: oneshot::Sender<EntityState>,
    },
    LifeState {
        reply: oneshot::Sender<LifeState>,
    },
    RefreshDisplay {
        reply: oneshot::Sender<()>,
    },
    /// A delayed kill came due (sent by the scheduler, not by handles).
    FirePendingKill(DueKill),
    /// Stop the worker.
    Shutdown,
}

/// Background task that processes one entity's commands.
pub struct EntityWorker {
    controller: CombatController,
    command_rx: mpsc::Receiver<Command>,
}

impl EntityWorker {
    pub fn new(controller: CombatController, command_rx: mpsc::Receiver<Command>) -> Self {
        debug!(entity = %controller.id(), "EntityWorker initialized");
        Self {
            controller,
            command_rx,
        }
    }

    /// Main worker loop.
    ///
    /// Ends when every handle is dropped, on [`Command::Shutdown`], or once
    /// the entity's death requested its removal from the world.
    pub async fn run(mut self) {
        let id = self.controller.id();
        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                debug!(entity = %id, "worker shutting down");
                break;
            }
            if self.controller.removal_requested() {
                info!(entity = %id, "entity removed; worker stopping");
                break;
            }
        }
    }

    /// Applies one command. Returns `false` when the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::TakeDamage { amount, reply } => {
                self.controller.take_damage(amount);
                Self::respond(reply, (), "TakeDamage");
            }
            Command::Heal { amount, reply } => {
                let healed = self.controller.heal(amount);
                Self::respond(reply, healed, "Heal");
            }
            Command::HealFull { reply } => {
                let healed = self.controller.heal_full();
                Self::respond(reply, healed, "HealFull");
            }
            Command::RepairArmor { amount, reply } => {
                let repaired = self.controller.repair_armor(amount);
                Self::respond(reply, repaired, "RepairArmor");
            }
            Command::RepairArmorFull { reply } => {
                let repaired = self.controller.repair_armor_full();
                Self::respond(reply, repaired, "RepairArmorFull");
            }
            Command::Kill {
                force_destroy,
                reply,
            } => {
                self.controller.kill_with(force_destroy);
                Self::respond(reply, (), "Kill");
            }
            Command::KillAfterDelay {
                force_destroy,
                delay,
                reply,
            } => {
                let handle = self.controller.kill_after_delay(force_destroy, delay);
                Self::respond(reply, handle, "KillAfterDelay");
            }
            Command::CancelPendingKills { reply } => {
                let cancelled = self.controller.cancel_pending_kills();
                Self::respond(reply, cancelled, "CancelPendingKills");
            }
            Command::Snapshot { reply } => {
                Self::respond(reply, self.controller.state().clone(), "Snapshot");
            }
            Command::LifeState { reply } => {
                Self::respond(reply, self.controller.life_state(), "LifeState");
            }
            Command::RefreshDisplay { reply } => {
                self.controller.refresh_display();
                Self::respond(reply, (), "RefreshDisplay");
            }
            Command::FirePendingKill(due) => {
                self.controller.fire_pending_kill(due);
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn respond<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
        if reply.send(value).is_err() {
            debug!("{command} reply channel closed (caller dropped)");
        }
    }
}
