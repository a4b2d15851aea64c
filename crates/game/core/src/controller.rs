//! The combat state machine for one living entity.
//!
//! [`CombatController`] owns an [`EntityState`] and is the only code that
//! mutates it. Every public operation runs to completion synchronously,
//! updates the state under its invariants and emits zero or more
//! [`CombatEvent`]s. The only deferred work is the delayed kill, which is
//! handed to the injected [`Scheduler`] and comes back later as a
//! [`DueKill`].
//!
//! # State machine
//!
//! ```text
//! Alive ──take_damage(lethal)──────────────▶ Dead
//! Alive ──kill / kill_with(force)──────────▶ Dead
//! Alive ──kill_after_delay─────────────────▶ PendingDelayedKill
//! PendingDelayedKill ──fire_pending_kill───▶ Dead
//! Dead  (terminal)
//! ```
//!
//! Damage, heal and repair stay fully available while a delayed kill is
//! pending and never cancel it. Once dead, those operations are inert.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::combat::{apply_damage, mitigate, restore};
use crate::error::CombatError;
use crate::event::{CombatEvent, EntityEvent};
use crate::ports::{
    Collaborators, DueKill, LifecycleCollaborator, NotificationSink, PendingKill,
    PersistenceCollaborator, ScheduleHandle, Scheduler,
};
use crate::state::{EntityId, EntityState, LifeState};

/// Combat controller for a single entity.
#[derive(Debug)]
pub struct CombatController {
    state: EntityState,
    collaborators: Collaborators,
    pending: Vec<ScheduleHandle>,
    removal_requested: bool,
}

impl CombatController {
    /// Create a controller builder for the given state.
    pub fn builder(state: EntityState) -> ControllerBuilder {
        ControllerBuilder::new(state)
    }

    /// Wraps `state` and publishes the initial display refresh.
    pub fn new(state: EntityState, collaborators: Collaborators) -> Self {
        let controller = Self {
            state,
            collaborators,
            pending: Vec::new(),
            removal_requested: false,
        };
        controller.refresh_display();
        controller
    }

    pub fn id(&self) -> EntityId {
        self.state.id()
    }

    pub fn state(&self) -> &EntityState {
        &self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Delayed kills scheduled by this controller that have not fired yet.
    pub fn pending_kills(&self) -> &[ScheduleHandle] {
        &self.pending
    }

    /// Whether death asked the lifecycle collaborator to remove this entity.
    pub fn removal_requested(&self) -> bool {
        self.removal_requested
    }

    pub fn life_state(&self) -> LifeState {
        if !self.state.is_alive() {
            LifeState::Dead
        } else if self.pending.is_empty() {
            LifeState::Alive
        } else {
            LifeState::PendingDelayedKill
        }
    }

    /// Inflict `damage`, filtered through armor.
    ///
    /// No-op (no state change, no notification) when the entity is
    /// invincible or already dead.
    pub fn take_damage(&mut self, damage: u32) {
        let id = self.id();
        if self.state.config().invincible {
            trace!(entity = %id, damage, "damage ignored: invincible");
            return;
        }
        if !self.state.is_alive() {
            debug!(entity = %id, damage, "damage ignored: entity is dead");
            return;
        }

        let mitigation = mitigate(
            self.state.armor(),
            damage,
            self.state.config().armor_damage_reduction,
        );
        self.state.set_armor(mitigation.armor_after);
        if let Some(overflow) = mitigation.broken_overflow {
            debug!(entity = %id, overflow, "armor broken");
            self.emit(CombatEvent::ArmorBroken { overflow });
        }

        let health_before = self.state.health();
        let health_after = apply_damage(health_before, mitigation.health_damage);
        self.state.set_health(health_after);
        debug!(
            entity = %id,
            raw = damage,
            applied = mitigation.health_damage,
            health = health_after,
            armor = mitigation.armor_after,
            "damage applied"
        );
        self.emit(CombatEvent::Damaged {
            amount: health_before - health_after,
            health_before,
            health_after,
        });

        if health_after == 0 {
            let destroy = self.state.config().destroy_on_death;
            self.die(destroy);
        }

        self.refresh_display();
    }

    /// Restore up to `amount` health, capped at the maximum.
    ///
    /// Returns `false` (and changes nothing) when health is already full or
    /// the entity is dead.
    pub fn heal(&mut self, amount: u32) -> bool {
        if !self.state.is_alive() {
            debug!(entity = %self.id(), amount, "heal ignored: entity is dead");
            return false;
        }
        let before = self.state.health();
        let Some(after) = restore(before, self.state.max_health(), amount) else {
            return false;
        };
        self.state.set_health(after);
        trace!(entity = %self.id(), health = after, "healed");
        self.emit(CombatEvent::Healed {
            amount: after - before,
        });
        self.refresh_display();
        true
    }

    /// Heal to full health.
    pub fn heal_full(&mut self) -> bool {
        self.heal(self.state.max_health())
    }

    /// Restore up to `amount` armor, capped at the maximum.
    ///
    /// Returns `false` (and changes nothing) when armor is already full or
    /// the entity is dead.
    pub fn repair_armor(&mut self, amount: u32) -> bool {
        if !self.state.is_alive() {
            debug!(entity = %self.id(), amount, "repair ignored: entity is dead");
            return false;
        }
        let before = self.state.armor();
        let Some(after) = restore(before, self.state.max_armor(), amount) else {
            return false;
        };
        self.state.set_armor(after);
        trace!(entity = %self.id(), armor = after, "armor repaired");
        self.emit(CombatEvent::ArmorRepaired {
            amount: after - before,
        });
        self.refresh_display();
        true
    }

    /// Repair armor to full.
    pub fn repair_armor_full(&mut self) -> bool {
        self.repair_armor(self.state.max_armor())
    }

    /// Kill immediately, honouring the configured removal policy.
    pub fn kill(&mut self) {
        self.kill_with(false);
    }

    /// Kill immediately.
    ///
    /// With `force_destroy`, removal is requested regardless of policy and
    /// `destroy_on_death` stays set on the entity's configuration afterwards.
    /// Killing a dead entity does nothing.
    pub fn kill_with(&mut self, force_destroy: bool) {
        if !self.state.is_alive() {
            debug!(entity = %self.id(), force_destroy, "kill ignored: entity is dead");
            return;
        }
        if force_destroy {
            self.state.config_mut().destroy_on_death = true;
        }
        let destroy = self.state.config().destroy_on_death;
        self.die(destroy);
    }

    /// Schedule a plain kill after `delay`.
    pub fn kill_after(&mut self, delay: Duration) -> Option<ScheduleHandle> {
        self.kill_after_delay(false, delay)
    }

    /// Schedule a kill after `delay`, optionally forcing removal.
    ///
    /// Returns immediately. `None` means nothing was scheduled: either the
    /// entity is already dead or the scheduler refused (the refusal is
    /// logged, not propagated).
    pub fn kill_after_delay(
        &mut self,
        force_destroy: bool,
        delay: Duration,
    ) -> Option<ScheduleHandle> {
        let id = self.id();
        if !self.state.is_alive() {
            debug!(entity = %id, "delayed kill not scheduled: entity is dead");
            return None;
        }

        let kill = PendingKill { force_destroy };
        match self.collaborators.scheduler.schedule(id, delay, kill) {
            Ok(handle) => {
                debug!(entity = %id, %handle, ?delay, force_destroy, "delayed kill scheduled");
                self.pending.push(handle);
                Some(handle)
            }
            Err(err) => {
                warn!(
                    entity = %id,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "failed to schedule delayed kill: {err}"
                );
                None
            }
        }
    }

    /// Deliver a delayed kill that has come due.
    ///
    /// Kills that were cancelled, belong to another entity, or arrive after
    /// death are ignored.
    pub fn fire_pending_kill(&mut self, due: DueKill) {
        let id = self.id();
        if due.entity != id {
            warn!(entity = %id, target = %due.entity, handle = %due.handle, "delayed kill routed to wrong entity");
            return;
        }
        let Some(index) = self.pending.iter().position(|h| *h == due.handle) else {
            debug!(entity = %id, handle = %due.handle, "delayed kill no longer pending");
            return;
        };
        self.pending.swap_remove(index);

        if !self.state.is_alive() {
            debug!(entity = %id, handle = %due.handle, "delayed kill fired after death");
            return;
        }
        debug!(entity = %id, handle = %due.handle, "delayed kill fired");
        self.kill_with(due.kill.force_destroy);
    }

    /// Cancel every outstanding delayed kill. Returns how many were cancelled.
    ///
    /// Never called implicitly by other operations.
    pub fn cancel_pending_kills(&mut self) -> usize {
        let scheduler = Arc::clone(&self.collaborators.scheduler);
        let cancelled = self
            .pending
            .drain(..)
            .filter(|handle| scheduler.cancel(*handle))
            .count();
        debug!(entity = %self.id(), cancelled, "pending kills cancelled");
        cancelled
    }

    /// Death transition. Side effects fire at most once per entity.
    fn die(&mut self, destroy: bool) {
        let id = self.id();
        if !self.state.is_alive() {
            return;
        }
        self.state.mark_dead();
        info!(entity = %id, destroy, "entity died");

        if self.state.config().save_on_death
            && let Err(err) = self.collaborators.persistence.save(&self.state)
        {
            warn!(
                entity = %id,
                code = err.error_code(),
                "save on death failed: {err}"
            );
        }

        self.emit(CombatEvent::Died { destroy });
        self.refresh_display();

        if destroy {
            self.removal_requested = true;
            self.collaborators.lifecycle.request_removal(id);
        }
    }

    /// Publish the current view to the sink without changing state.
    pub fn refresh_display(&self) {
        self.emit(CombatEvent::DisplayRefresh(self.state.view()));
    }

    fn emit(&self, event: CombatEvent) {
        self.collaborators
            .sink
            .notify(EntityEvent::new(self.state.id(), event));
    }
}

/// Builder for [`CombatController`] with injectable collaborators.
pub struct ControllerBuilder {
    state: EntityState,
    collaborators: Collaborators,
}

impl ControllerBuilder {
    fn new(state: EntityState) -> Self {
        Self {
            state,
            collaborators: Collaborators::default(),
        }
    }

    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.collaborators.sink = sink;
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.collaborators.scheduler = scheduler;
        self
    }

    pub fn persistence(mut self, persistence: Arc<dyn PersistenceCollaborator>) -> Self {
        self.collaborators.persistence = persistence;
        self
    }

    pub fn lifecycle(mut self, lifecycle: Arc<dyn LifecycleCollaborator>) -> Self {
        self.collaborators.lifecycle = lifecycle;
        self
    }

    /// Replace the whole collaborator bundle.
    pub fn collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    pub fn build(self) -> CombatController {
        CombatController::new(self.state, self.collaborators)
    }
}
