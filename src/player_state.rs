// player_state.rs
use serde::Serialize;

use crate::locomotion::{self, LocomotionState, SharedLocomotion};

pub const MAX_HUNGER: f32 = 100.0;
/// Reported element when no affinity is set.
pub const NO_ELEMENT: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Power,
    Defence,
    Devouring,
    Speed,
}

/// Snapshot handed to UI / logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub power: f32,
    pub defence: f32,
    pub devouring: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub hunger: f32,
    pub element: String,
    pub action: LocomotionState,
}

#[derive(Debug)]
pub struct PlayerState {
    pub power: f32,
    pub defence: f32,
    pub devouring: f32,
    pub speed: f32,
    pub max_health: f32,
    health: f32,
    hunger: f32,
    element: Option<String>,
    action: SharedLocomotion,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            power: 1.0,
            defence: 1.0,
            devouring: 1.0,
            speed: 5.0,
            max_health: 100.0,
            health: 100.0,
            hunger: MAX_HUNGER, // starts full
            element: None,
            action: locomotion::shared(LocomotionState::Idle),
        }
    }

    /// Applies damage scaled down by defence. Returns `true` once health hits zero.
    pub fn damage(&mut self, amount: f32) -> bool {
        let actual = amount / self.defence;
        self.health = (self.health - actual).max(0.0);
        self.health <= 0.0
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn consume(&mut self, amount: f32) {
        self.hunger = (self.hunger + amount).min(MAX_HUNGER);
    }

    /// Returns `true` once the character is starving.
    pub fn deplete_hunger(&mut self, amount: f32) -> bool {
        self.hunger = (self.hunger - amount).max(0.0);
        self.hunger <= 0.0
    }

    pub fn set_element(&mut self, element: impl Into<String>) {
        self.element = Some(element.into());
    }

    pub fn clear_element(&mut self) {
        self.element = None;
    }

    pub fn set_action(&self, action: LocomotionState) {
        self.action.set(action);
    }

    pub fn action(&self) -> LocomotionState {
        self.action.get()
    }

    /// Read handle for animators.
    pub fn action_handle(&self) -> SharedLocomotion {
        self.action.clone()
    }

    pub fn increase_stat(&mut self, stat: Stat, amount: f32) {
        match stat {
            Stat::Power => self.power += amount,
            Stat::Defence => self.defence += amount,
            Stat::Devouring => self.devouring += amount,
            Stat::Speed => self.speed += amount,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn hunger(&self) -> f32 {
        self.hunger
    }

    pub fn element(&self) -> Option<&str> {
        self.element.as_deref()
    }

    pub fn status(&self) -> Status {
        Status {
            power: self.power,
            defence: self.defence,
            devouring: self.devouring,
            speed: self.speed,
            health: self.health,
            max_health: self.max_health,
            hunger: self.hunger,
            element: self.element.clone().unwrap_or_else(|| NO_ELEMENT.to_string()),
            action: self.action.get(),
        }
    }
}
