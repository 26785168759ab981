// locomotion.rs
use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Current gait of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocomotionState {
    #[default]
    Idle,
    Walking,
    Running,
}

/// Owned by the character, read by its animator once per frame.
pub type SharedLocomotion = Rc<Cell<LocomotionState>>;

pub fn shared(state: LocomotionState) -> SharedLocomotion {
    Rc::new(Cell::new(state))
}
