//! Procedural meadow with a four-legged, first-person explorer.
//!
//! The simulation core (`terrain`, `animation`, `character`, `world`) is pure
//! and deterministic given `dt` and an input snapshot; the renderer and the
//! event loop only read its results.

pub mod animation;
pub mod avatar;
pub mod camera;
pub mod character;
pub mod config;
pub mod input;
pub mod locomotion;
pub mod mesh;
pub mod player_state;
pub mod shader;
pub mod state;
pub mod terrain;
pub mod world;
