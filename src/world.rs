// world.rs
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use glam::Vec3;

use crate::animation::{AnimatableRegistry, LimbAnimator};
use crate::avatar::Avatar;
use crate::character::CharacterController;
use crate::config::WorldConfig;
use crate::input::InputState;
use crate::locomotion::LocomotionState;
use crate::player_state::PlayerState;
use crate::terrain::{HeightProvider, Terrain, TerrainError};

/// One session: the terrain, the player character and everything animated.
pub struct World {
    terrain: Option<Terrain>,
    registry: AnimatableRegistry,
    player: PlayerState,
    animator: Rc<RefCell<LimbAnimator>>,
    character: CharacterController,
    avatar: Avatar,
}

impl World {
    pub fn new(cfg: &WorldConfig) -> Result<Self, TerrainError> {
        let terrain = Terrain::from_config(&cfg.terrain)?;
        log::info!(
            "Generated {0}x{0} terrain over {1}m (max height {2}, origin y {3})",
            terrain.field.side(),
            terrain.field.size(),
            terrain.field.max_height(),
            terrain.origin_y,
        );
        Ok(Self::assemble(Some(terrain), cfg))
    }

    /// A world with nothing to stand on but the fallback floor.
    pub fn without_terrain(cfg: &WorldConfig) -> Self {
        log::warn!("Building world without terrain, character uses the fallback floor");
        Self::assemble(None, cfg)
    }

    fn assemble(terrain: Option<Terrain>, cfg: &WorldConfig) -> Self {
        let player = PlayerState::new();
        let animator = Rc::new(RefCell::new(LimbAnimator::new(player.action_handle())));
        let mut registry = AnimatableRegistry::new();
        registry.add(&animator);

        Self {
            terrain,
            registry,
            player,
            animator,
            character: CharacterController::from_config(&cfg.character),
            avatar: Avatar::new(cfg.avatar_size).with_evolution_level(cfg.avatar_evolution_level),
        }
    }

    /// Advances one frame: gait selection, then animation, then physics and look.
    pub fn step(&mut self, dt: f32, input: &mut InputState) {
        self.player.set_action(gait_for(input));
        self.registry.update(dt);

        let ground = self.terrain.as_ref().map(|t| t as &dyn HeightProvider);
        self.character.update(input, ground);

        self.avatar.pose(&self.animator.borrow());
    }

    pub fn terrain(&self) -> Option<&Terrain> {
        self.terrain.as_ref()
    }

    pub fn character(&self) -> &CharacterController {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut CharacterController {
        &mut self.character
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn animator(&self) -> Ref<'_, LimbAnimator> {
        self.animator.borrow()
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn registry_mut(&mut self) -> &mut AnimatableRegistry {
        &mut self.registry
    }

    /// Resting height of the character at its current (x, z), if there is terrain.
    pub fn surface_under_character(&self) -> Option<f32> {
        let p: Vec3 = self.character.position();
        let terrain = self.terrain.as_ref()?;
        HeightProvider::height_at(terrain, p.x, p.z)
            .map(|h| h + terrain.origin_y + self.character.half_height())
    }
}

/// Holding a direction walks, holding run on top of it runs.
pub fn gait_for(input: &InputState) -> LocomotionState {
    match (input.any_movement(), input.run) {
        (false, _) => LocomotionState::Idle,
        (true, false) => LocomotionState::Walking,
        (true, true) => LocomotionState::Running,
    }
}
