// camera.rs
use glam::{Mat4, Vec3};

use crate::character::CharacterController;
use crate::config;

/// Render-side view of the character's attached camera.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub aspect: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self { eye: Vec3::new(0.0, 1.0, 4.0), forward: Vec3::NEG_Z, up: Vec3::Y, aspect }
    }

    pub fn follow(&mut self, character: &CharacterController) {
        self.eye = character.camera_eye();
        self.forward = character.camera_forward();
        self.up = character.camera_up();
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_to_rh(self.eye, self.forward, self.up);
        let proj = Mat4::perspective_rh(
            config::FOV_Y.to_radians(),
            self.aspect,
            config::Z_NEAR,
            config::Z_FAR,
        );
        proj * view
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub fog_dist: [f32; 2],
    pub _pad: [f32; 2],
    pub camera_pos: [f32; 4],
}

impl CameraUniform {
    pub fn new(camera: &Camera) -> Self {
        let mut uniform = Self {
            view_proj: [[0.0; 4]; 4],
            fog_dist: [config::FOG_START, config::FOG_END],
            _pad: [0.0; 2],
            camera_pos: [0.0; 4],
        };
        uniform.update(camera);
        uniform
    }

    pub fn update(&mut self, camera: &Camera) {
        self.view_proj = camera.build_view_projection_matrix().to_cols_array_2d();
        self.camera_pos = camera.eye.extend(1.0).to_array();
    }
}
