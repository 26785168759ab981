//! Body layout of the four-legged character as flat tables: static box parts
//! in body space plus one entry per leg joint.

use glam::{Mat4, Quat, Vec3};

use crate::animation::{Joint, LimbAnimator};

/// A coloured box positioned relative to its parent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPart {
    pub offset: Vec3,
    pub extents: Vec3,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointTransform {
    pub joint: Joint,
    pub offset: Vec3,
    pub rotation_x: f32,
}

impl JointTransform {
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_x(self.rotation_x), self.offset)
    }
}

const BODY_GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const HEAD_GREEN: [f32; 3] = [0.0, 0.667, 0.0];
const DARK_GREEN: [f32; 3] = [0.0, 0.4, 0.0];
const FOOT_GREEN: [f32; 3] = [0.0, 0.533, 0.0];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const BLACK: [f32; 3] = [0.02, 0.02, 0.02];

#[derive(Debug, Clone)]
pub struct Avatar {
    size: f32,
    evolution_level: u32,
    parts: Vec<BoxPart>,
    joints: [JointTransform; 4],
    foot: BoxPart,
}

impl Avatar {
    pub fn new(size: f32) -> Self {
        let part = |offset: [f32; 3], extents: [f32; 3], color| BoxPart {
            offset: Vec3::from(offset) * size,
            extents: Vec3::from(extents) * size,
            color,
        };

        let parts = vec![
            part([0.0, 0.0, 0.0], [1.0, 0.3, 2.0], BODY_GREEN), // body
            part([0.0, 0.1, -1.1], [0.5, 0.3, 0.4], HEAD_GREEN),
            part([0.0, 0.12, -1.35], [0.48, 0.2, 0.2], DARK_GREEN), // eye socket
            part([0.12, 0.12, -1.42], [0.16, 0.16, 0.16], WHITE),
            part([-0.12, 0.12, -1.42], [0.16, 0.16, 0.16], WHITE),
            part([0.12, 0.12, -1.46], [0.08, 0.08, 0.08], BLACK),
            part([-0.12, 0.12, -1.46], [0.08, 0.08, 0.08], BLACK),
            part([0.0, 0.05, -1.35], [0.46, 0.05, 0.5], DARK_GREEN), // upper jaw
            part([0.0, 0.0, -1.35], [0.46, 0.05, 0.5], DARK_GREEN), // lower jaw
        ];

        let joint = |joint, offset: [f32; 3]| JointTransform {
            joint,
            offset: Vec3::from(offset) * size,
            rotation_x: 0.0,
        };
        let joints = [
            joint(Joint::FrontLeft, [0.45, -0.35, 0.8]),
            joint(Joint::FrontRight, [-0.45, -0.35, 0.8]),
            joint(Joint::BackLeft, [0.45, -0.35, -0.8]),
            joint(Joint::BackRight, [-0.45, -0.35, -0.8]),
        ];

        Self {
            size,
            evolution_level: 1,
            parts,
            joints,
            foot: part([0.0, 0.1, 0.0], [0.2, 0.7, 0.3], FOOT_GREEN),
        }
    }

    /// Level 0 counts as the starting level.
    pub fn with_evolution_level(mut self, level: u32) -> Self {
        self.evolution_level = level.max(1);
        self
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn evolution_level(&self) -> u32 {
        self.evolution_level
    }

    pub fn parts(&self) -> &[BoxPart] {
        &self.parts
    }

    pub fn foot(&self) -> BoxPart {
        self.foot
    }

    pub fn joint(&self, joint: Joint) -> &JointTransform {
        &self.joints[joint.index()]
    }

    pub fn joints(&self) -> &[JointTransform; 4] {
        &self.joints
    }

    /// Copies the animator's current rotations into the joint table.
    pub fn pose(&mut self, animator: &LimbAnimator) {
        for entry in &mut self.joints {
            entry.rotation_x = animator.rotation(entry.joint);
        }
    }

    /// World matrix of each foot box, given the body's world transform.
    pub fn foot_matrices(&self, body: Mat4) -> [Mat4; 4] {
        let foot_local = Mat4::from_translation(self.foot.offset);
        self.joints.map(|j| body * j.local_matrix() * foot_local)
    }
}
