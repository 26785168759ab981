// mesh.rs
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::avatar::{Avatar, BoxPart};
use crate::terrain::Terrain;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

pub const TERRAIN_COLOR: [f32; 3] = [0.239, 0.486, 0.278];

#[derive(Debug, Default, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Appends an axis-aligned box of `part.extents` centred on `part.offset`,
    /// then moved by `transform`.
    pub fn push_box(&mut self, transform: Mat4, part: &BoxPart) {
        let h = part.extents * 0.5;
        let local = Mat4::from_translation(part.offset);
        let m = transform * local;

        // (normal, tangent u, tangent v) per face
        let faces = [
            (Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::Z, Vec3::NEG_X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::X, Vec3::Y),
        ];

        for (n, u, v) in faces {
            let base = self.vertices.len() as u32;
            let center = n * h;
            let (du, dv) = (u * h, v * h);
            let world_normal = m.transform_vector3(n).normalize_or_zero().to_array();
            for corner in [center - du - dv, center + du - dv, center + du + dv, center - du + dv] {
                self.vertices.push(Vertex {
                    position: m.transform_point3(corner).to_array(),
                    normal: world_normal,
                    color: part.color,
                });
            }
            self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
}

/// One vertex per height sample, placed at the terrain's world offset.
pub fn build_terrain(terrain: &Terrain) -> MeshData {
    let field = &terrain.field;
    let res = field.resolution();
    let side = field.side() as u32;
    let step = field.size() / res as f32;

    let mut mesh = MeshData {
        vertices: Vec::with_capacity((side * side) as usize),
        indices: Vec::with_capacity((res * res * 6) as usize),
    };

    for iz in 0..side {
        for ix in 0..side {
            let (x, z) = field.vertex_position(ix, iz);
            let left = field.sample(ix.saturating_sub(1), iz);
            let right = field.sample(ix + 1, iz);
            let down = field.sample(ix, iz.saturating_sub(1));
            let up = field.sample(ix, iz + 1);
            let normal = Vec3::new(left - right, 2.0 * step, down - up).normalize();

            mesh.vertices.push(Vertex {
                position: [x, field.sample(ix, iz) + terrain.origin_y, z],
                normal: normal.to_array(),
                color: TERRAIN_COLOR,
            });
        }
    }

    for iz in 0..res {
        for ix in 0..res {
            let i0 = iz * side + ix;
            let i1 = i0 + 1;
            let i2 = i0 + side;
            let i3 = i2 + 1;
            mesh.indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }
    mesh
}

/// Rebuilds the character's boxes for the current pose.
pub fn build_avatar(mesh: &mut MeshData, avatar: &Avatar, body: Mat4) {
    mesh.clear();
    for part in avatar.parts() {
        mesh.push_box(body, part);
    }
    let foot = BoxPart { offset: Vec3::ZERO, ..avatar.foot() };
    for transform in avatar.foot_matrices(body) {
        mesh.push_box(transform, &foot);
    }
}
