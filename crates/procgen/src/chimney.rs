//! Procedural chimney mesh: a hollow square stack, open at the top.
//! The smoke source sits inside the opening.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Vertex with position, normal and UV (shader locations 0, 1, 2).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ChimneyVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl ChimneyVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            uv: uv.into(),
        }
    }
}

/// Chimney dimensions.
#[derive(Debug, Clone, Copy)]
pub struct ChimneyConfig {
    /// Half width of the outer walls.
    pub outer_half_width: f32,
    /// Half width of the inner walls (the flue).
    pub inner_half_width: f32,
    /// Height of the stack.
    pub height: f32,
}

impl Default for ChimneyConfig {
    fn default() -> Self {
        Self {
            outer_half_width: 0.25,
            inner_half_width: 0.15,
            height: 0.6,
        }
    }
}

/// Indexed triangle list ready for upload.
#[derive(Debug, Clone)]
pub struct ChimneyMesh {
    pub vertices: Vec<ChimneyVertex>,
    pub indices: Vec<u32>,
}

impl ChimneyMesh {
    /// Outer walls face out, inner walls face into the flue, plus a bottom cap.
    pub fn generate(config: &ChimneyConfig) -> Self {
        let mut mesh = Self {
            vertices: Vec::with_capacity(36),
            indices: Vec::with_capacity(54),
        };
        let o = config.outer_half_width;
        let i = config.inner_half_width;
        let h = config.height;

        // Corners walk the footprint so each wall runs a -> b.
        let walls = |r: f32| {
            [
                (Vec2::new(-r, -r), Vec2::new(r, -r), Vec3::NEG_Z),
                (Vec2::new(r, -r), Vec2::new(r, r), Vec3::X),
                (Vec2::new(r, r), Vec2::new(-r, r), Vec3::Z),
                (Vec2::new(-r, r), Vec2::new(-r, -r), Vec3::NEG_X),
            ]
        };

        for (a, b, normal) in walls(o) {
            mesh.push_wall(a, b, h, normal);
        }
        for (a, b, normal) in walls(i) {
            mesh.push_wall(a, b, h, -normal);
        }

        mesh.push_quad(
            [
                Vec3::new(-o, 0.0, o),
                Vec3::new(o, 0.0, o),
                Vec3::new(o, 0.0, -o),
                Vec3::new(-o, 0.0, -o),
            ],
            Vec3::NEG_Y,
        );

        mesh
    }

    fn push_wall(&mut self, a: Vec2, b: Vec2, height: f32, normal: Vec3) {
        self.push_quad(
            [
                Vec3::new(a.x, 0.0, a.y),
                Vec3::new(b.x, 0.0, b.y),
                Vec3::new(b.x, height, b.y),
                Vec3::new(a.x, height, a.y),
            ],
            normal,
        );
    }

    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        const UVS: [Vec2; 4] = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(UVS) {
            self.vertices.push(ChimneyVertex::new(corner, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Chimney at the default dimensions.
pub fn chimney_mesh() -> ChimneyMesh {
    ChimneyMesh::generate(&ChimneyConfig::default())
}
