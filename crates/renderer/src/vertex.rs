//! Vertex layouts and the lighting uniform for the two scene passes.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use procgen::ChimneyVertex;
use smoke::GpuParticle;

/// Sky clear color.
pub const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0.55,
    g: 0.75,
    b: 0.95,
    a: 1.0,
};

/// Corners emitted per smoke billboard (two triangles, no index buffer).
pub const BILLBOARD_VERTICES: u32 = 6;

const CHIMNEY_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    // Position
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    // Normal
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
    // UV
    wgpu::VertexAttribute {
        offset: 24,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x2,
    },
];

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    // Center
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    // Size
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32,
    },
    // Age
    wgpu::VertexAttribute {
        offset: 16,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32,
    },
];

/// Per-vertex layout of [`ChimneyVertex`].
pub fn chimney_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ChimneyVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &CHIMNEY_ATTRIBUTES,
    }
}

/// Per-instance layout of [`GpuParticle`]: one billboard per record.
pub fn particle_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GpuParticle>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &PARTICLE_ATTRIBUTES,
    }
}

/// Directional light for the chimney (must match `SceneLighting` in chimney.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SceneLighting {
    /// Direction the light travels, normalized. w unused.
    pub light_dir: [f32; 4],
    pub light_color: [f32; 4],
    pub ambient: [f32; 4],
    /// Brick color; mortar is derived from it in the shader.
    pub base_color: [f32; 4],
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(-0.3, -1.0, -0.25).normalize().extend(0.0).into(),
            light_color: [1.0, 0.95, 0.9, 1.0],
            ambient: [0.35, 0.35, 0.4, 1.0],
            base_color: [0.55, 0.24, 0.18, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chimney_layout_matches_vertex() {
        let layout = chimney_vertex_layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes[2].offset, std::mem::offset_of!(ChimneyVertex, uv) as u64);
    }

    #[test]
    fn particle_layout_is_per_instance() {
        let layout = particle_instance_layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes[1].offset, std::mem::offset_of!(GpuParticle, size) as u64);
        assert_eq!(layout.attributes[2].offset, std::mem::offset_of!(GpuParticle, age) as u64);
    }

    #[test]
    fn lighting_defaults() {
        let lighting = SceneLighting::default();
        let dir = Vec3::new(lighting.light_dir[0], lighting.light_dir[1], lighting.light_dir[2]);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y < 0.0);
        assert_eq!(std::mem::size_of::<SceneLighting>(), 64);
    }
}
