//! Render feed: a flat snapshot of the pool for upload to a vertex buffer.
//!
//! Each live particle becomes one point record; the renderer is expected to
//! expand it into a camera-facing billboard using the basis in
//! [`FrameUniforms`].

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use procgen::ChimneyMesh;

use crate::lifecycle::ParticlePool;
use crate::particle::Particle;

/// Default smoke tint (slightly blue-white).
pub const SMOKE_TINT: Vec3 = Vec3::new(0.95, 0.95, 1.0);

/// One particle as the GPU sees it (shader locations 0, 1, 2).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuParticle {
    pub position: [f32; 3],
    pub size: f32,
    pub age: f32,
}

impl From<&Particle> for GpuParticle {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.into(),
            size: p.size,
            age: p.age,
        }
    }
}

/// Reusable buffer of [`GpuParticle`] records, sized once to the pool capacity.
#[derive(Debug, Clone)]
pub struct RenderFeed {
    records: Vec<GpuParticle>,
}

impl RenderFeed {
    /// Empty feed with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Rebuild the snapshot from the pool. Does not reallocate as long as the
    /// pool is no larger than the capacity given at construction.
    pub fn refresh(&mut self, pool: &ParticlePool) {
        self.records.clear();
        self.records.extend(pool.iter().map(GpuParticle::from));
    }

    /// Records from the last refresh.
    pub fn records(&self) -> &[GpuParticle] {
        &self.records
    }

    /// Number of records (live particles at the last refresh).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bytes ready for a buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }
}

/// Consumer of each frame's snapshot: the GPU renderer, or a stats counter
/// for headless runs.
pub trait RenderSink {
    /// Static scene geometry, handed over once before the first frame.
    fn upload_chimney(&mut self, _mesh: &ChimneyMesh) {}

    /// Consume one frame. Called once per tick, after the feed was refreshed.
    fn submit(&mut self, feed: &RenderFeed, uniforms: &FrameUniforms);
}

/// Fixed look-at camera for the scene.
#[derive(Debug, Clone, Copy)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
    pub world_up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 6.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            world_up: Vec3::Y,
            fov_degrees: 45.0,
            aspect: 1280.0 / 720.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraRig {
    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// World-to-view matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.world_up)
    }

    /// Right-handed perspective projection.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Camera right and up vectors used to expand billboards.
    pub fn billboard_basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.world_up).normalize();
        let up = right.cross(forward);
        (right, up)
    }
}

/// Per-frame uniform block for the smoke pass. Vectors are padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub cam_right: [f32; 4],
    pub cam_up: [f32; 4],
    pub tint: [f32; 4],
}

impl FrameUniforms {
    /// Uniforms for `camera` with the given smoke tint.
    pub fn new(camera: &CameraRig, tint: Vec3) -> Self {
        let (right, up) = camera.billboard_basis();
        Self {
            view: camera.view().to_cols_array_2d(),
            proj: camera.projection().to_cols_array_2d(),
            cam_right: right.extend(0.0).into(),
            cam_up: up.extend(0.0).into(),
            tint: tint.extend(1.0).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<usize>,
    }

    impl RenderSink for Recorder {
        fn submit(&mut self, feed: &RenderFeed, _uniforms: &FrameUniforms) {
            self.frames.push(feed.len());
        }
    }

    #[test]
    fn gpu_particle_is_twenty_bytes() {
        assert_eq!(std::mem::size_of::<GpuParticle>(), 20);
    }

    #[test]
    fn refresh_mirrors_live_particles() {
        let mut pool = ParticlePool::with_capacity(8);
        for i in 0..5 {
            pool.push(Particle {
                position: Vec3::new(i as f32, 1.0, 0.0),
                velocity: Vec3::ZERO,
                age: 0.1 * i as f32,
                size: 0.2,
            });
        }
        let mut feed = RenderFeed::with_capacity(pool.capacity());
        feed.refresh(&pool);
        assert_eq!(feed.len(), 5);
        assert_eq!(feed.as_bytes().len(), 5 * 20);
        assert_eq!(feed.records()[3].position, [3.0, 1.0, 0.0]);

        pool.retire(0);
        feed.refresh(&pool);
        assert_eq!(feed.len(), 4);
    }

    #[test]
    fn sink_sees_each_submitted_frame() {
        let mut pool = ParticlePool::with_capacity(4);
        let mut feed = RenderFeed::with_capacity(4);
        let uniforms = FrameUniforms::new(&CameraRig::default(), SMOKE_TINT);
        let mut recorder = Recorder::default();
        for _ in 0..3 {
            pool.push(Particle::default());
            feed.refresh(&pool);
            recorder.submit(&feed, &uniforms);
        }
        assert_eq!(recorder.frames, vec![1, 2, 3]);
    }

    #[test]
    fn refresh_does_not_grow_the_buffer() {
        let mut pool = ParticlePool::with_capacity(16);
        let mut feed = RenderFeed::with_capacity(16);
        let before = feed.records.capacity();
        while pool.push(Particle::default()) {}
        feed.refresh(&pool);
        assert_eq!(feed.len(), 16);
        assert_eq!(feed.records.capacity(), before);
    }

    #[test]
    fn billboard_basis_is_orthonormal() {
        let (right, up) = CameraRig::default().billboard_basis();
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(up).abs() < 1e-5);
        assert!(right.y.abs() < 1e-6);
    }

    #[test]
    fn uniforms_carry_tint_and_basis() {
        let camera = CameraRig::default();
        let uniforms = FrameUniforms::new(&camera, SMOKE_TINT);
        assert_eq!(uniforms.tint, [0.95, 0.95, 1.0, 1.0]);
        assert_eq!(uniforms.cam_right[3], 0.0);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 176);
    }
}
