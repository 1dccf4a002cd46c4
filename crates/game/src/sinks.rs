//! Frame consumer for headless runs.
//!
//! The window host draws through `renderer::SmokeRenderer`; without a window
//! the frames are only counted.

use procgen::ChimneyMesh;
use smoke::{FrameUniforms, RenderFeed, RenderSink};

/// Counts frames and bytes for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct StatsSink {
    pub frames: u64,
    pub last_active: usize,
    pub peak_active: usize,
    pub bytes_submitted: usize,
    pub chimney_indices: usize,
}

impl RenderSink for StatsSink {
    fn upload_chimney(&mut self, mesh: &ChimneyMesh) {
        self.chimney_indices = mesh.indices.len();
    }

    fn submit(&mut self, feed: &RenderFeed, _uniforms: &FrameUniforms) {
        self.frames += 1;
        self.last_active = feed.len();
        self.peak_active = self.peak_active.max(feed.len());
        self.bytes_submitted += feed.as_bytes().len();
    }
}
