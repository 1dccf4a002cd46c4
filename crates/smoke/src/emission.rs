//! The emission source: where smoke is born, and whether it is being born at all.

use glam::{Vec2, Vec3};

use crate::config::SourceConfig;

/// Fixed spawn disk plus an on/off switch driven by input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionSource {
    position: Vec3,
    base_radius: f32,
    active: bool,
}

impl EmissionSource {
    /// Source centered at `position` with a spawn disk of `base_radius`.
    pub fn new(position: Vec3, base_radius: f32, active: bool) -> Self {
        Self {
            position,
            base_radius,
            active,
        }
    }

    /// Source as configured, with its starting on/off state.
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.position, config.base_radius, config.start_active)
    }

    /// Center of the spawn disk (the chimney outlet).
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Radius of the spawn disk.
    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    /// Whether the source is emitting.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switch the source on or off. Returns true if the state changed.
    pub fn set_active(&mut self, active: bool) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }

    /// Height of `point` above the outlet, normalized over `falloff` and clamped to `[0, 1]`.
    pub fn height_factor(&self, point: Vec3, falloff: f32) -> f32 {
        ((point.y - self.position.y) / falloff).clamp(0.0, 1.0)
    }

    /// Unit horizontal direction from the source's vertical axis towards `point`.
    ///
    /// `epsilon` is added to both components before normalizing so a point on
    /// the axis still gets a direction.
    pub fn radial_direction(&self, point: Vec3, epsilon: f32) -> Vec2 {
        let offset = Vec2::new(point.x - self.position.x, point.z - self.position.z);
        (offset + Vec2::splat(epsilon)).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_active_reports_edges_only() {
        let mut source = EmissionSource::new(Vec3::ZERO, 0.1, true);
        assert!(!source.set_active(true));
        assert!(source.set_active(false));
        assert!(!source.is_active());
        assert!(!source.set_active(false));
    }

    #[test]
    fn height_factor_clamps() {
        let source = EmissionSource::new(Vec3::new(0.0, 0.5, 0.0), 0.03, true);
        assert_eq!(source.height_factor(Vec3::new(0.0, 0.0, 0.0), 4.0), 0.0);
        assert!((source.height_factor(Vec3::new(0.0, 2.5, 0.0), 4.0) - 0.5).abs() < 1e-6);
        assert_eq!(source.height_factor(Vec3::new(0.0, 50.0, 0.0), 4.0), 1.0);
    }

    #[test]
    fn radial_direction_on_axis_is_finite_unit() {
        let source = EmissionSource::new(Vec3::new(0.0, 0.5, 0.0), 0.03, true);
        let dir = source.radial_direction(Vec3::new(0.0, 3.0, 0.0), 1e-6);
        assert!(dir.is_finite());
        assert!((dir.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn radial_direction_points_away_from_axis() {
        let source = EmissionSource::new(Vec3::new(1.0, 0.0, 1.0), 0.03, true);
        let dir = source.radial_direction(Vec3::new(3.0, 1.0, 1.0), 1e-6);
        assert!(dir.x > 0.999);
        assert!(dir.y.abs() < 1e-3);
    }
}
