use glam::{Mat4, Vec3};

const FOV_Y_DEGREES: f32 = 75.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;

/// How much of the remaining distance to the targets is covered per tick.
const DAMPING: f32 = 0.12;

const MIN_RADIUS: f32 = 1.2;
const MAX_RADIUS: f32 = 20.0;
const MAX_ELEVATION: f32 = 1.45;

/// Orbit camera around the origin with damped pointer control.
///
/// Drag deltas and scroll steps move target values; [`OrbitCamera::tick`]
/// eases the live values toward them once per frame, so motion settles
/// smoothly after the pointer stops.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    azimuth: f32,
    elevation: f32,
    radius: f32,
    azimuth_target: f32,
    elevation_target: f32,
    radius_target: f32,
}

impl OrbitCamera {
    pub fn new(radius: f32) -> Self {
        let radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            radius,
            azimuth_target: 0.0,
            elevation_target: 0.0,
            radius_target: radius,
        }
    }

    /// Applies a pointer drag in logical pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.azimuth_target -= dx * 0.005;
        self.elevation_target =
            (self.elevation_target + dy * 0.005).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Applies a scroll step; positive zooms in.
    pub fn zoom(&mut self, steps: f32) {
        self.radius_target = (self.radius_target * (1.0 - steps * 0.1))
            .clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Advances the interpolation one frame.
    pub fn tick(&mut self) {
        self.azimuth += (self.azimuth_target - self.azimuth) * DAMPING;
        self.elevation += (self.elevation_target - self.elevation) * DAMPING;
        self.radius += (self.radius_target - self.radius) * DAMPING;
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.elevation.cos() * self.azimuth.sin(),
            self.radius * self.elevation.sin(),
            self.radius * self.elevation.cos() * self.azimuth.cos(),
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            FOV_Y_DEGREES.to_radians(),
            aspect.max(1e-3),
            NEAR_PLANE,
            FAR_PLANE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damping_converges_on_the_drag_target() {
        let mut camera = OrbitCamera::new(4.0);
        camera.drag(200.0, 0.0);
        for _ in 0..200 {
            camera.tick();
        }
        assert!((camera.azimuth - camera.azimuth_target).abs() < 1e-3);
    }

    #[test]
    fn eye_sits_at_the_orbit_radius() {
        let mut camera = OrbitCamera::new(4.0);
        for _ in 0..10 {
            camera.tick();
        }
        assert!((camera.eye().length() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_clamps_to_the_radius_range() {
        let mut camera = OrbitCamera::new(4.0);
        for _ in 0..100 {
            camera.zoom(1.0);
        }
        assert!(camera.radius_target >= MIN_RADIUS);
        for _ in 0..200 {
            camera.zoom(-1.0);
        }
        assert!(camera.radius_target <= MAX_RADIUS);
    }

    #[test]
    fn elevation_stays_short_of_the_poles() {
        let mut camera = OrbitCamera::new(4.0);
        camera.drag(0.0, 1e6);
        assert!(camera.elevation_target <= MAX_ELEVATION);
    }
}
