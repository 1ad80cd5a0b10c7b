//! The fixed set of demo scenes and their tuned starting points.

use std::str::FromStr;
use std::time::Duration;

use optics::OpticalParams;
use renderer::geometry::Shape;
use renderer::MaterialKind;

/// How long resize events coalesce before the bubble scene reallocates its
/// targets. The glass scenes resize synchronously.
const BUBBLE_RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Canonical two-pass glass dispersion over the text backdrop.
    Torus,
    /// Legacy single-pass glass variant.
    Cube,
    /// Noise-displaced translucent bubble over a cubemap.
    Bubble,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [SceneKind::Torus, SceneKind::Cube, SceneKind::Bubble];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Torus => "torus",
            SceneKind::Cube => "cube",
            SceneKind::Bubble => "bubble",
        }
    }

    pub fn material(self) -> MaterialKind {
        match self {
            SceneKind::Torus => MaterialKind::Glass { two_pass: true },
            SceneKind::Cube => MaterialKind::Glass { two_pass: false },
            SceneKind::Bubble => MaterialKind::Bubble,
        }
    }

    /// Dispersion loop iterations; higher counts trade cost for less banding.
    pub fn loop_count(self) -> u32 {
        match self {
            SceneKind::Torus | SceneKind::Cube => 16,
            SceneKind::Bubble => 8,
        }
    }

    pub fn default_shape(self) -> Shape {
        match self {
            SceneKind::Torus => Shape::Torus,
            SceneKind::Cube => Shape::Box,
            SceneKind::Bubble => Shape::Sphere,
        }
    }

    pub fn resize_debounce(self) -> Option<Duration> {
        match self {
            SceneKind::Torus | SceneKind::Cube => None,
            SceneKind::Bubble => Some(BUBBLE_RESIZE_DEBOUNCE),
        }
    }

    /// Whether the scene fetches the equirectangular environment map.
    pub fn uses_environment_map(self) -> bool {
        matches!(self, SceneKind::Torus | SceneKind::Cube)
    }

    pub fn uses_cubemap(self) -> bool {
        matches!(self, SceneKind::Bubble)
    }

    /// Whether `g` may swap the mesh at runtime. The bubble keeps its sphere;
    /// the displacement field is built around it.
    pub fn geometry_swappable(self) -> bool {
        !matches!(self, SceneKind::Bubble)
    }

    /// Tuned starting parameters. The cube scene ships flat indices, matching
    /// the older build it reproduces; the torus gets the graded spectrum.
    pub fn base_params(self) -> OpticalParams {
        let mut params = OpticalParams::default();
        match self {
            SceneKind::Torus => {}
            SceneKind::Cube => {
                params.ior_r = 1.0;
                params.ior_y = 1.0;
                params.ior_g = 1.0;
                params.ior_c = 1.0;
                params.ior_b = 1.0;
                params.ior_p = 1.0;
                params.nacre = 1.0;
            }
            SceneKind::Bubble => {
                params.fresnel_power = 2.0;
                params.nacre = 1.0;
                params.light_strength = 2.0;
            }
        }
        params
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SceneKind::ALL
            .iter()
            .copied()
            .find(|scene| scene.name() == value)
            .ok_or_else(|| format!("unknown scene '{value}' (torus, cube, bubble)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for scene in SceneKind::ALL {
            assert_eq!(scene.name().parse::<SceneKind>().unwrap(), scene);
        }
        assert!("prism".parse::<SceneKind>().is_err());
    }

    #[test]
    fn glass_scenes_loop_sixteen_and_bubble_eight() {
        assert_eq!(SceneKind::Torus.loop_count(), 16);
        assert_eq!(SceneKind::Cube.loop_count(), 16);
        assert_eq!(SceneKind::Bubble.loop_count(), 8);
    }

    #[test]
    fn only_the_bubble_debounces_resizes() {
        assert!(SceneKind::Torus.resize_debounce().is_none());
        assert!(SceneKind::Cube.resize_debounce().is_none());
        assert_eq!(
            SceneKind::Bubble.resize_debounce(),
            Some(Duration::from_millis(200))
        );
    }

    #[test]
    fn materials_match_the_scene_shapes() {
        assert_eq!(
            SceneKind::Torus.material(),
            MaterialKind::Glass { two_pass: true }
        );
        assert_eq!(
            SceneKind::Cube.material(),
            MaterialKind::Glass { two_pass: false }
        );
        assert_eq!(SceneKind::Bubble.material(), MaterialKind::Bubble);
        assert_eq!(SceneKind::Bubble.default_shape(), Shape::Sphere);
        assert!(!SceneKind::Bubble.geometry_swappable());
    }

    #[test]
    fn base_params_stay_within_the_control_ranges() {
        for scene in SceneKind::ALL {
            let params = scene.base_params();
            for desc in optics::DESCRIPTORS {
                let value = params.get(desc.slot);
                assert!(
                    value >= desc.min && value <= desc.max,
                    "{}: {} = {value}",
                    scene.name(),
                    desc.name
                );
            }
        }
    }
}
