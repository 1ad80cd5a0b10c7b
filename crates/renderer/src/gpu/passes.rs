//! Per-frame pass planning.
//!
//! The render sequence is described as plain data before anything touches
//! the GPU: which target each pass writes, which texture feeds it, the cull
//! mode, and the uniform state it must see. Encoding walks the plan in
//! order. Keeping the plan pure lets the ordering contract be asserted
//! directly in tests.

/// Where a pass samples its input texture from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputBinding {
    /// The synthesized backdrop raster.
    Backdrop,
    /// The back target's color buffer, produced earlier in the same frame.
    BackTarget,
    /// The cubemap environment (bubble material).
    Cubemap,
    /// Both offscreen targets (composite pass).
    TargetPair,
}

/// Which attachment a pass renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSlot {
    Back,
    Front,
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    FrontFaces,
    BackFaces,
    None,
}

impl CullMode {
    pub(crate) fn to_wgpu(self) -> Option<wgpu::Face> {
        match self {
            CullMode::FrontFaces => Some(wgpu::Face::Front),
            CullMode::BackFaces => Some(wgpu::Face::Back),
            CullMode::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStage {
    Mesh,
    Composite,
}

/// One pass of the frame, fully described.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassDesc {
    pub stage: PassStage,
    pub input: InputBinding,
    pub target: TargetSlot,
    pub cull: CullMode,
    /// `uFlipNormal` state the uniform block must carry for this pass.
    pub flip_normal: bool,
    /// Weight on the internal dispersion term.
    pub dispersion_weight: f32,
    /// Whether the backdrop raster is blitted behind the mesh first.
    pub draw_backdrop: bool,
}

/// The canonical two-pass sequence: back faces into the back target, front
/// faces (fed by the back target) into the front target, then the screen
/// blend of both onto the surface.
pub fn two_pass_plan() -> [PassDesc; 3] {
    [
        PassDesc {
            stage: PassStage::Mesh,
            input: InputBinding::Backdrop,
            target: TargetSlot::Back,
            cull: CullMode::FrontFaces,
            flip_normal: true,
            dispersion_weight: 0.25,
            draw_backdrop: true,
        },
        PassDesc {
            stage: PassStage::Mesh,
            input: InputBinding::BackTarget,
            target: TargetSlot::Front,
            cull: CullMode::BackFaces,
            flip_normal: false,
            dispersion_weight: 1.0,
            draw_backdrop: true,
        },
        PassDesc {
            stage: PassStage::Composite,
            input: InputBinding::TargetPair,
            target: TargetSlot::Surface,
            cull: CullMode::None,
            flip_normal: false,
            dispersion_weight: 1.0,
            draw_backdrop: false,
        },
    ]
}

/// Degenerate sequence for the legacy single-pass glass material: one mesh
/// pass into the front target, then a composite that passes it through.
pub fn single_pass_plan() -> [PassDesc; 2] {
    [
        PassDesc {
            stage: PassStage::Mesh,
            input: InputBinding::Backdrop,
            target: TargetSlot::Front,
            cull: CullMode::None,
            flip_normal: false,
            dispersion_weight: 1.0,
            draw_backdrop: true,
        },
        PassDesc {
            stage: PassStage::Composite,
            input: InputBinding::TargetPair,
            target: TargetSlot::Surface,
            cull: CullMode::None,
            flip_normal: false,
            dispersion_weight: 1.0,
            draw_backdrop: false,
        },
    ]
}

/// Bubble sequence: cubemap-lit mesh without a backdrop, passed through the
/// same composite.
pub fn bubble_plan() -> [PassDesc; 2] {
    [
        PassDesc {
            stage: PassStage::Mesh,
            input: InputBinding::Cubemap,
            target: TargetSlot::Front,
            cull: CullMode::None,
            flip_normal: false,
            dispersion_weight: 1.0,
            draw_backdrop: false,
        },
        PassDesc {
            stage: PassStage::Composite,
            input: InputBinding::TargetPair,
            target: TargetSlot::Surface,
            cull: CullMode::None,
            flip_normal: false,
            dispersion_weight: 1.0,
            draw_backdrop: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_pass_state_precedes_front_pass_state() {
        let plan = two_pass_plan();
        let back_index = plan
            .iter()
            .position(|pass| pass.target == TargetSlot::Back)
            .expect("back pass present");
        let front_index = plan
            .iter()
            .position(|pass| pass.target == TargetSlot::Front)
            .expect("front pass present");
        assert!(back_index < front_index);

        let back = &plan[back_index];
        assert!(back.flip_normal);
        assert_eq!(back.input, InputBinding::Backdrop);
        assert_eq!(back.cull, CullMode::FrontFaces);

        let front = &plan[front_index];
        assert!(!front.flip_normal);
        assert_eq!(front.input, InputBinding::BackTarget);
        assert_eq!(front.cull, CullMode::BackFaces);
    }

    #[test]
    fn composite_runs_last_and_reads_both_targets() {
        for plan in [two_pass_plan().to_vec(), single_pass_plan().to_vec(), bubble_plan().to_vec()]
        {
            let last = plan.last().unwrap();
            assert_eq!(last.stage, PassStage::Composite);
            assert_eq!(last.target, TargetSlot::Surface);
            assert_eq!(last.input, InputBinding::TargetPair);
            // No other pass writes to the surface.
            for pass in &plan[..plan.len() - 1] {
                assert_ne!(pass.target, TargetSlot::Surface);
            }
        }
    }

    #[test]
    fn back_pass_quarters_the_dispersion() {
        let plan = two_pass_plan();
        assert_eq!(plan[0].dispersion_weight, 0.25);
        assert_eq!(plan[1].dispersion_weight, 1.0);
    }

    #[test]
    fn single_pass_plans_never_flip_normals() {
        for pass in single_pass_plan().iter().chain(bubble_plan().iter()) {
            assert!(!pass.flip_normal);
        }
    }

    #[test]
    fn bubble_skips_the_backdrop() {
        assert!(bubble_plan().iter().all(|pass| !pass.draw_backdrop));
    }
}
