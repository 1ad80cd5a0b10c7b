//! Keyboard-driven control surface over the optical parameter set.
//!
//! Enumerates the parameter descriptors into an ordered list of controls;
//! one control has focus, and nudges move its value by the descriptor's step
//! (clamped by [`OpticalParams::set`]). Edits land in the parameter struct
//! directly, so the very next frame renders with them.

use optics::{OpticalParams, ParamDescriptor, DESCRIPTORS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    FocusNext,
    FocusPrev,
    Increase,
    Decrease,
}

#[derive(Debug, Default)]
pub struct ControlPanel {
    focused: usize,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_control(&self) -> &'static ParamDescriptor {
        &DESCRIPTORS[self.focused]
    }

    pub fn apply(&mut self, command: PanelCommand, params: &mut OpticalParams) {
        match command {
            PanelCommand::FocusNext => {
                self.focused = (self.focused + 1) % DESCRIPTORS.len();
            }
            PanelCommand::FocusPrev => {
                self.focused = (self.focused + DESCRIPTORS.len() - 1) % DESCRIPTORS.len();
            }
            PanelCommand::Increase => self.nudge(params, 1.0),
            PanelCommand::Decrease => self.nudge(params, -1.0),
        }
    }

    fn nudge(&self, params: &mut OpticalParams, direction: f32) {
        let desc = self.focused_control();
        params.set(desc.slot, params.get(desc.slot) + desc.step * direction);
    }

    /// The full parameter set, one control per line, focus marked.
    pub fn describe(&self, params: &OpticalParams) -> String {
        let mut out = String::new();
        for (index, desc) in DESCRIPTORS.iter().enumerate() {
            let marker = if index == self.focused { '>' } else { ' ' };
            out.push_str(&format!(
                "{marker} {:<20} {:>8.3}  [{}, {}]\n",
                desc.name,
                params.get(desc.slot),
                desc.min,
                desc.max
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycles_through_every_control_and_wraps() {
        let mut panel = ControlPanel::new();
        let mut params = OpticalParams::default();
        let first = panel.focused_control().name;
        for _ in 0..DESCRIPTORS.len() {
            panel.apply(PanelCommand::FocusNext, &mut params);
        }
        assert_eq!(panel.focused_control().name, first);
        panel.apply(PanelCommand::FocusPrev, &mut params);
        assert_eq!(
            panel.focused_control().name,
            DESCRIPTORS.last().unwrap().name
        );
    }

    #[test]
    fn nudges_move_by_one_step() {
        let mut panel = ControlPanel::new();
        let mut params = OpticalParams::default();
        let desc = panel.focused_control();
        let before = params.get(desc.slot);
        panel.apply(PanelCommand::Increase, &mut params);
        assert!((params.get(desc.slot) - (before + desc.step)).abs() < 1e-6);
        panel.apply(PanelCommand::Decrease, &mut params);
        assert!((params.get(desc.slot) - before).abs() < 1e-6);
    }

    #[test]
    fn nudges_clamp_at_the_range_edges() {
        let mut panel = ControlPanel::new();
        let mut params = OpticalParams::default();
        let desc = panel.focused_control();
        for _ in 0..1000 {
            panel.apply(PanelCommand::Increase, &mut params);
        }
        assert_eq!(params.get(desc.slot), desc.max);
        for _ in 0..1000 {
            panel.apply(PanelCommand::Decrease, &mut params);
        }
        assert_eq!(params.get(desc.slot), desc.min);
    }

    #[test]
    fn describe_lists_every_control_once() {
        let panel = ControlPanel::new();
        let text = panel.describe(&OpticalParams::default());
        assert_eq!(text.lines().count(), DESCRIPTORS.len());
        for desc in DESCRIPTORS {
            assert!(text.contains(desc.name), "missing {}", desc.name);
        }
        assert_eq!(text.lines().filter(|line| line.starts_with('>')).count(), 1);
    }
}
