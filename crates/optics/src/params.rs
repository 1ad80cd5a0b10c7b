use glam::Vec3;

/// Live-tunable material parameters for the glass scenes.
///
/// One instance is owned by the frame driver and passed by reference into
/// every render call; control-panel bindings mutate it between frames. The
/// field set matches the shader uniform block one for one.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalParams {
    /// Per-band indices of refraction, red through purple.
    pub ior_r: f32,
    pub ior_y: f32,
    pub ior_g: f32,
    pub ior_c: f32,
    pub ior_b: f32,
    pub ior_p: f32,
    pub saturation: f32,
    pub chromatic_aberration: f32,
    pub refract_power: f32,
    pub reflect_power: f32,
    pub fresnel_power: f32,
    /// Linear ramp applied across the dispersion loop.
    pub dispersion_slide: f32,
    /// Per-pixel hash jitter mixed into the ramp to break banding.
    pub dispersion_salt: f32,
    /// Strength of the fresnel-driven iridescence tint.
    pub nacre: f32,
    pub light: Vec3,
    pub shininess: f32,
    pub diffuseness: f32,
    pub light_strength: f32,
}

impl Default for OpticalParams {
    fn default() -> Self {
        Self {
            ior_r: 1.14,
            ior_y: 1.47,
            ior_g: 1.51,
            ior_c: 1.52,
            ior_b: 1.57,
            ior_p: 1.62,
            saturation: 1.0,
            chromatic_aberration: 0.25,
            refract_power: 1.0,
            reflect_power: 1.0,
            fresnel_power: 4.0,
            dispersion_slide: 0.1,
            dispersion_salt: 0.05,
            nacre: 0.5,
            light: Vec3::new(-1.0, 0.0, 1.0),
            shininess: 40.0,
            diffuseness: 0.2,
            light_strength: 1.0,
        }
    }
}

/// Identifies one scalar entry of [`OpticalParams`] for control bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSlot {
    IorR,
    IorY,
    IorG,
    IorC,
    IorB,
    IorP,
    Saturation,
    ChromaticAberration,
    RefractPower,
    ReflectPower,
    FresnelPower,
    DispersionSlide,
    DispersionSalt,
    Nacre,
    LightX,
    LightY,
    LightZ,
    Shininess,
    Diffuseness,
    LightStrength,
}

/// Range metadata for one control: the panel enumerates these to build its
/// sliders, and [`OpticalParams::set`] clamps against them.
#[derive(Debug, Clone, Copy)]
pub struct ParamDescriptor {
    pub slot: ParamSlot,
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

pub const DESCRIPTORS: &[ParamDescriptor] = &[
    ParamDescriptor { slot: ParamSlot::IorR, name: "ior-red", min: 1.0, max: 2.0, step: 0.01 },
    ParamDescriptor { slot: ParamSlot::IorY, name: "ior-yellow", min: 1.0, max: 2.0, step: 0.01 },
    ParamDescriptor { slot: ParamSlot::IorG, name: "ior-green", min: 1.0, max: 2.0, step: 0.01 },
    ParamDescriptor { slot: ParamSlot::IorC, name: "ior-cyan", min: 1.0, max: 2.0, step: 0.01 },
    ParamDescriptor { slot: ParamSlot::IorB, name: "ior-blue", min: 1.0, max: 2.0, step: 0.01 },
    ParamDescriptor { slot: ParamSlot::IorP, name: "ior-purple", min: 1.0, max: 2.0, step: 0.01 },
    ParamDescriptor { slot: ParamSlot::Saturation, name: "saturation", min: 0.0, max: 2.0, step: 0.1 },
    ParamDescriptor {
        slot: ParamSlot::ChromaticAberration,
        name: "chromatic-aberration",
        min: 0.0,
        max: 1.5,
        step: 0.01,
    },
    ParamDescriptor { slot: ParamSlot::RefractPower, name: "refract-power", min: 0.0, max: 4.0, step: 0.05 },
    ParamDescriptor { slot: ParamSlot::ReflectPower, name: "reflect-power", min: 0.0, max: 4.0, step: 0.05 },
    ParamDescriptor { slot: ParamSlot::FresnelPower, name: "fresnel-power", min: 0.0, max: 10.0, step: 0.1 },
    ParamDescriptor { slot: ParamSlot::DispersionSlide, name: "dispersion-slide", min: 0.0, max: 1.0, step: 0.01 },
    ParamDescriptor { slot: ParamSlot::DispersionSalt, name: "dispersion-salt", min: 0.0, max: 1.0, step: 0.01 },
    ParamDescriptor { slot: ParamSlot::Nacre, name: "nacre", min: 0.0, max: 2.0, step: 0.05 },
    ParamDescriptor { slot: ParamSlot::LightX, name: "light-x", min: -1.0, max: 1.0, step: 0.05 },
    ParamDescriptor { slot: ParamSlot::LightY, name: "light-y", min: -1.0, max: 1.0, step: 0.05 },
    ParamDescriptor { slot: ParamSlot::LightZ, name: "light-z", min: -1.0, max: 1.0, step: 0.05 },
    ParamDescriptor { slot: ParamSlot::Shininess, name: "shininess", min: 1.0, max: 100.0, step: 1.0 },
    ParamDescriptor { slot: ParamSlot::Diffuseness, name: "diffuseness", min: 0.0, max: 1.0, step: 0.05 },
    ParamDescriptor { slot: ParamSlot::LightStrength, name: "light-strength", min: 0.0, max: 4.0, step: 0.05 },
];

/// Looks up the descriptor for a slot. Every slot has exactly one entry.
pub fn descriptor(slot: ParamSlot) -> &'static ParamDescriptor {
    DESCRIPTORS
        .iter()
        .find(|desc| desc.slot == slot)
        .expect("every param slot has a descriptor")
}

impl OpticalParams {
    pub fn get(&self, slot: ParamSlot) -> f32 {
        match slot {
            ParamSlot::IorR => self.ior_r,
            ParamSlot::IorY => self.ior_y,
            ParamSlot::IorG => self.ior_g,
            ParamSlot::IorC => self.ior_c,
            ParamSlot::IorB => self.ior_b,
            ParamSlot::IorP => self.ior_p,
            ParamSlot::Saturation => self.saturation,
            ParamSlot::ChromaticAberration => self.chromatic_aberration,
            ParamSlot::RefractPower => self.refract_power,
            ParamSlot::ReflectPower => self.reflect_power,
            ParamSlot::FresnelPower => self.fresnel_power,
            ParamSlot::DispersionSlide => self.dispersion_slide,
            ParamSlot::DispersionSalt => self.dispersion_salt,
            ParamSlot::Nacre => self.nacre,
            ParamSlot::LightX => self.light.x,
            ParamSlot::LightY => self.light.y,
            ParamSlot::LightZ => self.light.z,
            ParamSlot::Shininess => self.shininess,
            ParamSlot::Diffuseness => self.diffuseness,
            ParamSlot::LightStrength => self.light_strength,
        }
    }

    /// Writes a value into the slot, clamped to its descriptor range.
    pub fn set(&mut self, slot: ParamSlot, value: f32) {
        let desc = descriptor(slot);
        let value = value.clamp(desc.min, desc.max);
        match slot {
            ParamSlot::IorR => self.ior_r = value,
            ParamSlot::IorY => self.ior_y = value,
            ParamSlot::IorG => self.ior_g = value,
            ParamSlot::IorC => self.ior_c = value,
            ParamSlot::IorB => self.ior_b = value,
            ParamSlot::IorP => self.ior_p = value,
            ParamSlot::Saturation => self.saturation = value,
            ParamSlot::ChromaticAberration => self.chromatic_aberration = value,
            ParamSlot::RefractPower => self.refract_power = value,
            ParamSlot::ReflectPower => self.reflect_power = value,
            ParamSlot::FresnelPower => self.fresnel_power = value,
            ParamSlot::DispersionSlide => self.dispersion_slide = value,
            ParamSlot::DispersionSalt => self.dispersion_salt = value,
            ParamSlot::Nacre => self.nacre = value,
            ParamSlot::LightX => self.light.x = value,
            ParamSlot::LightY => self.light.y = value,
            ParamSlot::LightZ => self.light.z = value,
            ParamSlot::Shininess => self.shininess = value,
            ParamSlot::Diffuseness => self.diffuseness = value,
            ParamSlot::LightStrength => self.light_strength = value,
        }
    }

    /// Per-band indices of refraction in band order red through purple.
    pub fn band_iors(&self) -> [f32; 6] {
        [self.ior_r, self.ior_y, self.ior_g, self.ior_c, self.ior_b, self.ior_p]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slot_has_a_descriptor() {
        let mut params = OpticalParams::default();
        for desc in DESCRIPTORS {
            // get/set round-trip through each slot at its midpoint
            let mid = (desc.min + desc.max) * 0.5;
            params.set(desc.slot, mid);
            assert!((params.get(desc.slot) - mid).abs() < 1e-6, "{}", desc.name);
        }
    }

    #[test]
    fn set_clamps_to_descriptor_range() {
        let mut params = OpticalParams::default();
        params.set(ParamSlot::IorR, 5.0);
        assert_eq!(params.get(ParamSlot::IorR), 2.0);
        params.set(ParamSlot::IorR, 0.2);
        assert_eq!(params.get(ParamSlot::IorR), 1.0);
        params.set(ParamSlot::Saturation, -1.0);
        assert_eq!(params.get(ParamSlot::Saturation), 0.0);
    }

    #[test]
    fn descriptor_names_are_unique() {
        for (i, a) in DESCRIPTORS.iter().enumerate() {
            for b in &DESCRIPTORS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn defaults_are_within_range() {
        let params = OpticalParams::default();
        for desc in DESCRIPTORS {
            let value = params.get(desc.slot);
            assert!(
                value >= desc.min && value <= desc.max,
                "{} default {} outside [{}, {}]",
                desc.name,
                value,
                desc.min,
                desc.max
            );
        }
    }
}
