use glam::Vec3;

/// GLSL-convention reflection: `incident` points toward the surface.
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// GLSL-convention refraction. Returns zero on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Vec3 {
    let n_dot_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - n_dot_i * n_dot_i);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * incident - (eta * n_dot_i + k.sqrt()) * normal
    }
}

/// Grazing-angle reflectance weight: `(1 - |dot(eye, normal)|)^power`.
///
/// Rises toward 1.0 as the view grazes the surface; raising `power` narrows
/// the bright rim to steeper angles.
pub fn fresnel(eye: Vec3, normal: Vec3, power: f32) -> f32 {
    let facing = eye.dot(normal).abs();
    (1.0 - facing).max(0.0).powf(power)
}

/// Blinn-Phong-style highlight plus a lambertian floor.
pub fn specular(normal: Vec3, eye: Vec3, light: Vec3, shininess: f32, diffuseness: f32) -> f32 {
    let light_vector = (-light).normalize_or_zero();
    let half_vector = (eye + light_vector).normalize_or_zero();
    let n_dot_l = normal.dot(light_vector);
    let n_dot_h = normal.dot(half_vector);
    let k_diffuse = n_dot_l.max(0.0);
    let k_specular = (n_dot_h * n_dot_h).powf(shininess);
    k_specular + k_diffuse * diffuseness
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_mirrors_across_the_normal() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let reflected = reflect(incident, Vec3::Y);
        assert!((reflected - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn refract_straight_through_at_eta_one() {
        let incident = Vec3::new(0.3, -0.9, 0.1).normalize();
        let out = refract(incident, Vec3::Y, 1.0);
        assert!((out - incident).length() < 1e-6);
    }

    #[test]
    fn refract_reports_total_internal_reflection_as_zero() {
        // Shallow incidence from the dense side.
        let incident = Vec3::new(0.99, -0.14, 0.0).normalize();
        let out = refract(incident, Vec3::Y, 1.8);
        assert_eq!(out, Vec3::ZERO);
    }

    #[test]
    fn fresnel_rises_toward_grazing_angles() {
        let normal = Vec3::Y;
        let mut last = -1.0;
        // Eye direction tilting from head-on to grazing.
        for step in 0..=10 {
            let t = step as f32 / 10.0;
            let eye = Vec3::new(t, -(1.0 - t * t).max(0.0).sqrt(), 0.0).normalize();
            let f = fresnel(eye, normal, 4.0);
            assert!(f >= last - 1e-6, "fresnel fell from {last} to {f}");
            last = f;
        }
    }

    #[test]
    fn higher_power_sharpens_the_rim() {
        // Away from grazing the base is below one, so raising the exponent
        // can only shrink the term; at exact grazing it stays pinned at one.
        let eye = Vec3::new(0.5, -0.866, 0.0).normalize();
        let normal = Vec3::Y;
        let mut last = f32::INFINITY;
        for power in [0.5, 1.0, 2.0, 4.0, 8.0] {
            let f = fresnel(eye, normal, power);
            assert!(f <= last + 1e-6);
            last = f;
        }
        let grazing = Vec3::X;
        assert!((fresnel(grazing, normal, 1.0) - fresnel(grazing, normal, 8.0)).abs() < 1e-6);
    }

    #[test]
    fn specular_peaks_when_half_vector_aligns() {
        let normal = Vec3::Z;
        let eye = Vec3::Z;
        let aligned = specular(normal, eye, Vec3::NEG_Z, 40.0, 0.0);
        let off = specular(normal, eye, Vec3::new(-1.0, 0.0, -0.2).normalize(), 40.0, 0.0);
        assert!(aligned > off);
        assert!((aligned - 1.0).abs() < 1e-4);
    }
}
