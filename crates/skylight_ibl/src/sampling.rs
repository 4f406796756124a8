//! Shared numerics of the precompute shaders.
//!
//! Every function here has a GLSL twin in `shaders/`; the software baker
//! calls these directly so both backends produce the same maps.

use nalgebra_glm as glm;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Equirectangular texture coordinate of a unit direction.
///
/// `u` follows the azimuth `atan2(z, x)`, `v` the elevation, with `v = 0`
/// at the nadir.
pub fn direction_to_equirectangular(direction: &glm::Vec3) -> glm::Vec2 {
    let u = direction.z.atan2(direction.x) / TAU + 0.5;
    let v = direction.y.max(-1.0).min(1.0).asin() / PI + 0.5;
    glm::vec2(u, v)
}

pub fn equirectangular_to_direction(uv: &glm::Vec2) -> glm::Vec3 {
    let phi = (uv.x - 0.5) * TAU;
    let theta = (uv.y - 0.5) * PI;
    glm::vec3(theta.cos() * phi.cos(), theta.sin(), theta.cos() * phi.sin())
}

/// Tangent and bitangent completing an orthonormal frame around `normal`.
pub fn tangent_frame(normal: &glm::Vec3) -> (glm::Vec3, glm::Vec3) {
    let up = if normal.z.abs() < 0.999 {
        glm::vec3(0.0, 0.0, 1.0)
    } else {
        glm::vec3(1.0, 0.0, 0.0)
    };
    let tangent = glm::normalize(&glm::cross(&up, normal));
    let bitangent = glm::cross(normal, &tangent);
    (tangent, bitangent)
}

pub fn reflect(incident: &glm::Vec3, normal: &glm::Vec3) -> glm::Vec3 {
    incident - normal * (2.0 * glm::dot(normal, incident))
}

/// Azimuth and inclination step counts of the irradiance hemisphere walk.
pub fn hemisphere_steps(sample_delta: f32) -> (u32, u32) {
    let azimuth = (TAU / sample_delta).ceil() as u32;
    let inclination = (FRAC_PI_2 / sample_delta).ceil() as u32;
    (azimuth, inclination)
}

pub fn radical_inverse_vdc(bits: u32) -> f32 {
    bits.reverse_bits() as f32 * 2.328_306_4e-10
}

pub fn hammersley(index: u32, count: u32) -> glm::Vec2 {
    glm::vec2(index as f32 / count as f32, radical_inverse_vdc(index))
}

/// Half vector for a low discrepancy sample, distributed by GGX around `normal`.
pub fn importance_sample_ggx(xi: &glm::Vec2, normal: &glm::Vec3, roughness: f32) -> glm::Vec3 {
    let a = roughness * roughness;

    let phi = TAU * xi.x;
    let cos_theta = ((1.0 - xi.y) / (1.0 + (a * a - 1.0) * xi.y)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let half = glm::vec3(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta);
    let (tangent, bitangent) = tangent_frame(normal);
    glm::normalize(&(tangent * half.x + bitangent * half.y + normal * half.z))
}

pub fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let denominator = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (PI * denominator * denominator)
}

/// Schlick-GGX with the image based lighting remapping `k = r^2 / 2`.
pub fn geometry_schlick_ggx(n_dot_v: f32, roughness: f32) -> f32 {
    let k = roughness * roughness / 2.0;
    n_dot_v / (n_dot_v * (1.0 - k) + k)
}

pub fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness)
}

pub fn fresnel_schlick_roughness(cos_theta: f32, f0: &glm::Vec3, roughness: f32) -> glm::Vec3 {
    let grazing = glm::vec3(1.0 - roughness, 1.0 - roughness, 1.0 - roughness);
    let factor = (1.0 - cos_theta).max(0.0).min(1.0).powi(5);
    f0 + (glm::max2(&grazing, f0) - f0) * factor
}

/// Environment mip level to read a prefilter sample from.
///
/// Matches the solid angle of the sample's lobe to the solid angle of
/// an environment texel so wide lobes read pre-averaged texels.
pub fn prefilter_source_lod(
    n_dot_h: f32,
    h_dot_v: f32,
    roughness: f32,
    sample_count: u32,
    source_resolution: u32,
) -> f32 {
    if roughness == 0.0 {
        return 0.0;
    }
    let distribution = distribution_ggx(n_dot_h, roughness);
    let pdf = distribution * n_dot_h / (4.0 * h_dot_v) + 0.0001;
    let resolution = source_resolution as f32;
    let texel_solid_angle = 4.0 * PI / (6.0 * resolution * resolution);
    let sample_solid_angle = 1.0 / (sample_count as f32 * pdf + 0.0001);
    (0.5 * (sample_solid_angle / texel_solid_angle).log2()).max(0.0)
}

/// Split-sum scale and bias for `(n_dot_v, roughness)`.
pub fn integrate_brdf(n_dot_v: f32, roughness: f32, sample_count: u32) -> glm::Vec2 {
    // Grazing views divide by n_dot_v below.
    let n_dot_v = n_dot_v.max(1e-4);
    let view = glm::vec3((1.0 - n_dot_v * n_dot_v).max(0.0).sqrt(), 0.0, n_dot_v);
    let normal = glm::vec3(0.0, 0.0, 1.0);

    let mut scale = 0.0;
    let mut bias = 0.0;
    for index in 0..sample_count {
        let xi = hammersley(index, sample_count);
        let half = importance_sample_ggx(&xi, &normal, roughness);
        let light = glm::normalize(&(half * (2.0 * glm::dot(&view, &half)) - view));

        let n_dot_l = light.z.max(0.0);
        let n_dot_h = half.z.max(0.0);
        let v_dot_h = glm::dot(&view, &half).max(0.0);

        if n_dot_l > 0.0 && n_dot_h > 0.0 {
            let geometry = geometry_smith(n_dot_v, n_dot_l, roughness);
            let visibility = geometry * v_dot_h / (n_dot_h * n_dot_v);
            let fresnel = (1.0 - v_dot_h).powi(5);
            scale += (1.0 - fresnel) * visibility;
            bias += fresnel * visibility;
        }
    }
    glm::vec2(scale, bias) / sample_count as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equirectangular_round_trip() {
        for u in [0.1_f32, 0.25, 0.5, 0.8, 0.97].iter() {
            for v in [0.05_f32, 0.3, 0.5, 0.75, 0.95].iter() {
                let uv = glm::vec2(*u, *v);
                let direction = equirectangular_to_direction(&uv);
                assert!((glm::length(&direction) - 1.0).abs() < 1e-5);
                let back = direction_to_equirectangular(&direction);
                assert!(glm::distance(&uv, &back) < 1e-5, "{:?} -> {:?}", uv, back);
            }
        }
    }

    #[test]
    fn equirectangular_poles() {
        let up = direction_to_equirectangular(&glm::vec3(0.0, 1.0, 0.0));
        let down = direction_to_equirectangular(&glm::vec3(0.0, -1.0, 0.0));
        assert!((up.y - 1.0).abs() < 1e-6);
        assert!(down.y.abs() < 1e-6);
    }

    #[test]
    fn van_der_corput() {
        assert_eq!(radical_inverse_vdc(0), 0.0);
        assert_eq!(radical_inverse_vdc(1), 0.5);
        assert_eq!(radical_inverse_vdc(2), 0.25);
        assert_eq!(radical_inverse_vdc(3), 0.75);
    }

    #[test]
    fn tangent_frame_is_orthonormal() {
        let normals = [
            glm::vec3(0.0, 0.0, 1.0),
            glm::vec3(0.0, 0.0, -1.0),
            glm::normalize(&glm::vec3(1.0, 2.0, 3.0)),
            glm::vec3(0.0, -1.0, 0.0),
        ];
        for normal in normals.iter() {
            let (tangent, bitangent) = tangent_frame(normal);
            assert!(glm::dot(&tangent, normal).abs() < 1e-5);
            assert!(glm::dot(&bitangent, normal).abs() < 1e-5);
            assert!(glm::dot(&tangent, &bitangent).abs() < 1e-5);
            assert!((glm::length(&bitangent) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_roughness_samples_the_normal() {
        let normal = glm::normalize(&glm::vec3(0.3, -0.5, 0.8));
        for index in 0..16 {
            let half = importance_sample_ggx(&hammersley(index, 16), &normal, 0.0);
            assert!(glm::distance(&half, &normal) < 1e-5);
        }
    }

    #[test]
    fn mirror_source_lod_is_zero() {
        assert_eq!(prefilter_source_lod(1.0, 1.0, 0.0, 1024, 512), 0.0);
    }

    #[test]
    fn source_lod_grows_with_roughness() {
        let low = prefilter_source_lod(1.0, 1.0, 0.25, 1024, 512);
        let high = prefilter_source_lod(1.0, 1.0, 1.0, 1024, 512);
        assert!(high > low, "{} <= {}", high, low);
    }

    #[test]
    fn fresnel_at_normal_incidence_is_f0() {
        let f0 = glm::vec3(0.04, 0.04, 0.04);
        let fresnel = fresnel_schlick_roughness(1.0, &f0, 0.5);
        assert!(glm::distance(&fresnel, &f0) < 1e-6);
    }

    #[test]
    fn smooth_brdf_conserves_energy_head_on() {
        let coefficients = integrate_brdf(0.999, 0.01, 256);
        assert!((coefficients.x + coefficients.y - 1.0).abs() < 0.02, "{:?}", coefficients);
    }

    #[test]
    fn grazing_view_stays_finite() {
        for roughness in [0.0_f32, 0.5, 1.0].iter() {
            let coefficients = integrate_brdf(0.0, *roughness, 64);
            assert!(coefficients.x.is_finite() && coefficients.y.is_finite());
            assert!(coefficients.x >= 0.0 && coefficients.y >= 0.0, "{:?}", coefficients);
        }
    }

    #[test]
    fn rough_brdf_loses_energy() {
        let smooth = integrate_brdf(0.5, 0.1, 512);
        let rough = integrate_brdf(0.5, 1.0, 512);
        assert!(rough.x + rough.y < smooth.x + smooth.y);
        assert!(rough.x >= 0.0 && rough.y >= 0.0);
    }
}
