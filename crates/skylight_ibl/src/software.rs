use crate::{
    passes_for,
    sampling::{
        hammersley, hemisphere_steps, importance_sample_ggx, integrate_brdf, prefilter_source_lod,
        tangent_frame,
    },
    CubeImage, CubeLevel, IblError, LutImage, PrecomputeSettings, RadianceImage, Result, Stage,
};
use log::{debug, info};
use nalgebra_glm as glm;
use std::{path::Path, sync::Arc};

/// The four lighting maps of one panorama, held in host memory.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedEnvironment {
    pub environment: CubeImage,
    pub irradiance: CubeImage,
    pub prefiltered: CubeImage,
    pub brdf_lut: Arc<LutImage>,
}

/// Runs the precompute pipeline on the CPU with the same numerics as the
/// GPU programs.
pub struct SoftwareBaker {
    settings: PrecomputeSettings,
    brdf_lut: Option<Arc<LutImage>>,
}

impl SoftwareBaker {
    pub fn new(settings: PrecomputeSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            brdf_lut: None,
        })
    }

    pub fn settings(&self) -> &PrecomputeSettings {
        &self.settings
    }

    pub fn bake_file(&mut self, path: impl AsRef<Path>) -> Result<BakedEnvironment> {
        let radiance =
            RadianceImage::load(path).map_err(|error| IblError::aborted(Stage::Decode, error))?;
        self.bake(&radiance)
    }

    pub fn bake(&mut self, radiance: &RadianceImage) -> Result<BakedEnvironment> {
        info!("Creating environment cubemap");
        let environment = project_equirectangular(radiance, &self.settings);

        info!("Creating irradiance cubemap");
        let irradiance = convolve_irradiance(&environment, &self.settings);

        info!("Creating prefilter cubemap");
        let prefiltered = prefilter_environment(&environment, &self.settings);

        let brdf_lut = self.brdf_lut();

        Ok(BakedEnvironment {
            environment,
            irradiance,
            prefiltered,
            brdf_lut,
        })
    }

    /// The lookup table is independent of the panorama, so it is integrated
    /// once and shared by every bake.
    pub fn brdf_lut(&mut self) -> Arc<LutImage> {
        let settings = &self.settings;
        self.brdf_lut
            .get_or_insert_with(|| {
                info!("Creating brdf lookup table");
                Arc::new(integrate_brdf_lut(settings))
            })
            .clone()
    }
}

/// Resamples the panorama onto the six faces and box filters a full mip chain.
pub fn project_equirectangular(
    radiance: &RadianceImage,
    settings: &PrecomputeSettings,
) -> CubeImage {
    let resolution = settings.environment_resolution as usize;
    let mut environment =
        CubeImage::from_fn(resolution, |direction| radiance.sample_direction(direction));
    environment.generate_mipmaps(settings.environment_mip_levels() as usize);
    environment
}

/// Cosine weighted hemisphere average of the environment around `normal`.
pub fn irradiance_at(environment: &CubeImage, normal: &glm::Vec3, sample_delta: f32) -> glm::Vec3 {
    let normal = glm::normalize(normal);
    let (right, up) = tangent_frame(&normal);
    let (azimuth_steps, inclination_steps) = hemisphere_steps(sample_delta);

    let mut irradiance = glm::Vec3::zeros();
    let mut total_weight = 0.0;
    for i in 0..azimuth_steps {
        let phi = i as f32 * sample_delta;
        for j in 0..inclination_steps {
            let theta = j as f32 * sample_delta;
            let sample = right * (theta.sin() * phi.cos())
                + up * (theta.sin() * phi.sin())
                + normal * theta.cos();
            let weight = theta.cos() * theta.sin();
            irradiance += environment.sample(&sample, 0.0) * weight;
            total_weight += weight;
        }
    }
    irradiance / total_weight.max(1e-6)
}

pub fn convolve_irradiance(environment: &CubeImage, settings: &PrecomputeSettings) -> CubeImage {
    let delta = settings.irradiance_sample_delta;
    CubeImage::from_fn(settings.irradiance_resolution as usize, |normal| {
        irradiance_at(environment, normal, delta)
    })
}

/// GGX filtered radiance around `normal`, assuming view along the normal.
pub fn prefiltered_at(
    environment: &CubeImage,
    normal: &glm::Vec3,
    roughness: f32,
    sample_count: u32,
) -> glm::Vec3 {
    let normal = glm::normalize(normal);
    let view = normal;
    let source_resolution = environment.resolution() as u32;

    let mut prefiltered = glm::Vec3::zeros();
    let mut total_weight = 0.0;
    for index in 0..sample_count {
        let xi = hammersley(index, sample_count);
        let half = importance_sample_ggx(&xi, &normal, roughness);
        let light = glm::normalize(&(half * (2.0 * glm::dot(&view, &half)) - view));

        let n_dot_l = glm::dot(&normal, &light).max(0.0);
        if n_dot_l > 0.0 {
            let n_dot_h = glm::dot(&normal, &half).max(0.0);
            let h_dot_v = glm::dot(&half, &view).max(0.0);
            let lod =
                prefilter_source_lod(n_dot_h, h_dot_v, roughness, sample_count, source_resolution);
            prefiltered += environment.sample(&light, lod) * n_dot_l;
            total_weight += n_dot_l;
        }
    }

    if total_weight > 0.0 {
        prefiltered / total_weight
    } else {
        environment.sample(&normal, 0.0)
    }
}

pub fn prefilter_environment(environment: &CubeImage, settings: &PrecomputeSettings) -> CubeImage {
    let levels = passes_for(settings, Stage::Prefilter)
        .into_iter()
        .map(|pass| {
            debug!(
                "Prefiltering mip {} at {}x{} with roughness {}",
                pass.mip_level, pass.resolution, pass.resolution, pass.roughness
            );
            CubeLevel::from_fn(pass.resolution as usize, |normal| {
                prefiltered_at(
                    environment,
                    normal,
                    pass.roughness,
                    settings.prefilter_sample_count,
                )
            })
        })
        .collect();
    CubeImage::new(levels)
}

pub fn integrate_brdf_lut(settings: &PrecomputeSettings) -> LutImage {
    let samples = settings.brdf_sample_count;
    LutImage::from_fn(settings.brdf_lut_resolution as usize, |n_dot_v, roughness| {
        integrate_brdf(n_dot_v, roughness, samples)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_settings() -> PrecomputeSettings {
        PrecomputeSettings {
            environment_resolution: 8,
            irradiance_resolution: 2,
            prefilter_resolution: 4,
            prefilter_mip_levels: 3,
            brdf_lut_resolution: 4,
            irradiance_sample_delta: 0.3,
            prefilter_sample_count: 16,
            brdf_sample_count: 16,
        }
    }

    #[test]
    fn rejects_invalid_settings() {
        let settings = PrecomputeSettings {
            irradiance_resolution: 0,
            ..tiny_settings()
        };
        assert!(matches!(
            SoftwareBaker::new(settings),
            Err(IblError::InvalidSettings(_))
        ));
    }

    #[test]
    fn output_shapes_follow_settings() -> anyhow::Result<()> {
        let mut baker = SoftwareBaker::new(tiny_settings())?;
        let radiance = RadianceImage::uniform(16, 8, glm::vec3(0.5, 0.5, 0.5))?;
        let baked = baker.bake(&radiance)?;

        assert_eq!(baked.environment.resolution(), 8);
        assert_eq!(baked.environment.mip_levels(), 4);
        assert_eq!(baked.irradiance.resolution(), 2);
        assert_eq!(baked.irradiance.mip_levels(), 1);
        assert_eq!(baked.prefiltered.resolution(), 4);
        let sizes = baked
            .prefiltered
            .levels()
            .iter()
            .map(CubeLevel::size)
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![4, 2, 1]);
        assert_eq!(baked.brdf_lut.size(), 4);
        Ok(())
    }

    #[test]
    fn lookup_table_is_memoized() -> anyhow::Result<()> {
        let mut baker = SoftwareBaker::new(tiny_settings())?;
        let first = baker.brdf_lut();
        let second = baker.brdf_lut();
        assert!(Arc::ptr_eq(&first, &second));
        Ok(())
    }

    #[test]
    fn decode_failure_aborts_the_bake() -> anyhow::Result<()> {
        let mut baker = SoftwareBaker::new(tiny_settings())?;
        let error = baker
            .bake_file("missing/panorama.hdr")
            .err()
            .map(|error| error.aborted_stage());
        assert_eq!(error, Some(Some(Stage::Decode)));
        Ok(())
    }
}
