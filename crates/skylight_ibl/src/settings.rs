use crate::{IblError, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecomputeSettings {
    pub environment_resolution: u32,
    pub irradiance_resolution: u32,
    pub prefilter_resolution: u32,
    pub prefilter_mip_levels: u32,
    pub brdf_lut_resolution: u32,

    /// Azimuth and inclination step of the irradiance convolution, in radians.
    pub irradiance_sample_delta: f32,
    pub prefilter_sample_count: u32,
    pub brdf_sample_count: u32,
}

impl Default for PrecomputeSettings {
    fn default() -> Self {
        Self {
            environment_resolution: 512,
            irradiance_resolution: 32,
            prefilter_resolution: 128,
            prefilter_mip_levels: 5,
            brdf_lut_resolution: 512,
            irradiance_sample_delta: 0.025,
            prefilter_sample_count: 1024,
            brdf_sample_count: 1024,
        }
    }
}

impl PrecomputeSettings {
    pub fn validate(&self) -> Result<()> {
        let resolutions = [
            ("environment_resolution", self.environment_resolution),
            ("irradiance_resolution", self.irradiance_resolution),
            ("prefilter_resolution", self.prefilter_resolution),
            ("brdf_lut_resolution", self.brdf_lut_resolution),
        ];
        for (name, value) in resolutions.iter() {
            if *value == 0 {
                return Err(invalid(format!("{} must be greater than zero", name)));
            }
        }

        if self.prefilter_mip_levels == 0 {
            return Err(invalid("prefilter_mip_levels must be at least 1"));
        }
        let max_levels = full_mip_chain_length(self.prefilter_resolution);
        if self.prefilter_mip_levels > max_levels {
            return Err(invalid(format!(
                "a {} texel prefilter map holds at most {} mip levels, {} requested",
                self.prefilter_resolution, max_levels, self.prefilter_mip_levels
            )));
        }

        let delta = self.irradiance_sample_delta;
        if !delta.is_finite() || delta <= 0.0 || delta >= FRAC_PI_2 {
            return Err(invalid(format!(
                "irradiance_sample_delta must lie in (0, pi/2), got {}",
                delta
            )));
        }

        if self.prefilter_sample_count == 0 || self.brdf_sample_count == 0 {
            return Err(invalid("sample counts must be greater than zero"));
        }

        Ok(())
    }

    /// Mip levels of the environment cubemap, down to a single texel.
    pub fn environment_mip_levels(&self) -> u32 {
        full_mip_chain_length(self.environment_resolution)
    }

    pub fn prefilter_mip_resolution(&self, mip_level: u32) -> u32 {
        (self.prefilter_resolution >> mip_level).max(1)
    }

    /// Roughness stored in prefilter mip `mip_level`, `m / (M - 1)`.
    pub fn prefilter_roughness(&self, mip_level: u32) -> f32 {
        if self.prefilter_mip_levels <= 1 {
            0.0
        } else {
            mip_level as f32 / (self.prefilter_mip_levels - 1) as f32
        }
    }
}

pub(crate) fn full_mip_chain_length(resolution: u32) -> u32 {
    32 - resolution.max(1).leading_zeros()
}

fn invalid(message: impl Into<String>) -> IblError {
    IblError::InvalidSettings(message.into())
}
