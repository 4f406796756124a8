use crate::{CubeFace, PrecomputeSettings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A step of the precompute pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Decode,
    Projection,
    Irradiance,
    Prefilter,
    BrdfIntegration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decode => "decode",
            Stage::Projection => "projection",
            Stage::Irradiance => "irradiance",
            Stage::Prefilter => "prefilter",
            Stage::BrdfIntegration => "brdf integration",
        };
        write!(f, "{}", name)
    }
}

/// One render of all six faces of a cubemap level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CubePass {
    pub stage: Stage,
    pub mip_level: u32,
    pub resolution: u32,
    pub roughness: f32,
}

impl CubePass {
    /// The faces this pass renders, in storage order.
    pub fn faces(&self) -> impl Iterator<Item = CubeFace> {
        CubeFace::ALL.iter().copied()
    }
}

/// The cube passes of a full precompute in submission order.
///
/// Projection runs first, since the other stages sample its result.
/// Prefilter levels are rendered outermost, each at its own resolution.
pub fn cube_passes(settings: &PrecomputeSettings) -> Vec<CubePass> {
    let mut passes = vec![
        CubePass {
            stage: Stage::Projection,
            mip_level: 0,
            resolution: settings.environment_resolution,
            roughness: 0.0,
        },
        CubePass {
            stage: Stage::Irradiance,
            mip_level: 0,
            resolution: settings.irradiance_resolution,
            roughness: 0.0,
        },
    ];
    passes.extend((0..settings.prefilter_mip_levels).map(|mip_level| CubePass {
        stage: Stage::Prefilter,
        mip_level,
        resolution: settings.prefilter_mip_resolution(mip_level),
        roughness: settings.prefilter_roughness(mip_level),
    }));
    passes
}

pub fn passes_for(settings: &PrecomputeSettings, stage: Stage) -> Vec<CubePass> {
    cube_passes(settings)
        .into_iter()
        .filter(|pass| pass.stage == stage)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_precedes_consumers() {
        let passes = cube_passes(&PrecomputeSettings::default());
        assert_eq!(passes[0].stage, Stage::Projection);
        assert_eq!(passes[0].resolution, 512);
        assert!(passes[1..]
            .iter()
            .all(|pass| pass.stage != Stage::Projection));
    }

    #[test]
    fn prefilter_mips_are_outermost() {
        let settings = PrecomputeSettings::default();
        let captures = passes_for(&settings, Stage::Prefilter)
            .iter()
            .flat_map(|pass| pass.faces().map(move |face| (pass.mip_level, face)))
            .collect::<Vec<_>>();

        assert_eq!(captures.len(), 30);
        for (index, (mip_level, face)) in captures.iter().enumerate() {
            assert_eq!(*mip_level as usize, index / 6);
            assert_eq!(face.index(), index % 6);
        }
    }

    #[test]
    fn prefilter_passes_halve_resolution() {
        let passes = passes_for(&PrecomputeSettings::default(), Stage::Prefilter);
        let shape = passes
            .iter()
            .map(|pass| (pass.resolution, pass.roughness))
            .collect::<Vec<_>>();
        assert_eq!(
            shape,
            vec![(128, 0.0), (64, 0.25), (32, 0.5), (16, 0.75), (8, 1.0)]
        );
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::BrdfIntegration.to_string(), "brdf integration");
        assert_eq!(Stage::Decode.to_string(), "decode");
    }
}
