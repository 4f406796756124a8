use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The seven programs of the pipeline and the viewer passes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramKind {
    Projection,
    Irradiance,
    Prefilter,
    BrdfIntegration,
    Reflection,
    Pbr,
    Sky,
}

impl ProgramKind {
    pub const ALL: [ProgramKind; 7] = [
        ProgramKind::Projection,
        ProgramKind::Irradiance,
        ProgramKind::Prefilter,
        ProgramKind::BrdfIntegration,
        ProgramKind::Reflection,
        ProgramKind::Pbr,
        ProgramKind::Sky,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProgramKind::Projection => "equirectangular_to_cubemap",
            ProgramKind::Irradiance => "irradiance",
            ProgramKind::Prefilter => "prefilter",
            ProgramKind::BrdfIntegration => "brdf",
            ProgramKind::Reflection => "reflection",
            ProgramKind::Pbr => "pbr",
            ProgramKind::Sky => "sky",
        }
    }

    /// Vertex and fragment stage file names.
    pub fn stage_files(self) -> (&'static str, &'static str) {
        match self {
            ProgramKind::Projection => ("cubemap.vert", "equirectangular_to_cubemap.frag"),
            ProgramKind::Irradiance => ("cubemap.vert", "irradiance.frag"),
            ProgramKind::Prefilter => ("cubemap.vert", "prefilter.frag"),
            ProgramKind::BrdfIntegration => ("brdf.vert", "brdf.frag"),
            ProgramKind::Reflection => ("mesh.vert", "reflection.frag"),
            ProgramKind::Pbr => ("mesh.vert", "pbr.frag"),
            ProgramKind::Sky => ("sky.vert", "sky.frag"),
        }
    }
}

const EMBEDDED_SHADERS: &[(&str, &str)] = &[
    ("cubemap.vert", include_str!("../shaders/cubemap.vert")),
    (
        "equirectangular_to_cubemap.frag",
        include_str!("../shaders/equirectangular_to_cubemap.frag"),
    ),
    ("irradiance.frag", include_str!("../shaders/irradiance.frag")),
    ("prefilter.frag", include_str!("../shaders/prefilter.frag")),
    ("brdf.vert", include_str!("../shaders/brdf.vert")),
    ("brdf.frag", include_str!("../shaders/brdf.frag")),
    ("mesh.vert", include_str!("../shaders/mesh.vert")),
    ("reflection.frag", include_str!("../shaders/reflection.frag")),
    ("pbr.frag", include_str!("../shaders/pbr.frag")),
    ("sky.vert", include_str!("../shaders/sky.vert")),
    ("sky.frag", include_str!("../shaders/sky.frag")),
];

/// Where program sources come from.
///
/// `Directory` sources are read on every load, which is what makes
/// shader reloading pick up edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShaderLibrary {
    Embedded,
    Directory(PathBuf),
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        ShaderLibrary::Embedded
    }
}

impl ShaderLibrary {
    pub fn embedded_source(file: &str) -> Option<&'static str> {
        EMBEDDED_SHADERS
            .iter()
            .find(|(name, _)| *name == file)
            .map(|(_, source)| *source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declares_uniform(source: &str, name: &str) -> bool {
        source.lines().any(|line| {
            let line = line.trim();
            line.starts_with("uniform ") && line.trim_end_matches(';').ends_with(name)
        })
    }

    fn program_sources(kind: ProgramKind) -> String {
        let (vertex, fragment) = kind.stage_files();
        let vertex = ShaderLibrary::embedded_source(vertex).unwrap_or_default();
        let fragment = ShaderLibrary::embedded_source(fragment).unwrap_or_default();
        format!("{}\n{}", vertex, fragment)
    }

    #[test]
    fn every_stage_file_is_embedded() {
        for kind in ProgramKind::ALL.iter() {
            let (vertex, fragment) = kind.stage_files();
            assert!(ShaderLibrary::embedded_source(vertex).is_some(), "{}", vertex);
            assert!(ShaderLibrary::embedded_source(fragment).is_some(), "{}", fragment);
        }
    }

    #[test]
    fn programs_declare_their_parameters() {
        let expected: &[(ProgramKind, &[&str])] = &[
            (
                ProgramKind::Projection,
                &["projection", "view", "equirectangular_map"],
            ),
            (
                ProgramKind::Irradiance,
                &["projection", "view", "environment_map", "sample_delta"],
            ),
            (
                ProgramKind::Prefilter,
                &[
                    "projection",
                    "view",
                    "environment_map",
                    "roughness",
                    "source_resolution",
                    "sample_count",
                ],
            ),
            (ProgramKind::BrdfIntegration, &["sample_count"]),
            (
                ProgramKind::Reflection,
                &[
                    "projection",
                    "view",
                    "model",
                    "normal_matrix",
                    "camera_pos",
                    "environment_map",
                ],
            ),
            (
                ProgramKind::Pbr,
                &[
                    "projection",
                    "view",
                    "model",
                    "normal_matrix",
                    "camera_pos",
                    "irradiance_map",
                    "prefilter_map",
                    "brdf_lut",
                    "albedo",
                    "roughness",
                    "metalness",
                    "fresnel",
                    "prefilter_max_lod",
                ],
            ),
            (ProgramKind::Sky, &["projection", "view", "environment_map"]),
        ];

        for (kind, uniforms) in expected.iter() {
            let source = program_sources(*kind);
            for uniform in uniforms.iter() {
                assert!(
                    declares_uniform(&source, uniform),
                    "{} does not declare {}",
                    kind.name(),
                    uniform
                );
            }
        }
    }

    #[test]
    fn sources_target_glsl_330() {
        for (name, source) in EMBEDDED_SHADERS.iter() {
            assert!(source.starts_with("#version 330 core"), "{}", name);
        }
    }
}
