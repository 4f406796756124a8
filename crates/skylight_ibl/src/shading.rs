use crate::{
    sampling::{fresnel_schlick_roughness, reflect},
    BakedEnvironment, ProgramKind,
};
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Perfect mirror lookup into the environment cubemap.
    Reflection,
    /// Diffuse irradiance plus split-sum specular.
    Pbr,
}

impl ShadingMode {
    pub fn toggled(self) -> Self {
        match self {
            ShadingMode::Reflection => ShadingMode::Pbr,
            ShadingMode::Pbr => ShadingMode::Reflection,
        }
    }

    pub fn program(self) -> ProgramKind {
        match self {
            ShadingMode::Reflection => ProgramKind::Reflection,
            ShadingMode::Pbr => ProgramKind::Pbr,
        }
    }
}

impl Default for ShadingMode {
    fn default() -> Self {
        ShadingMode::Pbr
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParameters {
    pub albedo: glm::Vec3,
    pub roughness: f32,
    pub metalness: f32,
    /// Reflectance at normal incidence of the dielectric base.
    pub fresnel: glm::Vec3,
}

impl Default for MaterialParameters {
    fn default() -> Self {
        Self {
            albedo: glm::vec3(1.0, 1.0, 1.0),
            roughness: 0.5,
            metalness: 0.0,
            fresnel: glm::vec3(0.04, 0.04, 0.04),
        }
    }
}

/// Camera and object transforms supplied by the viewer for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameMatrices {
    pub projection: glm::Mat4,
    pub view: glm::Mat4,
    pub model: glm::Mat4,
    pub camera_position: glm::Vec3,
}

impl FrameMatrices {
    /// Inverse transpose of the model rotation and scale, for world space normals.
    pub fn normal_matrix(&self) -> glm::Mat3 {
        let model = glm::mat4_to_mat3(&self.model);
        glm::inverse_transpose(model)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LightingMap {
    Environment,
    Irradiance,
    Prefiltered,
    BrdfLut,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    pub unit: u32,
    pub map: LightingMap,
}

/// Everything one shaded draw needs, resolved before touching the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingPlan {
    pub program: ProgramKind,
    pub textures: Vec<TextureBinding>,
    pub matrices: FrameMatrices,
    pub normal_matrix: glm::Mat3,
    pub material: Option<MaterialParameters>,
}

/// Per frame state of the shading pass: the active lighting model and the
/// material scalars the viewer edits.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingEvaluator {
    mode: ShadingMode,
    material: MaterialParameters,
    draw_sky: bool,
}

impl Default for ShadingEvaluator {
    fn default() -> Self {
        Self::new(ShadingMode::default(), MaterialParameters::default())
    }
}

impl ShadingEvaluator {
    pub fn new(mode: ShadingMode, material: MaterialParameters) -> Self {
        Self {
            mode,
            material,
            draw_sky: true,
        }
    }

    pub fn mode(&self) -> ShadingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ShadingMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn material(&self) -> &MaterialParameters {
        &self.material
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.material.roughness = roughness.max(0.0).min(1.0);
    }

    pub fn set_metalness(&mut self, metalness: f32) {
        self.material.metalness = metalness.max(0.0).min(1.0);
    }

    pub fn set_albedo(&mut self, albedo: glm::Vec3) {
        self.material.albedo = albedo;
    }

    pub fn set_fresnel(&mut self, fresnel: glm::Vec3) {
        self.material.fresnel = fresnel;
    }

    pub fn draw_sky(&self) -> bool {
        self.draw_sky
    }

    pub fn set_draw_sky(&mut self, draw_sky: bool) {
        self.draw_sky = draw_sky;
    }

    pub fn plan(&self, matrices: &FrameMatrices) -> ShadingPlan {
        let (textures, material) = match self.mode {
            ShadingMode::Reflection => (
                vec![TextureBinding {
                    unit: 0,
                    map: LightingMap::Environment,
                }],
                None,
            ),
            ShadingMode::Pbr => (
                vec![
                    TextureBinding {
                        unit: 0,
                        map: LightingMap::Irradiance,
                    },
                    TextureBinding {
                        unit: 1,
                        map: LightingMap::Prefiltered,
                    },
                    TextureBinding {
                        unit: 2,
                        map: LightingMap::BrdfLut,
                    },
                ],
                Some(self.material),
            ),
        };
        ShadingPlan {
            program: self.mode.program(),
            textures,
            matrices: *matrices,
            normal_matrix: matrices.normal_matrix(),
            material,
        }
    }

    /// Host side evaluation of the active lighting model for one surface
    /// point. `view_direction` points from the surface towards the camera.
    pub fn shade(
        &self,
        maps: &BakedEnvironment,
        normal: &glm::Vec3,
        view_direction: &glm::Vec3,
    ) -> glm::Vec3 {
        match self.mode {
            ShadingMode::Reflection => shade_reflection(maps, normal, view_direction),
            ShadingMode::Pbr => shade_pbr(maps, &self.material, normal, view_direction),
        }
    }
}

pub fn shade_reflection(
    maps: &BakedEnvironment,
    normal: &glm::Vec3,
    view_direction: &glm::Vec3,
) -> glm::Vec3 {
    let incident = -glm::normalize(view_direction);
    let reflected = reflect(&incident, &glm::normalize(normal));
    maps.environment.sample(&reflected, 0.0)
}

pub fn shade_pbr(
    maps: &BakedEnvironment,
    material: &MaterialParameters,
    normal: &glm::Vec3,
    view_direction: &glm::Vec3,
) -> glm::Vec3 {
    let normal = glm::normalize(normal);
    let view = glm::normalize(view_direction);
    let reflected = reflect(&-view, &normal);
    let n_dot_v = glm::dot(&normal, &view).max(0.0);

    let irradiance = maps.irradiance.sample(&normal, 0.0);
    let diffuse = irradiance.component_mul(&material.albedo);

    let max_lod = (maps.prefiltered.mip_levels() - 1) as f32;
    let prefiltered = maps
        .prefiltered
        .sample(&reflected, material.roughness * max_lod);
    let brdf = maps.brdf_lut.sample(n_dot_v, material.roughness);
    let split_sum = |f0: &glm::Vec3| {
        let specular_weight = fresnel_schlick_roughness(n_dot_v, f0, material.roughness);
        let scale_bias = specular_weight * brdf.x + glm::vec3(brdf.y, brdf.y, brdf.y);
        (specular_weight, prefiltered.component_mul(&scale_bias))
    };

    // Dielectric and metal responses are evaluated separately and blended.
    let (specular_weight, dielectric_specular) = split_sum(&material.fresnel);
    let diffuse_weight = glm::vec3(1.0, 1.0, 1.0) - specular_weight;
    let dielectric = diffuse_weight.component_mul(&diffuse) + dielectric_specular;
    let (_, metal) = split_sum(&material.albedo);

    glm::lerp(&dielectric, &metal, material.metalness)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameMatrices {
        FrameMatrices {
            projection: glm::perspective(16.0 / 9.0, 45_f32.to_radians(), 0.1, 100.0),
            view: glm::look_at(
                &glm::vec3(0.0, 1.0, 4.0),
                &glm::vec3(0.0, 0.0, 0.0),
                &glm::vec3(0.0, 1.0, 0.0),
            ),
            model: glm::scale(&glm::Mat4::identity(), &glm::vec3(2.0, 1.0, 1.0)),
            camera_position: glm::vec3(0.0, 1.0, 4.0),
        }
    }

    #[test]
    fn toggling_changes_only_program_and_textures() {
        let matrices = frame();
        let mut evaluator = ShadingEvaluator::new(ShadingMode::Reflection, Default::default());
        let reflection = evaluator.plan(&matrices);
        evaluator.toggle_mode();
        let pbr = evaluator.plan(&matrices);

        assert_eq!(reflection.program, ProgramKind::Reflection);
        assert_eq!(pbr.program, ProgramKind::Pbr);
        assert_ne!(reflection.textures, pbr.textures);

        assert_eq!(reflection.matrices, pbr.matrices);
        assert_eq!(reflection.normal_matrix, pbr.normal_matrix);
    }

    #[test]
    fn pbr_binds_three_units() {
        let plan = ShadingEvaluator::default().plan(&frame());
        let units = plan
            .textures
            .iter()
            .map(|binding| (binding.unit, binding.map))
            .collect::<Vec<_>>();
        assert_eq!(
            units,
            vec![
                (0, LightingMap::Irradiance),
                (1, LightingMap::Prefiltered),
                (2, LightingMap::BrdfLut)
            ]
        );
        assert!(plan.material.is_some());
    }

    #[test]
    fn reflection_ignores_material() {
        let mut evaluator = ShadingEvaluator::new(ShadingMode::Reflection, Default::default());
        evaluator.set_roughness(0.9);
        let plan = evaluator.plan(&frame());
        assert_eq!(plan.material, None);
        assert_eq!(
            plan.textures,
            vec![TextureBinding {
                unit: 0,
                map: LightingMap::Environment
            }]
        );
    }

    #[test]
    fn material_edits_apply_to_the_next_plan() {
        let mut evaluator = ShadingEvaluator::default();
        evaluator.set_roughness(0.8);
        evaluator.set_metalness(1.5);
        let material = evaluator.plan(&frame()).material.unwrap_or_default();
        assert_eq!(material.roughness, 0.8);
        assert_eq!(material.metalness, 1.0);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let matrices = frame();
        let normal = matrices.normal_matrix() * glm::vec3(1.0, 1.0, 0.0);
        // Scaling x by 2 squashes the normal's x component.
        assert!((normal.x - 0.5).abs() < 1e-6);
        assert!((normal.y - 1.0).abs() < 1e-6);
    }
}
