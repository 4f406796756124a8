use crate::{
    FrameMatrices, LightingMap, MaterialParameters, ProgramKind, ShaderLibrary, ShadingMode,
};
use log::{debug, info};
use nalgebra_glm as glm;
use skylight_opengl::{GlError, ShaderProgram, UniformLocation};
use std::io;

/// A program that renders one cube face per draw from the capture cameras.
pub trait CaptureProgram {
    fn program(&self) -> &ShaderProgram;
    fn set_view_projection(&self, projection: &glm::Mat4, view: &glm::Mat4);
}

/// A program that shades the viewer's mesh.
pub trait ShadingProgram {
    fn program(&self) -> &ShaderProgram;
    fn frame(&self) -> &FrameUniforms;
    fn sampler(&self, map: LightingMap) -> Option<UniformLocation>;
    fn set_material(&self, _material: &MaterialParameters, _prefilter_max_lod: f32) {}
}

fn build_program(library: &ShaderLibrary, kind: ProgramKind) -> Result<ShaderProgram, GlError> {
    let (vertex, fragment) = kind.stage_files();
    let mut program = ShaderProgram::new(kind.name());
    match library {
        ShaderLibrary::Embedded => {
            program
                .vertex_shader_source(embedded(vertex)?)?
                .fragment_shader_source(embedded(fragment)?)?;
        }
        ShaderLibrary::Directory(directory) => {
            program
                .vertex_shader_file(directory.join(vertex))?
                .fragment_shader_file(directory.join(fragment))?;
        }
    }
    program.link()?;
    debug!("Linked shader program '{}'", kind.name());
    Ok(program)
}

fn embedded(file: &str) -> Result<&'static str, GlError> {
    ShaderLibrary::embedded_source(file).ok_or_else(|| GlError::ShaderSource {
        path: file.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no embedded shader with this name"),
    })
}

/// Camera and transform uniforms shared by the mesh programs.
pub struct FrameUniforms {
    projection: UniformLocation,
    view: UniformLocation,
    model: UniformLocation,
    normal_matrix: UniformLocation,
    camera_pos: UniformLocation,
}

impl FrameUniforms {
    fn resolve(program: &ShaderProgram) -> Result<Self, GlError> {
        Ok(Self {
            projection: program.require_uniform("projection")?,
            view: program.require_uniform("view")?,
            model: program.require_uniform("model")?,
            normal_matrix: program.require_uniform("normal_matrix")?,
            camera_pos: program.require_uniform("camera_pos")?,
        })
    }

    pub fn apply(
        &self,
        program: &ShaderProgram,
        matrices: &FrameMatrices,
        normal_matrix: &glm::Mat3,
    ) {
        program.set_uniform_matrix4x4(self.projection, &matrices.projection);
        program.set_uniform_matrix4x4(self.view, &matrices.view);
        program.set_uniform_matrix4x4(self.model, &matrices.model);
        program.set_uniform_matrix3x3(self.normal_matrix, normal_matrix);
        program.set_uniform_vec3(self.camera_pos, &matrices.camera_position);
    }
}

pub struct ProjectionProgram {
    pub program: ShaderProgram,
    projection: UniformLocation,
    view: UniformLocation,
    equirectangular_map: UniformLocation,
}

impl ProjectionProgram {
    pub fn load(library: &ShaderLibrary) -> Result<Self, GlError> {
        let program = build_program(library, ProgramKind::Projection)?;
        let projection = program.require_uniform("projection")?;
        let view = program.require_uniform("view")?;
        let equirectangular_map = program.require_uniform("equirectangular_map")?;
        Ok(Self {
            program,
            projection,
            view,
            equirectangular_map,
        })
    }

    pub fn set_source_unit(&self, unit: u32) {
        self.program
            .set_uniform_int(self.equirectangular_map, unit as i32);
    }
}

impl CaptureProgram for ProjectionProgram {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn set_view_projection(&self, projection: &glm::Mat4, view: &glm::Mat4) {
        self.program.set_uniform_matrix4x4(self.projection, projection);
        self.program.set_uniform_matrix4x4(self.view, view);
    }
}

pub struct IrradianceProgram {
    pub program: ShaderProgram,
    projection: UniformLocation,
    view: UniformLocation,
    environment_map: UniformLocation,
    sample_delta: UniformLocation,
}

impl IrradianceProgram {
    pub fn load(library: &ShaderLibrary) -> Result<Self, GlError> {
        let program = build_program(library, ProgramKind::Irradiance)?;
        let projection = program.require_uniform("projection")?;
        let view = program.require_uniform("view")?;
        let environment_map = program.require_uniform("environment_map")?;
        let sample_delta = program.require_uniform("sample_delta")?;
        Ok(Self {
            program,
            projection,
            view,
            environment_map,
            sample_delta,
        })
    }

    pub fn set_parameters(&self, environment_unit: u32, sample_delta: f32) {
        self.program
            .set_uniform_int(self.environment_map, environment_unit as i32);
        self.program.set_uniform_float(self.sample_delta, sample_delta);
    }
}

impl CaptureProgram for IrradianceProgram {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn set_view_projection(&self, projection: &glm::Mat4, view: &glm::Mat4) {
        self.program.set_uniform_matrix4x4(self.projection, projection);
        self.program.set_uniform_matrix4x4(self.view, view);
    }
}

pub struct PrefilterProgram {
    pub program: ShaderProgram,
    projection: UniformLocation,
    view: UniformLocation,
    environment_map: UniformLocation,
    roughness: UniformLocation,
    source_resolution: UniformLocation,
    sample_count: UniformLocation,
}

impl PrefilterProgram {
    pub fn load(library: &ShaderLibrary) -> Result<Self, GlError> {
        let program = build_program(library, ProgramKind::Prefilter)?;
        let projection = program.require_uniform("projection")?;
        let view = program.require_uniform("view")?;
        let environment_map = program.require_uniform("environment_map")?;
        let roughness = program.require_uniform("roughness")?;
        let source_resolution = program.require_uniform("source_resolution")?;
        let sample_count = program.require_uniform("sample_count")?;
        Ok(Self {
            program,
            projection,
            view,
            environment_map,
            roughness,
            source_resolution,
            sample_count,
        })
    }

    pub fn set_source(&self, environment_unit: u32, source_resolution: u32, sample_count: u32) {
        self.program
            .set_uniform_int(self.environment_map, environment_unit as i32);
        self.program
            .set_uniform_float(self.source_resolution, source_resolution as f32);
        self.program
            .set_uniform_int(self.sample_count, sample_count as i32);
    }

    pub fn set_roughness(&self, roughness: f32) {
        self.program.set_uniform_float(self.roughness, roughness);
    }
}

impl CaptureProgram for PrefilterProgram {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn set_view_projection(&self, projection: &glm::Mat4, view: &glm::Mat4) {
        self.program.set_uniform_matrix4x4(self.projection, projection);
        self.program.set_uniform_matrix4x4(self.view, view);
    }
}

pub struct BrdfProgram {
    pub program: ShaderProgram,
    sample_count: UniformLocation,
}

impl BrdfProgram {
    pub fn load(library: &ShaderLibrary) -> Result<Self, GlError> {
        let program = build_program(library, ProgramKind::BrdfIntegration)?;
        let sample_count = program.require_uniform("sample_count")?;
        Ok(Self {
            program,
            sample_count,
        })
    }

    pub fn set_sample_count(&self, sample_count: u32) {
        self.program
            .set_uniform_int(self.sample_count, sample_count as i32);
    }
}

pub struct ReflectionProgram {
    pub program: ShaderProgram,
    frame: FrameUniforms,
    environment_map: UniformLocation,
}

impl ReflectionProgram {
    pub fn load(library: &ShaderLibrary) -> Result<Self, GlError> {
        let program = build_program(library, ProgramKind::Reflection)?;
        let frame = FrameUniforms::resolve(&program)?;
        let environment_map = program.require_uniform("environment_map")?;
        Ok(Self {
            program,
            frame,
            environment_map,
        })
    }
}

impl ShadingProgram for ReflectionProgram {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn frame(&self) -> &FrameUniforms {
        &self.frame
    }

    fn sampler(&self, map: LightingMap) -> Option<UniformLocation> {
        match map {
            LightingMap::Environment => Some(self.environment_map),
            _ => None,
        }
    }
}

pub struct PbrProgram {
    pub program: ShaderProgram,
    frame: FrameUniforms,
    irradiance_map: UniformLocation,
    prefilter_map: UniformLocation,
    brdf_lut: UniformLocation,
    albedo: UniformLocation,
    roughness: UniformLocation,
    metalness: UniformLocation,
    fresnel: UniformLocation,
    prefilter_max_lod: UniformLocation,
}

impl PbrProgram {
    pub fn load(library: &ShaderLibrary) -> Result<Self, GlError> {
        let program = build_program(library, ProgramKind::Pbr)?;
        let frame = FrameUniforms::resolve(&program)?;
        let irradiance_map = program.require_uniform("irradiance_map")?;
        let prefilter_map = program.require_uniform("prefilter_map")?;
        let brdf_lut = program.require_uniform("brdf_lut")?;
        let albedo = program.require_uniform("albedo")?;
        let roughness = program.require_uniform("roughness")?;
        let metalness = program.require_uniform("metalness")?;
        let fresnel = program.require_uniform("fresnel")?;
        let prefilter_max_lod = program.require_uniform("prefilter_max_lod")?;
        Ok(Self {
            program,
            frame,
            irradiance_map,
            prefilter_map,
            brdf_lut,
            albedo,
            roughness,
            metalness,
            fresnel,
            prefilter_max_lod,
        })
    }
}

impl ShadingProgram for PbrProgram {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn frame(&self) -> &FrameUniforms {
        &self.frame
    }

    fn sampler(&self, map: LightingMap) -> Option<UniformLocation> {
        match map {
            LightingMap::Irradiance => Some(self.irradiance_map),
            LightingMap::Prefiltered => Some(self.prefilter_map),
            LightingMap::BrdfLut => Some(self.brdf_lut),
            LightingMap::Environment => None,
        }
    }

    fn set_material(&self, material: &MaterialParameters, prefilter_max_lod: f32) {
        self.program.set_uniform_vec3(self.albedo, &material.albedo);
        self.program
            .set_uniform_float(self.roughness, material.roughness);
        self.program
            .set_uniform_float(self.metalness, material.metalness);
        self.program.set_uniform_vec3(self.fresnel, &material.fresnel);
        self.program
            .set_uniform_float(self.prefilter_max_lod, prefilter_max_lod);
    }
}

pub struct SkyProgram {
    pub program: ShaderProgram,
    projection: UniformLocation,
    view: UniformLocation,
    environment_map: UniformLocation,
}

impl SkyProgram {
    pub fn load(library: &ShaderLibrary) -> Result<Self, GlError> {
        let program = build_program(library, ProgramKind::Sky)?;
        let projection = program.require_uniform("projection")?;
        let view = program.require_uniform("view")?;
        let environment_map = program.require_uniform("environment_map")?;
        Ok(Self {
            program,
            projection,
            view,
            environment_map,
        })
    }

    pub fn set_parameters(&self, projection: &glm::Mat4, view: &glm::Mat4, environment_unit: u32) {
        self.program.set_uniform_matrix4x4(self.projection, projection);
        self.program.set_uniform_matrix4x4(self.view, view);
        self.program
            .set_uniform_int(self.environment_map, environment_unit as i32);
    }
}

/// All programs, compiled and bound together so a reload either replaces
/// every one of them or none.
pub struct ProgramSet {
    pub projection: ProjectionProgram,
    pub irradiance: IrradianceProgram,
    pub prefilter: PrefilterProgram,
    pub brdf: BrdfProgram,
    pub reflection: ReflectionProgram,
    pub pbr: PbrProgram,
    pub sky: SkyProgram,
}

impl ProgramSet {
    pub fn load(library: &ShaderLibrary) -> Result<Self, GlError> {
        info!("Loading shader programs");
        Ok(Self {
            projection: ProjectionProgram::load(library)?,
            irradiance: IrradianceProgram::load(library)?,
            prefilter: PrefilterProgram::load(library)?,
            brdf: BrdfProgram::load(library)?,
            reflection: ReflectionProgram::load(library)?,
            pbr: PbrProgram::load(library)?,
            sky: SkyProgram::load(library)?,
        })
    }

    pub fn shading_program(&self, mode: ShadingMode) -> &dyn ShadingProgram {
        match mode {
            ShadingMode::Reflection => &self.reflection,
            ShadingMode::Pbr => &self.pbr,
        }
    }
}
