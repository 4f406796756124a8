use crate::{
    pbr::{
        fullscreen_quad, load_brdf_lut, load_environment_map, load_irradiance_map,
        load_prefilter_map, unit_cube, CaptureTarget, EnvironmentMapSet, ProgramSet,
    },
    BakedEnvironment, FrameMatrices, IblError, PrecomputeSettings, RadianceImage, Result,
    ShaderLibrary, ShadingEvaluator, Stage,
};
use log::{info, warn};
use skylight_opengl::{gl, GeometryBuffer, GlError, Texture};
use std::{path::Path, rc::Rc};

/// Owns every GPU resource of the lighting pipeline: the programs, the
/// capture target, the shared geometry and the currently published maps.
pub struct IblRenderer {
    settings: PrecomputeSettings,
    library: ShaderLibrary,
    programs: ProgramSet,
    capture: CaptureTarget,
    cube: GeometryBuffer,
    quad: GeometryBuffer,
    brdf_lut: Option<Rc<Texture>>,
    maps: Option<EnvironmentMapSet>,
    shading: ShadingEvaluator,
}

impl IblRenderer {
    pub fn new(settings: PrecomputeSettings, library: ShaderLibrary) -> Result<Self> {
        settings.validate()?;
        let programs = ProgramSet::load(&library)?;
        Ok(Self {
            settings,
            library,
            programs,
            capture: CaptureTarget::new(),
            cube: unit_cube(),
            quad: fullscreen_quad(),
            brdf_lut: None,
            maps: None,
            shading: ShadingEvaluator::default(),
        })
    }

    pub fn settings(&self) -> &PrecomputeSettings {
        &self.settings
    }

    /// Decodes a panorama and rebuilds all four lighting maps from it.
    ///
    /// On failure the previously published maps stay bound.
    pub fn precompute(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let radiance = RadianceImage::load(path).map_err(|error| {
            warn!(
                "Failed to load panorama '{}', keeping current lighting: {}",
                path.display(),
                error
            );
            IblError::aborted(Stage::Decode, error)
        })?;
        self.precompute_radiance(&radiance)
    }

    pub fn precompute_radiance(&mut self, radiance: &RadianceImage) -> Result<()> {
        let result = self.build_maps(radiance);
        self.capture.release();
        match result {
            Ok(maps) => {
                self.maps = Some(maps);
                Ok(())
            }
            Err(error) => {
                warn!("{}, keeping current lighting", error);
                Err(error)
            }
        }
    }

    fn build_maps(&mut self, radiance: &RadianceImage) -> Result<EnvironmentMapSet> {
        info!("Creating environment cubemap");
        let environment = load_environment_map(
            &mut self.capture,
            &self.programs.projection,
            &self.cube,
            radiance,
            &self.settings,
        )
        .map_err(|error| IblError::aborted(Stage::Projection, error))?;

        info!("Creating irradiance cubemap");
        let irradiance = load_irradiance_map(
            &mut self.capture,
            &self.programs.irradiance,
            &self.cube,
            &environment,
            &self.settings,
        )
        .map_err(|error| IblError::aborted(Stage::Irradiance, error))?;

        info!("Creating prefilter cubemap");
        let prefiltered = load_prefilter_map(
            &mut self.capture,
            &self.programs.prefilter,
            &self.cube,
            &environment,
            &self.settings,
        )
        .map_err(|error| IblError::aborted(Stage::Prefilter, error))?;

        let brdf_lut = self
            .brdf_lut()
            .map_err(|error| IblError::aborted(Stage::BrdfIntegration, error))?;

        Ok(EnvironmentMapSet {
            environment,
            irradiance,
            prefiltered,
            brdf_lut,
        })
    }

    /// Integrates the lookup table on first use and shares it afterwards.
    pub fn brdf_lut(&mut self) -> Result<Rc<Texture>, GlError> {
        if let Some(lut) = self.brdf_lut.as_ref() {
            return Ok(lut.clone());
        }
        info!("Creating brdf lookup table");
        let lut = Rc::new(load_brdf_lut(
            &mut self.capture,
            &self.programs.brdf,
            &self.quad,
            &self.settings,
        )?);
        self.capture.release();
        self.brdf_lut = Some(lut.clone());
        Ok(lut)
    }

    /// Recompiles every program. The running set is only replaced once all
    /// of them compile, link and bind their uniforms.
    pub fn reload_shaders(&mut self) -> Result<()> {
        match ProgramSet::load(&self.library) {
            Ok(programs) => {
                self.programs = programs;
                self.brdf_lut = None;
                info!("Reloaded shader programs");
                Ok(())
            }
            Err(error) => {
                warn!("Shader reload failed, keeping current programs: {}", error);
                Err(error.into())
            }
        }
    }

    pub fn set_shader_library(&mut self, library: ShaderLibrary) {
        self.library = library;
    }

    pub fn maps(&self) -> Option<&EnvironmentMapSet> {
        self.maps.as_ref()
    }

    pub fn download(&self) -> Option<BakedEnvironment> {
        self.maps.as_ref().map(EnvironmentMapSet::download)
    }

    pub fn shading(&self) -> &ShadingEvaluator {
        &self.shading
    }

    pub fn shading_mut(&mut self) -> &mut ShadingEvaluator {
        &mut self.shading
    }

    /// Draws `mesh` with the active lighting model into the bound framebuffer,
    /// then the sky behind it. Does nothing until a precompute succeeded.
    pub fn render(
        &self,
        matrices: &FrameMatrices,
        viewport: (u32, u32),
        mesh: &GeometryBuffer,
    ) -> Result<()> {
        let maps = match self.maps.as_ref() {
            Some(maps) => maps,
            None => return Ok(()),
        };

        let plan = self.shading.plan(matrices);
        let program = self.programs.shading_program(self.shading.mode());

        unsafe {
            gl::Viewport(0, 0, viewport.0 as i32, viewport.1 as i32);
        }

        let shader = program.program();
        shader.use_program();
        program
            .frame()
            .apply(shader, &plan.matrices, &plan.normal_matrix);
        if let Some(material) = plan.material.as_ref() {
            let max_lod = maps.prefiltered.mip_levels().saturating_sub(1) as f32;
            program.set_material(material, max_lod);
        }
        for binding in plan.textures.iter() {
            maps.texture(binding.map).bind(binding.unit);
            if let Some(location) = program.sampler(binding.map) {
                shader.set_uniform_int(location, binding.unit as i32);
            }
        }
        mesh.draw();

        if self.shading.draw_sky() {
            self.programs.sky.program.use_program();
            maps.environment.bind(0);
            self.programs
                .sky
                .set_parameters(&matrices.projection, &matrices.view, 0);
            self.cube.draw();
        }
        Ok(())
    }
}
