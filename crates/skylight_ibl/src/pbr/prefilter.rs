use crate::{
    passes_for,
    pbr::{CaptureTarget, PrefilterProgram},
    PrecomputeSettings, Stage,
};
use log::debug;
use skylight_opengl::{GeometryBuffer, GlError, PixelFormat, Texture};

/// Renders one roughness per mip level, finishing all six faces of a
/// level before moving to the next.
pub fn load_prefilter_map(
    capture: &mut CaptureTarget,
    program: &PrefilterProgram,
    cube: &GeometryBuffer,
    environment: &Texture,
    settings: &PrecomputeSettings,
) -> Result<Texture, GlError> {
    let prefiltered = Texture::cubemap(
        settings.prefilter_resolution,
        PixelFormat::Rgb16F,
        settings.prefilter_mip_levels,
    );

    program.program.use_program();
    environment.bind(0);
    program.set_source(
        0,
        settings.environment_resolution,
        settings.prefilter_sample_count,
    );

    for pass in passes_for(settings, Stage::Prefilter) {
        debug!(
            "Prefiltering mip {} at {}x{} with roughness {}",
            pass.mip_level, pass.resolution, pass.resolution, pass.roughness
        );
        program.program.use_program();
        program.set_roughness(pass.roughness);
        capture.render_cube_pass(&pass, program, cube, &prefiltered)?;
    }
    Ok(prefiltered)
}
