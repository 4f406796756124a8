use crate::{
    passes_for,
    pbr::{CaptureTarget, ProjectionProgram},
    PrecomputeSettings, RadianceImage, Stage,
};
use log::debug;
use skylight_opengl::{GeometryBuffer, GlError, PixelFormat, Texture};

/// Projects the panorama onto a new environment cubemap with a full mip chain.
///
/// The uploaded panorama only lives for the duration of this call.
pub fn load_environment_map(
    capture: &mut CaptureTarget,
    program: &ProjectionProgram,
    cube: &GeometryBuffer,
    radiance: &RadianceImage,
    settings: &PrecomputeSettings,
) -> Result<Texture, GlError> {
    let source = Texture::from_rgb_f32(radiance.width(), radiance.height(), radiance.data());
    let environment = Texture::cubemap(
        settings.environment_resolution,
        PixelFormat::Rgb16F,
        settings.environment_mip_levels(),
    );

    program.program.use_program();
    source.bind(0);
    program.set_source_unit(0);

    for pass in passes_for(settings, Stage::Projection) {
        debug!("Projecting panorama at {}x{}", pass.resolution, pass.resolution);
        capture.render_cube_pass(&pass, program, cube, &environment)?;
    }

    environment.generate_mipmaps();
    Ok(environment)
}
