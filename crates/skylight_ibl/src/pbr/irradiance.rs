use crate::{
    passes_for,
    pbr::{CaptureTarget, IrradianceProgram},
    PrecomputeSettings, Stage,
};
use skylight_opengl::{GeometryBuffer, GlError, PixelFormat, Texture};

pub fn load_irradiance_map(
    capture: &mut CaptureTarget,
    program: &IrradianceProgram,
    cube: &GeometryBuffer,
    environment: &Texture,
    settings: &PrecomputeSettings,
) -> Result<Texture, GlError> {
    let irradiance = Texture::cubemap(settings.irradiance_resolution, PixelFormat::Rgb16F, 1);

    program.program.use_program();
    environment.bind(0);
    program.set_parameters(0, settings.irradiance_sample_delta);

    for pass in passes_for(settings, Stage::Irradiance) {
        capture.render_cube_pass(&pass, program, cube, &irradiance)?;
    }
    Ok(irradiance)
}
