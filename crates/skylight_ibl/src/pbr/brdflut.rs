use crate::{
    pbr::{BrdfProgram, CaptureTarget},
    PrecomputeSettings,
};
use skylight_opengl::{GeometryBuffer, GlError, Texture};

/// Integrates the split-sum lookup table. Depends on nothing but settings.
pub fn load_brdf_lut(
    capture: &mut CaptureTarget,
    program: &BrdfProgram,
    quad: &GeometryBuffer,
    settings: &PrecomputeSettings,
) -> Result<Texture, GlError> {
    let lut = Texture::lookup_table(settings.brdf_lut_resolution);

    program.program.use_program();
    program.set_sample_count(settings.brdf_sample_count);
    capture.render_fullscreen(quad, &lut)?;
    Ok(lut)
}
