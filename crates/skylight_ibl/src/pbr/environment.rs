use crate::{BakedEnvironment, CubeFace, CubeImage, CubeLevel, FaceImage, LightingMap, LutImage};
use skylight_opengl::{gl, Texture, CUBEMAP_FACE_TARGETS};
use std::{rc::Rc, sync::Arc};

/// The GPU resident lighting maps of one panorama.
///
/// A set is only ever built complete and swapped in whole; dropping it
/// releases every texture except a lookup table still shared elsewhere.
pub struct EnvironmentMapSet {
    pub environment: Texture,
    pub irradiance: Texture,
    pub prefiltered: Texture,
    pub brdf_lut: Rc<Texture>,
}

impl EnvironmentMapSet {
    pub fn texture(&self, map: LightingMap) -> &Texture {
        match map {
            LightingMap::Environment => &self.environment,
            LightingMap::Irradiance => &self.irradiance,
            LightingMap::Prefiltered => &self.prefiltered,
            LightingMap::BrdfLut => &self.brdf_lut,
        }
    }

    /// Reads every map back into host memory.
    pub fn download(&self) -> BakedEnvironment {
        let lut_size = self.brdf_lut.width() as usize;
        let lut_floats = self.brdf_lut.read_pixels(gl::TEXTURE_2D, 0);
        BakedEnvironment {
            environment: download_cubemap(&self.environment),
            irradiance: download_cubemap(&self.irradiance),
            prefiltered: download_cubemap(&self.prefiltered),
            brdf_lut: Arc::new(LutImage::from_rg_floats(lut_size, &lut_floats)),
        }
    }
}

fn download_cubemap(texture: &Texture) -> CubeImage {
    let levels = (0..texture.mip_levels())
        .map(|level| {
            let size = (texture.width() >> level).max(1) as usize;
            let faces = CubeFace::ALL
                .iter()
                .map(|face| {
                    let floats = texture.read_pixels(CUBEMAP_FACE_TARGETS[face.index()], level);
                    FaceImage::from_rgb_floats(size, &floats)
                })
                .collect();
            CubeLevel::new(faces)
        })
        .collect();
    CubeImage::new(levels)
}
