use gl::types::*;
use std::ptr;

/// Face targets in the fixed cubemap order +X, -X, +Y, -Y, +Z, -Z.
pub const CUBEMAP_FACE_TARGETS: [GLenum; 6] = [
    gl::TEXTURE_CUBE_MAP_POSITIVE_X,
    gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
    gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
    gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
    gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
    gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
];

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PixelFormat {
    Rg16F,
    Rgb16F,
    Rgb32F,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rg16F => 2,
            PixelFormat::Rgb16F | PixelFormat::Rgb32F => 3,
        }
    }

    fn internal_format(self) -> GLint {
        (match self {
            PixelFormat::Rg16F => gl::RG16F,
            PixelFormat::Rgb16F => gl::RGB16F,
            PixelFormat::Rgb32F => gl::RGB32F,
        }) as GLint
    }

    fn format(self) -> GLenum {
        match self {
            PixelFormat::Rg16F => gl::RG,
            PixelFormat::Rgb16F | PixelFormat::Rgb32F => gl::RGB,
        }
    }
}

#[derive(Debug)]
pub struct Texture {
    id: GLuint,
    target: GLenum,
    format: PixelFormat,
    width: u32,
    height: u32,
    mip_levels: u32,
}

impl Texture {
    fn new(target: GLenum, format: PixelFormat, width: u32, height: u32, mip_levels: u32) -> Self {
        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
        }
        Texture {
            id,
            target,
            format,
            width,
            height,
            mip_levels,
        }
    }

    /// Uploads floating point RGB pixels, row 0 first.
    pub fn from_rgb_f32(width: u32, height: u32, pixels: &[f32]) -> Self {
        let texture = Texture::new(gl::TEXTURE_2D, PixelFormat::Rgb32F, width, height, 1);
        texture.bind(0);
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                texture.format.internal_format(),
                width as i32,
                height as i32,
                0,
                texture.format.format(),
                gl::FLOAT,
                pixels.as_ptr() as *const GLvoid,
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
        }
        texture.set_filtering(false);
        texture
    }

    /// Allocates an empty cubemap with storage for `mip_levels` levels.
    pub fn cubemap(resolution: u32, format: PixelFormat, mip_levels: u32) -> Self {
        let mip_levels = mip_levels.max(1);
        let texture = Texture::new(
            gl::TEXTURE_CUBE_MAP,
            format,
            resolution,
            resolution,
            mip_levels,
        );
        texture.bind(0);
        for level in 0..mip_levels {
            let size = (resolution >> level).max(1) as i32;
            for face_target in CUBEMAP_FACE_TARGETS.iter() {
                unsafe {
                    gl::TexImage2D(
                        *face_target,
                        level as i32,
                        format.internal_format(),
                        size,
                        size,
                        0,
                        format.format(),
                        gl::FLOAT,
                        ptr::null(),
                    );
                }
            }
        }
        unsafe {
            gl::TexParameteri(gl::TEXTURE_CUBE_MAP, gl::TEXTURE_BASE_LEVEL, 0);
            gl::TexParameteri(
                gl::TEXTURE_CUBE_MAP,
                gl::TEXTURE_MAX_LEVEL,
                mip_levels as i32 - 1,
            );
        }
        texture.set_wrapping_clamp();
        texture.set_filtering(mip_levels > 1);
        texture
    }

    /// Allocates a single level two channel texture for lookup tables.
    pub fn lookup_table(size: u32) -> Self {
        let texture = Texture::new(gl::TEXTURE_2D, PixelFormat::Rg16F, size, size, 1);
        texture.bind(0);
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                texture.format.internal_format(),
                size as i32,
                size as i32,
                0,
                texture.format.format(),
                gl::FLOAT,
                ptr::null(),
            );
        }
        texture.set_wrapping_clamp();
        texture.set_filtering(false);
        texture
    }

    pub fn bind(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(self.target, self.id);
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn target(&self) -> GLenum {
        self.target
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    /// Box filters level 0 down through every allocated level.
    pub fn generate_mipmaps(&self) {
        self.bind(0);
        unsafe {
            gl::GenerateMipmap(self.target);
        }
    }

    /// Reads one image of the texture back as floats.
    ///
    /// `image_target` is `TEXTURE_2D` for flat textures or one of
    /// [`CUBEMAP_FACE_TARGETS`] for cubemaps.
    pub fn read_pixels(&self, image_target: GLenum, level: u32) -> Vec<f32> {
        let width = (self.width >> level).max(1) as usize;
        let height = (self.height >> level).max(1) as usize;
        let mut pixels = vec![0.0_f32; width * height * self.format.channels()];
        self.bind(0);
        unsafe {
            gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
            gl::GetTexImage(
                image_target,
                level as i32,
                self.format.format(),
                gl::FLOAT,
                pixels.as_mut_ptr() as *mut GLvoid,
            );
        }
        pixels
    }

    fn set_wrapping_clamp(&self) {
        unsafe {
            gl::TexParameteri(self.target, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(self.target, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(self.target, gl::TEXTURE_WRAP_R, gl::CLAMP_TO_EDGE as i32);
        }
    }

    fn set_filtering(&self, mipmapped: bool) {
        let min_filter = if mipmapped {
            gl::LINEAR_MIPMAP_LINEAR
        } else {
            gl::LINEAR
        };
        unsafe {
            gl::TexParameteri(self.target, gl::TEXTURE_MIN_FILTER, min_filter as i32);
            gl::TexParameteri(self.target, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}
