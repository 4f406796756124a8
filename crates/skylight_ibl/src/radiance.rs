use crate::{sampling::direction_to_equirectangular, DecodeError};
use image::io::Reader as ImageReader;
use log::info;
use nalgebra_glm as glm;
use std::path::Path;

/// A decoded equirectangular panorama of linear RGB radiance.
///
/// Rows are stored bottom up: row 0 is the nadir of the panorama, which
/// matches texture coordinate `v = 0` once uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RadianceImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl RadianceImage {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroDimensions);
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(DecodeError::Truncated {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds an image from a function of the pixel column and row.
    pub fn from_fn(
        width: u32,
        height: u32,
        pixel: impl Fn(u32, u32) -> glm::Vec3,
    ) -> Result<Self, DecodeError> {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                let color = pixel(x, y);
                data.extend_from_slice(&[color.x, color.y, color.z]);
            }
        }
        Self::new(width, height, data)
    }

    pub fn uniform(width: u32, height: u32, color: glm::Vec3) -> Result<Self, DecodeError> {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Decodes any floating point or low dynamic range image the `image`
    /// crate understands, flipping it so the bottom row is stored first.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let image = image.flipv().into_rgb32f();
        let (width, height) = image.dimensions();
        info!(
            "Loaded {}x{} radiance image from '{}'",
            width,
            height,
            path.display()
        );
        Self::new(width, height, image.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> glm::Vec3 {
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        glm::vec3(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        )
    }

    /// Bilinear lookup that wraps horizontally and clamps vertically.
    pub fn sample(&self, uv: &glm::Vec2) -> glm::Vec3 {
        let width = self.width as i64;
        let height = self.height as i64;

        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let column = |offset: i64| (x0 as i64 + offset).rem_euclid(width) as u32;
        let row = |offset: i64| (y0 as i64 + offset).max(0).min(height - 1) as u32;

        let top = glm::lerp(
            &self.pixel(column(0), row(0)),
            &self.pixel(column(1), row(0)),
            fx,
        );
        let bottom = glm::lerp(
            &self.pixel(column(0), row(1)),
            &self.pixel(column(1), row(1)),
            fx,
        );
        glm::lerp(&top, &bottom, fy)
    }

    pub fn sample_direction(&self, direction: &glm::Vec3) -> glm::Vec3 {
        self.sample(&direction_to_equirectangular(direction))
    }
}
