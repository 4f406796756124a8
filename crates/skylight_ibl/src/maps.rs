use crate::CubeFace;
use nalgebra_glm as glm;

/// One square RGB face image, rows stored in increasing `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceImage {
    size: usize,
    pixels: Vec<glm::Vec3>,
}

impl FaceImage {
    pub fn new(size: usize, pixels: Vec<glm::Vec3>) -> Self {
        debug_assert_eq!(pixels.len(), size * size);
        Self { size, pixels }
    }

    /// Evaluates `texel` at every texel center of `face`.
    pub fn from_fn(
        face: CubeFace,
        size: usize,
        mut texel: impl FnMut(&glm::Vec3) -> glm::Vec3,
    ) -> Self {
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let s = (x as f32 + 0.5) / size as f32;
                let t = (y as f32 + 0.5) / size as f32;
                pixels.push(texel(&face.direction(s, t)));
            }
        }
        Self::new(size, pixels)
    }

    /// Reinterprets tightly packed RGB floats, as read back from a texture.
    pub fn from_rgb_floats(size: usize, floats: &[f32]) -> Self {
        let pixels = floats
            .chunks_exact(3)
            .map(|rgb| glm::vec3(rgb[0], rgb[1], rgb[2]))
            .collect();
        Self::new(size, pixels)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn pixels(&self) -> &[glm::Vec3] {
        &self.pixels
    }

    pub fn texel(&self, x: usize, y: usize) -> glm::Vec3 {
        self.pixels[y * self.size + x]
    }

    pub fn to_rgb_floats(&self) -> Vec<f32> {
        self.pixels
            .iter()
            .flat_map(|pixel| vec![pixel.x, pixel.y, pixel.z])
            .collect()
    }

    /// Bilinear lookup at face coordinates, clamped to the face edges.
    pub fn sample(&self, s: f32, t: f32) -> glm::Vec3 {
        let (x0, x1, fx) = bilinear_taps(s, self.size);
        let (y0, y1, fy) = bilinear_taps(t, self.size);
        let bottom = glm::lerp(&self.texel(x0, y0), &self.texel(x1, y0), fx);
        let top = glm::lerp(&self.texel(x0, y1), &self.texel(x1, y1), fx);
        glm::lerp(&bottom, &top, fy)
    }

    /// Box filters to half resolution.
    fn downsample(&self) -> FaceImage {
        let size = (self.size / 2).max(1);
        let last = self.size - 1;
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let (x0, y0) = ((2 * x).min(last), (2 * y).min(last));
                let (x1, y1) = ((2 * x + 1).min(last), (2 * y + 1).min(last));
                let sum = self.texel(x0, y0)
                    + self.texel(x1, y0)
                    + self.texel(x0, y1)
                    + self.texel(x1, y1);
                pixels.push(sum * 0.25);
            }
        }
        FaceImage::new(size, pixels)
    }
}

fn bilinear_taps(coordinate: f32, size: usize) -> (usize, usize, f32) {
    let position = coordinate * size as f32 - 0.5;
    let floor = position.floor();
    let fraction = position - floor;
    let last = size as i64 - 1;
    let clamp = |index: i64| index.max(0).min(last) as usize;
    let index = floor as i64;
    (clamp(index), clamp(index + 1), fraction)
}

/// The six faces of one cube mip level.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeLevel {
    faces: Vec<FaceImage>,
}

impl CubeLevel {
    pub fn new(faces: Vec<FaceImage>) -> Self {
        debug_assert_eq!(faces.len(), 6);
        Self { faces }
    }

    pub fn from_fn(size: usize, mut texel: impl FnMut(&glm::Vec3) -> glm::Vec3) -> Self {
        let faces = CubeFace::ALL
            .iter()
            .map(|face| FaceImage::from_fn(*face, size, &mut texel))
            .collect();
        Self::new(faces)
    }

    pub fn size(&self) -> usize {
        self.faces[0].size()
    }

    pub fn face(&self, face: CubeFace) -> &FaceImage {
        &self.faces[face.index()]
    }

    pub fn sample(&self, direction: &glm::Vec3) -> glm::Vec3 {
        let (face, s, t) = CubeFace::from_direction(direction);
        self.face(face).sample(s, t)
    }

    fn downsample(&self) -> CubeLevel {
        CubeLevel::new(self.faces.iter().map(FaceImage::downsample).collect())
    }
}

/// A CPU side cubemap with an optional mip chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeImage {
    levels: Vec<CubeLevel>,
}

impl CubeImage {
    pub fn new(levels: Vec<CubeLevel>) -> Self {
        debug_assert!(!levels.is_empty());
        Self { levels }
    }

    pub fn from_fn(size: usize, texel: impl FnMut(&glm::Vec3) -> glm::Vec3) -> Self {
        Self::new(vec![CubeLevel::from_fn(size, texel)])
    }

    pub fn resolution(&self) -> usize {
        self.levels[0].size()
    }

    pub fn mip_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> &CubeLevel {
        &self.levels[level]
    }

    pub fn levels(&self) -> &[CubeLevel] {
        &self.levels
    }

    pub fn face(&self, level: usize, face: CubeFace) -> &FaceImage {
        self.levels[level].face(face)
    }

    /// Replaces every level below the base with box filtered copies,
    /// down to `levels` levels in total.
    pub fn generate_mipmaps(&mut self, levels: usize) {
        self.levels.truncate(1);
        while self.levels.len() < levels.max(1) {
            let next = self.levels[self.levels.len() - 1].downsample();
            self.levels.push(next);
        }
    }

    /// Trilinear lookup, `lod` clamped to the available levels.
    pub fn sample(&self, direction: &glm::Vec3, lod: f32) -> glm::Vec3 {
        let max_level = (self.levels.len() - 1) as f32;
        let lod = lod.max(0.0).min(max_level);
        let lower = lod.floor();
        let fraction = lod - lower;
        let color = self.levels[lower as usize].sample(direction);
        if fraction <= 0.0 {
            return color;
        }
        let upper = self.levels[lower as usize + 1].sample(direction);
        glm::lerp(&color, &upper, fraction)
    }

    /// Largest per-channel difference to another cube of the same shape.
    pub fn max_difference(&self, other: &CubeImage) -> f32 {
        self.levels
            .iter()
            .zip(other.levels.iter())
            .flat_map(|(a, b)| a.faces.iter().zip(b.faces.iter()))
            .flat_map(|(a, b)| a.pixels.iter().zip(b.pixels.iter()))
            .map(|(a, b)| glm::comp_max(&glm::abs(&(a - b))))
            .fold(0.0, f32::max)
    }
}

/// The split-sum lookup table, `(scale, bias)` per texel.
///
/// Column `x` holds `n_dot_v = (x + 0.5) / size`, row `y` holds
/// `roughness = (y + 0.5) / size`.
#[derive(Debug, Clone, PartialEq)]
pub struct LutImage {
    size: usize,
    pixels: Vec<glm::Vec2>,
}

impl LutImage {
    pub fn new(size: usize, pixels: Vec<glm::Vec2>) -> Self {
        debug_assert_eq!(pixels.len(), size * size);
        Self { size, pixels }
    }

    pub fn from_fn(size: usize, mut texel: impl FnMut(f32, f32) -> glm::Vec2) -> Self {
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            let roughness = (y as f32 + 0.5) / size as f32;
            for x in 0..size {
                let n_dot_v = (x as f32 + 0.5) / size as f32;
                pixels.push(texel(n_dot_v, roughness));
            }
        }
        Self::new(size, pixels)
    }

    pub fn from_rg_floats(size: usize, floats: &[f32]) -> Self {
        let pixels = floats
            .chunks_exact(2)
            .map(|rg| glm::vec2(rg[0], rg[1]))
            .collect();
        Self::new(size, pixels)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn pixels(&self) -> &[glm::Vec2] {
        &self.pixels
    }

    pub fn texel(&self, x: usize, y: usize) -> glm::Vec2 {
        self.pixels[y * self.size + x]
    }

    /// Bilinear lookup with clamp to edge, as the shading pass reads it.
    pub fn sample(&self, n_dot_v: f32, roughness: f32) -> glm::Vec2 {
        let (x0, x1, fx) = bilinear_taps(n_dot_v, self.size);
        let (y0, y1, fy) = bilinear_taps(roughness, self.size);
        let bottom = glm::lerp(&self.texel(x0, y0), &self.texel(x1, y0), fx);
        let top = glm::lerp(&self.texel(x0, y1), &self.texel(x1, y1), fx);
        glm::lerp(&bottom, &top, fy)
    }

    pub fn max_difference(&self, other: &LutImage) -> f32 {
        self.pixels
            .iter()
            .zip(other.pixels.iter())
            .map(|(a, b)| glm::comp_max(&glm::abs(&(a - b))))
            .fold(0.0, f32::max)
    }
}
