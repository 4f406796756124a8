use anyhow::{Context, Result};
use image::{ImageBuffer, Rgb};
use log::{debug, info};
use skylight_ibl::{BakedEnvironment, CubeFace, CubeImage, FaceImage, LutImage};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Writes every face and mip of the baked maps as OpenEXR files into `directory`.
pub fn export_environment(baked: &BakedEnvironment, directory: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(directory).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            directory.display()
        )
    })?;

    let mut written = Vec::new();
    for face in CubeFace::ALL.iter().copied() {
        let path = directory.join(format!("environment_{}.exr", face.label()));
        save_face(baked.environment.face(0, face), &path)?;
        written.push(path);

        let path = directory.join(format!("irradiance_{}.exr", face.label()));
        save_face(baked.irradiance.face(0, face), &path)?;
        written.push(path);
    }
    written.extend(export_prefiltered(&baked.prefiltered, directory)?);

    let path = directory.join("brdf_lut.exr");
    save_lut(&baked.brdf_lut, &path)?;
    written.push(path);

    info!("Wrote {} images to {}", written.len(), directory.display());
    Ok(written)
}

fn export_prefiltered(prefiltered: &CubeImage, directory: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for mip_level in 0..prefiltered.mip_levels() {
        for face in CubeFace::ALL.iter().copied() {
            let path = directory.join(format!(
                "prefiltered_mip{}_{}.exr",
                mip_level,
                face.label()
            ));
            save_face(prefiltered.face(mip_level, face), &path)?;
            written.push(path);
        }
    }
    Ok(written)
}

// Rows are written in storage order, so the first row of a side face is its top.
fn save_face(image: &FaceImage, path: &Path) -> Result<()> {
    let size = image.size() as u32;
    save_rgb(size, size, image.to_rgb_floats(), path)
}

// The two coefficients go to red and green, blue stays empty.
fn save_lut(lut: &LutImage, path: &Path) -> Result<()> {
    let size = lut.size() as u32;
    let floats = lut
        .pixels()
        .iter()
        .flat_map(|texel| vec![texel.x, texel.y, 0.0])
        .collect();
    save_rgb(size, size, floats, path)
}

fn save_rgb(width: u32, height: u32, floats: Vec<f32>, path: &Path) -> Result<()> {
    let buffer = ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(width, height, floats)
        .with_context(|| format!("Pixel buffer does not match a {}x{} image", width, height))?;
    buffer
        .save(path)
        .with_context(|| format!("Failed to write image: {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;
    use skylight_ibl::{PrecomputeSettings, RadianceImage, SoftwareBaker};

    fn tiny_bake() -> Result<BakedEnvironment> {
        let settings = PrecomputeSettings {
            environment_resolution: 4,
            irradiance_resolution: 2,
            prefilter_resolution: 4,
            prefilter_mip_levels: 2,
            brdf_lut_resolution: 4,
            irradiance_sample_delta: 0.5,
            prefilter_sample_count: 8,
            brdf_sample_count: 8,
        };
        let radiance = RadianceImage::uniform(8, 4, glm::vec3(0.25, 0.5, 1.0))?;
        Ok(SoftwareBaker::new(settings)?.bake(&radiance)?)
    }

    #[test]
    fn writes_every_face_and_mip() -> Result<()> {
        let directory = std::env::temp_dir().join(format!("skylight_export_{}", std::process::id()));
        let result = export_environment(&tiny_bake()?, &directory);
        let names = result.as_ref().map(|paths| {
            paths
                .iter()
                .filter_map(|path| path.file_name())
                .map(|name| name.to_string_lossy().to_string())
                .collect::<Vec<_>>()
        });
        let _ = fs::remove_dir_all(&directory);

        let names = names.map_err(|error| anyhow::anyhow!("{:#}", error))?;
        assert_eq!(names.len(), 6 + 6 + 2 * 6 + 1);
        assert!(names.contains(&"environment_px.exr".to_string()));
        assert!(names.contains(&"irradiance_nz.exr".to_string()));
        assert!(names.contains(&"prefiltered_mip1_py.exr".to_string()));
        assert!(names.contains(&"brdf_lut.exr".to_string()));
        Ok(())
    }

    #[test]
    fn face_values_survive_the_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("skylight_face_{}.exr", std::process::id()));
        let face = FaceImage::from_fn(CubeFace::PositiveX, 2, |direction| direction.abs());
        save_face(&face, &path)?;
        let decoded = image::open(&path);
        let _ = fs::remove_file(&path);

        let decoded = decoded?.into_rgb32f();
        let floats = decoded.into_raw();
        let expected = face.to_rgb_floats();
        assert_eq!(floats.len(), expected.len());
        for (a, b) in floats.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn rejects_mismatched_buffers() {
        let path = std::env::temp_dir().join("skylight_mismatch.exr");
        assert!(save_rgb(2, 2, vec![0.0; 11], &path).is_err());
        assert!(!path.exists());
    }
}
