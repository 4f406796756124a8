use anyhow::Result;
use nalgebra_glm as glm;
use skylight_ibl::{
    sampling::direction_to_equirectangular, shade_pbr, BakedEnvironment, CubeFace,
    MaterialParameters, PrecomputeSettings, RadianceImage, SoftwareBaker,
};

const PANORAMA_WIDTH: u32 = 64;
const PANORAMA_HEIGHT: u32 = 32;

fn small_settings() -> PrecomputeSettings {
    PrecomputeSettings {
        environment_resolution: 16,
        irradiance_resolution: 4,
        prefilter_resolution: 16,
        prefilter_mip_levels: 5,
        brdf_lut_resolution: 16,
        irradiance_sample_delta: 0.25,
        prefilter_sample_count: 64,
        brdf_sample_count: 64,
    }
}

/// A panorama whose red and green channels hold the texture coordinate of each pixel.
fn coordinate_panorama() -> Result<RadianceImage> {
    Ok(RadianceImage::from_fn(
        PANORAMA_WIDTH,
        PANORAMA_HEIGHT,
        |x, y| {
            glm::vec3(
                (x as f32 + 0.5) / PANORAMA_WIDTH as f32,
                (y as f32 + 0.5) / PANORAMA_HEIGHT as f32,
                0.0,
            )
        },
    )?)
}

fn texel_direction(face: CubeFace, size: usize, x: usize, y: usize) -> glm::Vec3 {
    face.direction(
        (x as f32 + 0.5) / size as f32,
        (y as f32 + 0.5) / size as f32,
    )
}

#[test]
fn environment_faces_sample_the_matching_panorama_texel() -> Result<()> {
    let mut baker = SoftwareBaker::new(small_settings())?;
    let baked = baker.bake(&coordinate_panorama()?)?;

    let size = baked.environment.resolution();
    let texel_u = 1.0 / PANORAMA_WIDTH as f32;
    let texel_v = 1.0 / PANORAMA_HEIGHT as f32;
    let mut checked = 0;
    for face in CubeFace::ALL.iter().copied() {
        let image = baked.environment.face(0, face);
        for y in 0..size {
            for x in 0..size {
                let expected = direction_to_equirectangular(&texel_direction(face, size, x, y));
                // Bilinear filtering blends across the horizontal seam.
                if expected.x < 2.0 * texel_u || expected.x > 1.0 - 2.0 * texel_u {
                    continue;
                }
                let color = image.texel(x, y);
                assert!(
                    (color.x - expected.x).abs() <= texel_u + 1e-5,
                    "{:?} ({}, {}): u {} != {}",
                    face,
                    x,
                    y,
                    color.x,
                    expected.x
                );
                assert!(
                    (color.y - expected.y).abs() <= texel_v + 1e-5,
                    "{:?} ({}, {}): v {} != {}",
                    face,
                    x,
                    y,
                    color.y,
                    expected.y
                );
                checked += 1;
            }
        }
    }
    assert!(checked > 6 * size * size / 2);
    Ok(())
}

#[test]
fn constant_panorama_has_constant_irradiance() -> Result<()> {
    let color = glm::vec3(0.3, 0.6, 0.9);
    let mut baker = SoftwareBaker::new(small_settings())?;
    let baked = baker.bake(&RadianceImage::uniform(32, 16, color)?)?;

    for face in CubeFace::ALL.iter().copied() {
        for texel in baked.irradiance.face(0, face).pixels() {
            assert!(
                glm::comp_max(&glm::abs(&(texel - color))) < 1e-4,
                "{:?}: {:?}",
                face,
                texel
            );
        }
    }
    Ok(())
}

#[test]
fn smoothest_prefilter_level_matches_the_environment() -> Result<()> {
    let mut baker = SoftwareBaker::new(small_settings())?;
    let baked = baker.bake(&coordinate_panorama()?)?;

    let size = baked.prefiltered.resolution();
    for face in CubeFace::ALL.iter().copied() {
        let image = baked.prefiltered.face(0, face);
        for y in 0..size {
            for x in 0..size {
                let direction = texel_direction(face, size, x, y);
                let expected = baked.environment.sample(&direction, 0.0);
                let difference = glm::comp_max(&glm::abs(&(image.texel(x, y) - expected)));
                assert!(difference < 1e-4, "{:?} ({}, {}) off by {}", face, x, y, difference);
            }
        }
    }
    Ok(())
}

#[test]
fn lookup_table_ignores_the_panorama() -> Result<()> {
    let mut bright = SoftwareBaker::new(small_settings())?;
    let mut dark = SoftwareBaker::new(small_settings())?;
    let first = bright.bake(&coordinate_panorama()?)?;
    let second = dark.bake(&RadianceImage::uniform(8, 4, glm::vec3(0.01, 0.0, 0.0))?)?;
    assert_eq!(first.brdf_lut.max_difference(&second.brdf_lut), 0.0);
    Ok(())
}

#[test]
fn baking_is_idempotent() -> Result<()> {
    let radiance = coordinate_panorama()?;
    let mut baker = SoftwareBaker::new(small_settings())?;
    let first = baker.bake(&radiance)?;
    let second = baker.bake(&radiance)?;
    let fresh = SoftwareBaker::new(small_settings())?.bake(&radiance)?;

    assert_eq!(first, second);
    assert_eq!(first, fresh);
    Ok(())
}

fn white_bake() -> Result<BakedEnvironment> {
    let mut baker = SoftwareBaker::new(small_settings())?;
    Ok(baker.bake(&RadianceImage::uniform(37, 11, glm::vec3(1.0, 1.0, 1.0))?)?)
}

fn furnace(
    baked: &BakedEnvironment,
    roughness: f32,
    metalness: f32,
    n_dot_v: f32,
) -> glm::Vec3 {
    let normal = glm::vec3(0.0, 0.0, 1.0);
    let view = glm::vec3((1.0 - n_dot_v * n_dot_v).sqrt(), 0.0, n_dot_v);
    let material = MaterialParameters {
        albedo: glm::vec3(1.0, 1.0, 1.0),
        roughness,
        metalness,
        ..Default::default()
    };
    shade_pbr(baked, &material, &normal, &view)
}

fn assert_near_unity(color: &glm::Vec3, roughness: f32, metalness: f32, n_dot_v: f32) {
    for channel in color.iter() {
        assert!(
            (0.9..=1.05).contains(channel),
            "roughness {} metalness {} n_dot_v {}: {:?}",
            roughness,
            metalness,
            n_dot_v,
            color
        );
    }
}

#[test]
fn white_panorama_bakes_white_maps() -> Result<()> {
    let baked = white_bake()?;
    let white = glm::vec3(1.0, 1.0, 1.0);
    assert_eq!(baked.prefiltered.mip_levels(), 5);
    for (name, cube) in [("environment", &baked.environment), ("prefiltered", &baked.prefiltered)]
        .iter()
    {
        for (level, texels) in cube.levels().iter().enumerate() {
            for face in CubeFace::ALL.iter().copied() {
                for texel in texels.face(face).pixels() {
                    let difference = glm::comp_max(&glm::abs(&(texel - white)));
                    assert!(
                        difference < 1e-5,
                        "{} mip {} {:?}: {:?}",
                        name,
                        level,
                        face,
                        texel
                    );
                }
            }
        }
    }
    Ok(())
}

#[test]
fn white_furnace_stays_near_unity() -> Result<()> {
    let baked = white_bake()?;
    for roughness in [0.0_f32, 0.25, 0.5, 0.75, 1.0].iter().copied() {
        for n_dot_v in [1.0_f32, 0.7, 0.5].iter().copied() {
            let color = furnace(&baked, roughness, 0.0, n_dot_v);
            assert_near_unity(&color, roughness, 0.0, n_dot_v);
        }
    }
    Ok(())
}

#[test]
fn white_furnace_holds_across_metalness() -> Result<()> {
    let baked = white_bake()?;
    for roughness in [0.0_f32, 0.25].iter().copied() {
        for metalness in [0.0_f32, 0.5, 1.0].iter().copied() {
            let color = furnace(&baked, roughness, metalness, 1.0);
            assert_near_unity(&color, roughness, metalness, 1.0);
        }
    }
    Ok(())
}

#[test]
fn metalness_blends_dielectric_and_metal_linearly() -> Result<()> {
    let baked = white_bake()?;
    for roughness in [0.0_f32, 0.5, 1.0].iter().copied() {
        let dielectric = furnace(&baked, roughness, 0.0, 1.0);
        let metal = furnace(&baked, roughness, 1.0, 1.0);
        let halfway = furnace(&baked, roughness, 0.5, 1.0);
        let expected = (dielectric + metal) * 0.5;
        assert!(
            glm::comp_max(&glm::abs(&(halfway - expected))) < 1e-5,
            "roughness {}: {:?} != {:?}",
            roughness,
            halfway,
            expected
        );
    }
    Ok(())
}

#[test]
fn baked_file_matches_baked_buffer() -> Result<()> {
    use image::{codecs::hdr::HdrEncoder, Rgb};
    use std::fs::File;

    let path = std::env::temp_dir().join(format!("skylight_bake_{}.hdr", std::process::id()));
    let pixels = (0..16 * 8)
        .map(|index| Rgb([(index % 16) as f32 / 16.0, 0.5, 2.0]))
        .collect::<Vec<_>>();
    HdrEncoder::new(File::create(&path)?).encode(&pixels, 16, 8)?;

    let mut baker = SoftwareBaker::new(small_settings())?;
    let from_file = baker.bake_file(&path);
    let radiance = RadianceImage::load(&path);
    std::fs::remove_file(&path)?;

    let from_buffer = baker.bake(&radiance?)?;
    assert_eq!(from_file?, from_buffer);
    Ok(())
}
