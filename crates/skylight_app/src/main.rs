#![warn(
    clippy::all,
    clippy::cognitive_complexity,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::if_not_else,
    clippy::inefficient_to_string,
    clippy::needless_borrow,
    clippy::todo,
    clippy::too_many_lines,
    clippy::unreachable,
    clippy::unused_self,
    clippy::use_self,
    clippy::wildcard_dependencies
)]

mod export;
mod logger;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use export::export_environment;
use log::info;
use logger::create_logger;
use settings::{Backend, Settings};
use skylight_ibl::{pbr::IblRenderer, BakedEnvironment, ShaderLibrary, SoftwareBaker};
use skylight_opengl::load_headless_context;
use std::path::PathBuf;

/// Bakes image based lighting maps from an equirectangular panorama.
#[derive(Parser, Debug)]
#[command(name = "skylight", version)]
struct Arguments {
    /// Panorama to bake. Overrides the settings file.
    input: Option<PathBuf>,

    /// Directory the baked maps are written to.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Directory holding shader stage files to use instead of the built in ones.
    #[arg(long)]
    shaders: Option<PathBuf>,

    /// Settings file, generated with defaults when missing.
    #[arg(long, default_value = Settings::SETTINGS_FILE)]
    settings: PathBuf,
}

impl Arguments {
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(input) = self.input {
            settings.input = input;
        }
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(backend) = self.backend {
            settings.backend = backend;
        }
        if let Some(shaders) = self.shaders {
            settings.shader_directory = Some(shaders);
        }
        settings
    }
}

fn main() -> Result<()> {
    create_logger()?;
    let arguments = Arguments::parse();
    let settings = Settings::load_or_generate(&arguments.settings)
        .with_context(|| format!("Failed to load settings: {}", arguments.settings.display()))?;
    let settings = arguments.apply(settings);

    info!(
        "Baking '{}' with the {:?} backend",
        settings.input.display(),
        settings.backend
    );
    let baked = match settings.backend {
        Backend::Software => bake_software(&settings)?,
        Backend::Opengl => bake_opengl(&settings)?,
    };
    export_environment(&baked, &settings.output)?;
    Ok(())
}

fn bake_software(settings: &Settings) -> Result<BakedEnvironment> {
    let mut baker = SoftwareBaker::new(settings.precompute.clone())?;
    let baked = baker
        .bake_file(&settings.input)
        .with_context(|| format!("Failed to bake {}", settings.input.display()))?;
    Ok(baked)
}

fn bake_opengl(settings: &Settings) -> Result<BakedEnvironment> {
    let _context = load_headless_context()?;
    let library = match settings.shader_directory.as_ref() {
        Some(directory) => ShaderLibrary::Directory(directory.clone()),
        None => ShaderLibrary::Embedded,
    };
    let mut renderer = IblRenderer::new(settings.precompute.clone(), library)?;
    renderer
        .precompute(&settings.input)
        .with_context(|| format!("Failed to bake {}", settings.input.display()))?;
    renderer
        .download()
        .context("The renderer holds no lighting maps after a successful precompute")
}
