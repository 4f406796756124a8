//! Handles loading, serialization, deserialization, and generation of the settings file
use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use skylight_ibl::PrecomputeSettings;
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Bake on the CPU, no graphics context required.
    Software,
    /// Bake with the OpenGL programs in a headless context.
    Opengl,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Software
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub backend: Backend,

    /// Loads shader stages from this directory instead of the built in sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shader_directory: Option<PathBuf>,

    pub precompute: PrecomputeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("assets/hdr/panorama.hdr"),
            output: PathBuf::from("baked"),
            backend: Backend::default(),
            shader_directory: None,
            precompute: PrecomputeSettings::default(),
        }
    }
}

impl Settings {
    pub const SETTINGS_FILE: &'static str = "settings.toml";

    pub fn load_or_generate(settings_path: &Path) -> Result<Self> {
        if !settings_path.exists() {
            Settings::generate_settings_file(settings_path)?;
        }
        let settings = Settings::from_path(settings_path)?;
        Ok(settings)
    }

    pub fn from_path<P: AsRef<Path> + Into<PathBuf>>(path: P) -> Result<Settings> {
        let path_str = path.as_ref().display().to_string();
        debug!("Loading settings file: {}", &path_str);
        let mut config = config::Config::default();
        let config_file = config::File::with_name(&path_str);
        config.merge(config_file)?;
        let settings: Settings = config.try_into()?;
        Ok(settings)
    }

    pub fn generate_settings_file<P: AsRef<Path> + Into<PathBuf> + Copy>(path: P) -> Result<()> {
        let settings = Self::default();
        let toml = toml::to_string(&settings)?;

        let mut file = File::create(&path)?;
        file.write_all(toml.as_bytes())?;

        debug!(
            "Generated settings file: {}",
            path_str = path.as_ref().display().to_string()
        );

        Ok(())
    }
}
