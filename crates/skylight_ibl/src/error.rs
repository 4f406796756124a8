use crate::Stage;
use skylight_opengl::GlError;
use thiserror::Error;

pub type Result<T, E = IblError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read radiance image")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode radiance image")]
    Image(#[from] image::ImageError),

    #[error("Radiance image has zero width or height")]
    ZeroDimensions,

    #[error("Radiance buffer holds {actual} floats but a {width}x{height} image needs {expected}")]
    Truncated {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug)]
pub enum IblError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Gl(#[from] GlError),

    #[error("Invalid precompute settings: {0}")]
    InvalidSettings(String),

    #[error("Precompute aborted during the {stage} stage")]
    PrecomputeAborted {
        stage: Stage,
        #[source]
        source: Box<IblError>,
    },
}

impl IblError {
    pub fn aborted(stage: Stage, error: impl Into<IblError>) -> Self {
        IblError::PrecomputeAborted {
            stage,
            source: Box::new(error.into()),
        }
    }

    /// The stage a precompute run stopped at, if it was aborted.
    pub fn aborted_stage(&self) -> Option<Stage> {
        match self {
            IblError::PrecomputeAborted { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
