use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlError {
    #[error("Failed to read shader source '{path}'")]
    ShaderSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compile {stage} stage of shader program '{program}':\n{log}")]
    ShaderCompile {
        program: String,
        stage: String,
        log: String,
    },

    #[error("Failed to link shader program '{program}':\n{log}")]
    ShaderLink { program: String, log: String },

    #[error("Shader program '{program}' has no active uniform named '{name}'")]
    ParameterBinding { program: String, name: String },

    #[error("Framebuffer is incomplete (status 0x{status:X})")]
    IncompleteFramebuffer { status: u32 },
}
