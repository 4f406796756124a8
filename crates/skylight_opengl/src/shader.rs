use crate::GlError;
use gl::types::*;
use nalgebra_glm as glm;
use std::{ffi::CString, fs, path::Path, ptr};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    fn name(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Fragment => "fragment",
        }
    }
}

pub struct Shader {
    pub id: GLuint,
    pub kind: ShaderKind,
}

impl Shader {
    pub fn new(kind: ShaderKind) -> Shader {
        let id = unsafe { gl::CreateShader(Shader::map_type(kind)) };
        Self { id, kind }
    }

    fn compile(&self, program: &str, source: &str) -> Result<(), GlError> {
        let source_str = CString::new(source.as_bytes()).map_err(|_| GlError::ShaderCompile {
            program: program.to_string(),
            stage: self.kind.name().to_string(),
            log: "source contains an interior nul byte".to_string(),
        })?;
        unsafe {
            gl::ShaderSource(self.id, 1, &source_str.as_ptr(), ptr::null());
            gl::CompileShader(self.id);
        }
        self.check_compilation(program)
    }

    fn check_compilation(&self, program: &str) -> Result<(), GlError> {
        let mut success = gl::FALSE as GLint;
        unsafe {
            gl::GetShaderiv(self.id, gl::COMPILE_STATUS, &mut success);
        }
        if success == gl::TRUE as GLint {
            return Ok(());
        }
        let mut info_log_length = 0;
        unsafe {
            gl::GetShaderiv(self.id, gl::INFO_LOG_LENGTH, &mut info_log_length);
        }
        let mut info_log = vec![0_u8; info_log_length.max(0) as usize];
        unsafe {
            gl::GetShaderInfoLog(
                self.id,
                info_log_length,
                ptr::null_mut(),
                info_log.as_mut_ptr() as *mut GLchar,
            );
        }
        let log = info_log_to_string(&info_log);
        log::error!(
            "Shader compilation failed for the {} stage of '{}'\n{}",
            self.kind.name(),
            program,
            log
        );
        Err(GlError::ShaderCompile {
            program: program.to_string(),
            stage: self.kind.name().to_string(),
            log,
        })
    }

    fn map_type(shader_type: ShaderKind) -> GLuint {
        match shader_type {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        // Attached shaders are only flagged here, the program keeps them alive.
        unsafe {
            gl::DeleteShader(self.id);
        }
    }
}

/// A uniform location resolved once after linking.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformLocation(GLint);

impl UniformLocation {
    pub fn raw(self) -> GLint {
        self.0
    }
}

pub struct ShaderProgram {
    id: GLuint,
    name: String,
    shaders: Vec<Shader>,
}

impl ShaderProgram {
    pub fn new(name: &str) -> Self {
        Self {
            id: unsafe { gl::CreateProgram() },
            name: name.to_string(),
            shaders: Vec::new(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_shader_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, GlError> {
        self.attach_shader_file(ShaderKind::Vertex, path.as_ref())
    }

    pub fn vertex_shader_source(&mut self, source: &str) -> Result<&mut Self, GlError> {
        self.attach_shader_source(ShaderKind::Vertex, source)
    }

    pub fn fragment_shader_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, GlError> {
        self.attach_shader_file(ShaderKind::Fragment, path.as_ref())
    }

    pub fn fragment_shader_source(&mut self, source: &str) -> Result<&mut Self, GlError> {
        self.attach_shader_source(ShaderKind::Fragment, source)
    }

    pub fn link(&mut self) -> Result<(), GlError> {
        let mut success = gl::FALSE as GLint;
        unsafe {
            gl::LinkProgram(self.id);
            gl::GetProgramiv(self.id, gl::LINK_STATUS, &mut success);
        }
        self.shaders.clear();
        if success == gl::TRUE as GLint {
            return Ok(());
        }

        let mut info_log_length = 0;
        unsafe {
            gl::GetProgramiv(self.id, gl::INFO_LOG_LENGTH, &mut info_log_length);
        }
        let mut info_log = vec![0_u8; info_log_length.max(0) as usize];
        unsafe {
            gl::GetProgramInfoLog(
                self.id,
                info_log_length,
                ptr::null_mut(),
                info_log.as_mut_ptr() as *mut GLchar,
            );
        }
        let log = info_log_to_string(&info_log);
        log::error!("Shader program '{}' failed to link\n{}", self.name, log);
        Err(GlError::ShaderLink {
            program: self.name.clone(),
            log,
        })
    }

    pub fn use_program(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name.as_bytes()).ok()?;
        let location = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };
        if location < 0 {
            None
        } else {
            Some(UniformLocation(location))
        }
    }

    /// Resolves a uniform that the program cannot run without.
    ///
    /// The GLSL compiler strips uniforms that do not contribute to the
    /// output, so an unused declaration is reported here as well.
    pub fn require_uniform(&self, name: &str) -> Result<UniformLocation, GlError> {
        self.uniform_location(name)
            .ok_or_else(|| GlError::ParameterBinding {
                program: self.name.clone(),
                name: name.to_string(),
            })
    }

    pub fn set_uniform_int(&self, location: UniformLocation, value: i32) {
        unsafe {
            gl::Uniform1i(location.0, value);
        }
    }

    pub fn set_uniform_float(&self, location: UniformLocation, value: f32) {
        unsafe {
            gl::Uniform1f(location.0, value);
        }
    }

    pub fn set_uniform_vec3(&self, location: UniformLocation, value: &glm::Vec3) {
        unsafe {
            gl::Uniform3fv(location.0, 1, value.as_ptr());
        }
    }

    pub fn set_uniform_matrix3x3(&self, location: UniformLocation, value: &glm::Mat3) {
        unsafe {
            gl::UniformMatrix3fv(location.0, 1, gl::FALSE, value.as_ptr());
        }
    }

    pub fn set_uniform_matrix4x4(&self, location: UniformLocation, value: &glm::Mat4) {
        unsafe {
            gl::UniformMatrix4fv(location.0, 1, gl::FALSE, value.as_ptr());
        }
    }

    fn attach_shader_file(&mut self, kind: ShaderKind, path: &Path) -> Result<&mut Self, GlError> {
        let source = fs::read_to_string(path).map_err(|error| GlError::ShaderSource {
            path: path.display().to_string(),
            source: error,
        })?;
        self.attach_shader_source(kind, &source)
    }

    fn attach_shader_source(&mut self, kind: ShaderKind, source: &str) -> Result<&mut Self, GlError> {
        let shader = Shader::new(kind);
        shader.compile(&self.name, source)?;
        unsafe {
            gl::AttachShader(self.id, shader.id);
        }
        self.shaders.push(shader);
        Ok(self)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

fn info_log_to_string(info_log: &[u8]) -> String {
    let end = info_log
        .iter()
        .position(|byte| *byte == 0)
        .unwrap_or_else(|| info_log.len());
    String::from_utf8_lossy(&info_log[..end]).trim_end().to_string()
}
