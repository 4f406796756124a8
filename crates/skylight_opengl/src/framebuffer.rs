use crate::{GlError, Texture};
use gl::types::*;

#[derive(Debug)]
pub struct Renderbuffer {
    id: GLuint,
    width: u32,
    height: u32,
}

impl Renderbuffer {
    pub fn new() -> Self {
        let mut id = 0;
        unsafe {
            gl::GenRenderbuffers(1, &mut id);
        }
        Self {
            id,
            width: 0,
            height: 0,
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reallocates the storage. The renderbuffer object itself is kept.
    pub fn allocate_depth(&mut self, width: u32, height: u32) {
        unsafe {
            gl::BindRenderbuffer(gl::RENDERBUFFER, self.id);
            gl::RenderbufferStorage(
                gl::RENDERBUFFER,
                gl::DEPTH_COMPONENT24,
                width as i32,
                height as i32,
            );
            gl::BindRenderbuffer(gl::RENDERBUFFER, 0);
        }
        self.width = width;
        self.height = height;
    }
}

impl Default for Renderbuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Renderbuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteRenderbuffers(1, &self.id);
        }
    }
}

#[derive(Debug)]
pub struct Framebuffer {
    id: GLuint,
}

impl Framebuffer {
    pub fn new() -> Self {
        let mut id = 0;
        unsafe {
            gl::GenFramebuffers(1, &mut id);
        }
        Self { id }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.id);
        }
    }

    pub fn bind_default_framebuffer() {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }
    }

    pub fn attach_depth_renderbuffer(&self, renderbuffer: &Renderbuffer) {
        self.bind();
        unsafe {
            gl::FramebufferRenderbuffer(
                gl::FRAMEBUFFER,
                gl::DEPTH_ATTACHMENT,
                gl::RENDERBUFFER,
                renderbuffer.id(),
            );
        }
    }

    /// Attaches one image of `texture` as the color target.
    ///
    /// `image_target` is `TEXTURE_2D` or a cubemap face target.
    pub fn attach_color_texture(&self, texture: &Texture, image_target: GLenum, level: u32) {
        self.bind();
        unsafe {
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0,
                image_target,
                texture.id(),
                level as i32,
            );
        }
    }

    pub fn check_status(&self) -> Result<(), GlError> {
        self.bind();
        let status = unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) };
        if status == gl::FRAMEBUFFER_COMPLETE {
            Ok(())
        } else {
            Err(GlError::IncompleteFramebuffer { status })
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteFramebuffers(1, &self.id);
        }
    }
}
