use crate::{pbr::CaptureProgram, CubeFace, CubePass, CAPTURE_VIEWS};
use log::debug;
use skylight_opengl::{
    gl, Framebuffer, GeometryBuffer, GlError, Renderbuffer, Texture, CUBEMAP_FACE_TARGETS,
};

/// The one offscreen target every precompute stage renders through.
///
/// The depth attachment is resized per pass, the color attachment is
/// rebound per face or mip. Callers never rely on attachments left over
/// from an earlier pass.
pub struct CaptureTarget {
    framebuffer: Framebuffer,
    depth: Renderbuffer,
}

impl CaptureTarget {
    pub fn new() -> Self {
        let framebuffer = Framebuffer::new();
        let mut depth = Renderbuffer::new();
        depth.allocate_depth(1, 1);
        framebuffer.attach_depth_renderbuffer(&depth);
        Framebuffer::bind_default_framebuffer();
        Self { framebuffer, depth }
    }

    pub fn depth_dimensions(&self) -> (u32, u32) {
        self.depth.dimensions()
    }

    /// Reallocates depth storage, keeping the framebuffer object.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.depth.dimensions() == (width, height) {
            return;
        }
        debug!("Resizing capture depth attachment to {}x{}", width, height);
        self.depth.allocate_depth(width, height);
    }

    pub fn attach_color_face(&self, texture: &Texture, face: CubeFace, mip_level: u32) {
        self.framebuffer
            .attach_color_texture(texture, CUBEMAP_FACE_TARGETS[face.index()], mip_level);
    }

    pub fn attach_color_2d(&self, texture: &Texture, mip_level: u32) {
        self.framebuffer
            .attach_color_texture(texture, gl::TEXTURE_2D, mip_level);
    }

    /// Renders `cube` into all six faces of `destination` at the pass's mip
    /// level. The program must already carry its non-view parameters.
    pub fn render_cube_pass(
        &mut self,
        pass: &CubePass,
        program: &impl CaptureProgram,
        cube: &GeometryBuffer,
        destination: &Texture,
    ) -> Result<(), GlError> {
        self.framebuffer.bind();
        self.resize(pass.resolution, pass.resolution);
        set_viewport(pass.resolution, pass.resolution);
        program.program().use_program();

        for face in pass.faces() {
            self.attach_color_face(destination, face, pass.mip_level);
            self.framebuffer.check_status()?;
            program.set_view_projection(&CAPTURE_VIEWS.projection, CAPTURE_VIEWS.view(face));
            clear();
            cube.draw();
        }
        Ok(())
    }

    /// Renders a full screen quad into level 0 of a square 2D texture.
    pub fn render_fullscreen(
        &mut self,
        quad: &GeometryBuffer,
        destination: &Texture,
    ) -> Result<(), GlError> {
        let size = destination.width();
        self.framebuffer.bind();
        self.resize(size, size);
        set_viewport(size, size);
        self.attach_color_2d(destination, 0);
        self.framebuffer.check_status()?;
        clear();
        quad.draw();
        Ok(())
    }

    pub fn release(&self) {
        Framebuffer::bind_default_framebuffer();
    }
}

impl Default for CaptureTarget {
    fn default() -> Self {
        Self::new()
    }
}

fn set_viewport(width: u32, height: u32) {
    unsafe {
        gl::Viewport(0, 0, width as i32, height as i32);
    }
}

fn clear() {
    unsafe {
        gl::ClearColor(0.0, 0.0, 0.0, 1.0);
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
}
