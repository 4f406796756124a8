use anyhow::{anyhow, Result};
use glutin::{
    dpi::PhysicalSize, event_loop::EventLoop, Api, Context, ContextBuilder, GlProfile, GlRequest,
    PossiblyCurrent,
};

/// An offscreen OpenGL 3.3 core context made current on the calling thread.
pub struct HeadlessContext {
    context: Context<PossiblyCurrent>,
    _event_loop: EventLoop<()>,
}

impl HeadlessContext {
    pub fn context(&self) -> &Context<PossiblyCurrent> {
        &self.context
    }
}

pub fn load_headless_context() -> Result<HeadlessContext> {
    let event_loop = EventLoop::new();
    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
        .with_gl_profile(GlProfile::Core)
        .build_headless(&event_loop, PhysicalSize::new(1, 1))?;

    let context = unsafe { context.make_current() }.map_err(|(_, error)| anyhow!("{}", error))?;

    gl::load_with(|symbol| context.get_proc_address(symbol) as *const _);

    unsafe {
        gl::Enable(gl::TEXTURE_CUBE_MAP_SEAMLESS);
        gl::Enable(gl::DEPTH_TEST);
        gl::DepthFunc(gl::LEQUAL);
    }

    Ok(HeadlessContext {
        context,
        _event_loop: event_loop,
    })
}
