pub use gl;
pub use glutin;

mod buffer;
mod context;
mod error;
mod framebuffer;
mod shader;
mod texture;

pub use self::{buffer::*, context::*, error::*, framebuffer::*, shader::*, texture::*};
