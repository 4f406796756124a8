//! The OpenGL rendition of the pipeline.
//!
//! Every function in here needs a current OpenGL 3.3 context.

mod brdflut;
mod capture;
mod environment;
mod geometry;
mod hdr;
mod irradiance;
mod prefilter;
mod programs;
mod renderer;

pub use self::{
    brdflut::*, capture::*, environment::*, geometry::*, hdr::*, irradiance::*, prefilter::*,
    programs::*, renderer::*,
};
