pub mod ibl {
    pub use skylight_ibl::*;
}

pub mod opengl {
    pub use skylight_opengl::*;
}
