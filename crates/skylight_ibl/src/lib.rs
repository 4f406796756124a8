mod cube;
mod error;
mod maps;
mod radiance;
mod schedule;
mod settings;
mod shaders;
mod shading;
mod software;
mod views;

pub mod pbr;
pub mod sampling;

pub use self::{
    cube::*, error::*, maps::*, radiance::*, schedule::*, settings::*, shaders::*, shading::*,
    software::*, views::*,
};
