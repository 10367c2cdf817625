mod controls;
mod params;
mod prism;
mod trace;

pub use controls::*;
pub use params::*;
pub use prism::*;
pub use trace::*;

pub use refract;

use refract::{
    nalgebra::{Unit, Vector2},
    *,
};
