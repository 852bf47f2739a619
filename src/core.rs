use nalgebra::{Matrix3, Point3, Vector3};

mod connectivity;
mod hierarchy;
mod inference;
mod molecule;
mod naming;
mod particle_system;
mod periodic_box;
mod providers;
mod topology;

pub use {
    connectivity::*, hierarchy::*, inference::*, molecule::*, naming::*, particle_system::*,
    periodic_box::*, providers::*, topology::*,
};

pub type Vector3f = Vector3<f32>;
pub type Matrix3f = Matrix3<f32>;
pub type Pos = Point3<f32>;
