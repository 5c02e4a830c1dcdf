// Polar obstacle histogram module

pub mod polar_histogram;
pub mod transforms;

pub use polar_histogram::*;
pub use transforms::*;
