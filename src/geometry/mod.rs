//! Module to manage route geometry: geographic points, the local planar
//! projection, and polyline simplification.

pub mod point;
pub mod projection;
pub mod simplify;
