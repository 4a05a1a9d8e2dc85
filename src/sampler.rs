//! Random placement helpers.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

/// Uniformly distributed point inside a disc of `radius` centered on the origin.
/// The radial draw is square-rooted so density is uniform over the area.
pub fn sample_disc(rng: &mut impl Rng, radius: f32) -> Vec2 {
    let r = radius * rng.gen::<f32>().sqrt();
    let theta = TAU * rng.gen::<f32>();
    Vec2::new(r * theta.cos(), r * theta.sin())
}
