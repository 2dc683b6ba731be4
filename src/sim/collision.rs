//! Pairwise collision detection and response between disks
//!
//! Detection is an exact distance test (optionally with a noisy threshold).
//! Response separates the disks along the centre axis, then exchanges the
//! normal velocity components in a randomly tilted collision frame and damps
//! the result. The randomness is intentional: with jitter enabled, runs with
//! different seeds diverge.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::Particle;
use crate::settings::{Jitter, SimConfig};

/// How overlapping pairs exchange momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionModel {
    /// Separate, swap normal components in the collision frame, damp
    #[default]
    Rotational,
    /// Swap full velocity vectors, no separation or damping
    Exchange,
}

/// Resolution parameters shared by every pair in a tick
#[derive(Debug, Clone, Copy)]
pub struct CollisionParams {
    pub model: CollisionModel,
    pub energy_loss: f32,
    pub jitter: Jitter,
}

impl CollisionParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            model: config.collision_model,
            energy_loss: config.energy_loss,
            jitter: config.jitter,
        }
    }
}

/// Outcome of handling one overlapping pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved,
    /// Centres coincide exactly; no axis to resolve along, pair left as is
    Coincident,
}

/// Per-tick collision counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionStats {
    /// Pairs reported by the broad-phase
    pub candidates: usize,
    /// Pairs that overlapped and were resolved
    pub collisions: usize,
    /// Overlapping pairs skipped because their centres coincide
    pub skipped_coincident: usize,
}

/// Uniform sample in `[-bound, bound]`, no draw when the bound is zero
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, bound: f32) -> f32 {
    if bound > 0.0 {
        rng.random_range(-bound..=bound)
    } else {
        0.0
    }
}

/// True when the disks overlap
///
/// `threshold_jitter` adds a random integer in `[-j, j]` to the contact
/// distance, making the collision boundary deliberately noisy.
pub fn check_collision<R: Rng + ?Sized>(
    a: &Particle,
    b: &Particle,
    threshold_jitter: i32,
    rng: &mut R,
) -> bool {
    let distance = a.pos.distance(b.pos);
    let mut threshold = a.radius + b.radius;
    if threshold_jitter > 0 {
        threshold += rng.random_range(-threshold_jitter..=threshold_jitter) as f32;
    }
    distance < threshold
}

/// Resolve an overlapping pair in place
pub fn handle_collision<R: Rng + ?Sized>(
    a: &mut Particle,
    b: &mut Particle,
    params: &CollisionParams,
    rng: &mut R,
) -> Resolution {
    match params.model {
        CollisionModel::Exchange => {
            std::mem::swap(&mut a.vel, &mut b.vel);
            Resolution::Resolved
        }
        CollisionModel::Rotational => resolve_rotational(a, b, params, rng),
    }
}

fn resolve_rotational<R: Rng + ?Sized>(
    a: &mut Particle,
    b: &mut Particle,
    params: &CollisionParams,
    rng: &mut R,
) -> Resolution {
    let delta = a.pos - b.pos;
    let distance = delta.length();
    if distance == 0.0 {
        return Resolution::Coincident;
    }

    // Half the (negative) overlap each way leaves the pair exactly touching
    let axis = delta / distance;
    let overlap = 0.5 * (distance - a.radius - b.radius);
    a.pos -= axis * overlap;
    b.pos += axis * overlap;

    let angle = delta.y.atan2(delta.x) + jitter(rng, params.jitter.angle);
    let to_local = Vec2::from_angle(-angle);
    let to_world = Vec2::from_angle(angle);

    // x is the collision normal, y the tangent
    let local_a = to_local.rotate(a.vel);
    let local_b = to_local.rotate(b.vel);
    let new_a = Vec2::new(local_b.x, local_a.y);
    let new_b = Vec2::new(local_a.x, local_b.y);

    let factor = params.energy_loss + jitter(rng, params.jitter.energy);
    a.vel = to_world.rotate(new_a) * factor;
    b.vel = to_world.rotate(new_b) * factor;

    Resolution::Resolved
}

/// Mutable references to two distinct slice elements
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> Option<(&mut Particle, &mut Particle)> {
    if i == j || i >= particles.len() || j >= particles.len() {
        return None;
    }
    if i < j {
        let (left, right) = particles.split_at_mut(j);
        Some((&mut left[i], &mut right[0]))
    } else {
        let (left, right) = particles.split_at_mut(i);
        Some((&mut right[0], &mut left[j]))
    }
}

/// Test one candidate pair by index and resolve it if it overlaps
pub fn resolve_pair<R: Rng + ?Sized>(
    particles: &mut [Particle],
    i: usize,
    j: usize,
    params: &CollisionParams,
    rng: &mut R,
    stats: &mut CollisionStats,
) {
    let Some((a, b)) = pair_mut(particles, i, j) else {
        return;
    };
    stats.candidates += 1;
    if !check_collision(a, b, params.jitter.threshold, rng) {
        return;
    }
    match handle_collision(a, b, params, rng) {
        Resolution::Resolved => stats.collisions += 1,
        Resolution::Coincident => {
            log::warn!("Skipping coincident pair ({}, {})", i, j);
            stats.skipped_coincident += 1;
        }
    }
}
