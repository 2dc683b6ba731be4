//! Simulation module
//!
//! Physics and broad-phase for a box of moving disks. Nothing here renders or
//! touches the platform:
//! - Fixed step (one tick = one unit of time)
//! - Seeded RNG only, owned by the world
//! - Stable iteration order (particle index, broad-phase insertion order)

pub mod broad_phase;
pub mod collision;
pub mod grid;
pub mod particle;
pub mod quadtree;
pub mod rect;
pub mod render;
pub mod snapshot;
pub mod world;

pub use broad_phase::{BroadPhase, BroadPhaseKind, BruteForce};
pub use collision::{
    CollisionModel, CollisionParams, CollisionStats, Resolution, check_collision,
    handle_collision, resolve_pair,
};
pub use grid::UniformGrid;
pub use particle::Particle;
pub use quadtree::Quadtree;
pub use rect::Rect;
pub use render::{
    FixedRatePacer, InputSource, Pacer, Renderer, RunSummary, StatsRenderer,
    TickLimit, Unpaced, run,
};
pub use snapshot::{RngState, Snapshot};
pub use world::{World, spawn_layout, spawn_two_body};
