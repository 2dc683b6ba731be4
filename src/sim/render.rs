//! Frame loop collaborators
//!
//! The simulation only hands circles to a [`Renderer`], polls an
//! [`InputSource`] for a quit request and lets a [`Pacer`] cap the tick rate.
//! Headless implementations live here; a windowed frontend supplies its own.

use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;

use super::collision::CollisionStats;
use super::world::World;

pub trait Renderer {
    fn begin_frame(&mut self) {}
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: u32);
    fn end_frame(&mut self) {}
}

pub trait InputSource {
    /// Polled once per tick; `true` ends the run loop
    fn quit_requested(&mut self) -> bool;
}

pub trait Pacer {
    /// Block until the next tick may start
    fn wait(&mut self);
}

/// Counts draw calls and tracks the extent of the last frame
#[derive(Debug, Default)]
pub struct StatsRenderer {
    pub frames: u64,
    pub circles_last_frame: usize,
    /// Smallest and largest circle extents of the last frame
    pub min: Vec2,
    pub max: Vec2,
}

impl Renderer for StatsRenderer {
    fn begin_frame(&mut self) {
        self.circles_last_frame = 0;
        self.min = Vec2::splat(f32::INFINITY);
        self.max = Vec2::splat(f32::NEG_INFINITY);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, _color: u32) {
        self.circles_last_frame += 1;
        self.min = self.min.min(center - radius);
        self.max = self.max.max(center + radius);
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

/// Requests quit after a fixed number of polls (`None` never quits)
#[derive(Debug, Clone)]
pub struct TickLimit {
    remaining: Option<u64>,
}

impl TickLimit {
    pub fn new(ticks: Option<u64>) -> Self {
        Self { remaining: ticks }
    }
}

impl InputSource for TickLimit {
    fn quit_requested(&mut self) -> bool {
        match self.remaining.as_mut() {
            Some(0) => true,
            Some(n) => {
                *n -= 1;
                false
            }
            None => false,
        }
    }
}

/// Sleeps off whatever remains of each tick period
#[derive(Debug, Clone)]
pub struct FixedRatePacer {
    period: Duration,
    last: Option<Instant>,
}

impl FixedRatePacer {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / ticks_per_second.max(1),
            last: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Pacer for FixedRatePacer {
    fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                thread::sleep(self.period - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Runs as fast as possible
#[derive(Debug, Default, Clone, Copy)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn wait(&mut self) {}
}

/// Totals over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub candidates: u64,
    pub collisions: u64,
    pub skipped_coincident: u64,
}

impl RunSummary {
    fn add(&mut self, stats: &CollisionStats) {
        self.ticks += 1;
        self.candidates += stats.candidates as u64;
        self.collisions += stats.collisions as u64;
        self.skipped_coincident += stats.skipped_coincident as u64;
    }
}

/// Poll input, tick, render, pace; until input asks to quit
///
/// `on_tick` sees the world after each rendered tick.
pub fn run(
    world: &mut World,
    renderer: &mut impl Renderer,
    input: &mut impl InputSource,
    pacer: &mut impl Pacer,
    mut on_tick: impl FnMut(&World, &CollisionStats),
) -> RunSummary {
    let mut summary = RunSummary::default();
    while !input.quit_requested() {
        let stats = world.tick();
        summary.add(&stats);
        world.render(renderer);
        on_tick(world, &stats);
        pacer.wait();
    }
    log::info!(
        "Run finished after {} ticks ({} collisions)",
        summary.ticks,
        summary.collisions
    );
    summary
}
