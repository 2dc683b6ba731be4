//! Broad-phase collision culling
//!
//! A broad-phase is rebuilt from the particle positions once per tick and then
//! asked for the pairs worth an exact overlap test. Pairs are particle indices
//! into the slice passed to `rebuild`; a pair may be reported more than once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grid::UniformGrid;
use super::particle::Particle;
use super::quadtree::Quadtree;
use super::rect::Rect;
use crate::settings::SimConfig;

pub trait BroadPhase {
    fn name(&self) -> &'static str;

    /// Rebuild from scratch for the current positions
    fn rebuild(&mut self, particles: &[Particle]);

    /// Append candidate pairs for the last rebuild
    fn candidate_pairs(&self, pairs: &mut Vec<(usize, usize)>);
}

/// Tests every unordered pair exactly once
#[derive(Debug, Clone, Default)]
pub struct BruteForce {
    count: usize,
}

impl BroadPhase for BruteForce {
    fn name(&self) -> &'static str {
        "brute_force"
    }

    fn rebuild(&mut self, particles: &[Particle]) {
        self.count = particles.len();
    }

    fn candidate_pairs(&self, pairs: &mut Vec<(usize, usize)>) {
        for i in 0..self.count {
            for j in i + 1..self.count {
                pairs.push((i, j));
            }
        }
    }
}

/// Which broad-phase a world is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhaseKind {
    #[default]
    Quadtree,
    UniformGrid,
    BruteForce,
}

impl BroadPhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadPhaseKind::Quadtree => "quadtree",
            BroadPhaseKind::UniformGrid => "uniform_grid",
            BroadPhaseKind::BruteForce => "brute_force",
        }
    }

    pub fn build(&self, config: &SimConfig) -> Box<dyn BroadPhase> {
        match self {
            BroadPhaseKind::Quadtree => Box::new(Quadtree::new(
                Rect::new(0.0, 0.0, config.width, config.height),
                config.quadtree_max_objects,
                config.quadtree_max_levels,
            )),
            BroadPhaseKind::UniformGrid => Box::new(UniformGrid::new(config.cell_size)),
            BroadPhaseKind::BruteForce => Box::new(BruteForce::default()),
        }
    }
}

impl fmt::Display for BroadPhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BroadPhaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quadtree" | "qt" => Ok(BroadPhaseKind::Quadtree),
            "uniform_grid" | "grid" => Ok(BroadPhaseKind::UniformGrid),
            "brute_force" | "brute-force" | "all" => Ok(BroadPhaseKind::BruteForce),
            other => Err(format!("unknown broad-phase '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_brute_force_pairs() {
        let particles: Vec<Particle> = (0..4)
            .map(|i| Particle::new(Vec2::new(i as f32 * 100.0, 0.0), 1.0, 0))
            .collect();
        let mut bf = BruteForce::default();
        bf.rebuild(&particles);
        let mut pairs = Vec::new();
        bf.candidate_pairs(&mut pairs);
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("grid".parse::<BroadPhaseKind>(), Ok(BroadPhaseKind::UniformGrid));
        assert_eq!("Quadtree".parse::<BroadPhaseKind>(), Ok(BroadPhaseKind::Quadtree));
        assert_eq!("brute-force".parse::<BroadPhaseKind>(), Ok(BroadPhaseKind::BruteForce));
        assert!("octree".parse::<BroadPhaseKind>().is_err());
    }

    #[test]
    fn test_build_selects_implementation() {
        let config = SimConfig::default();
        for kind in [
            BroadPhaseKind::Quadtree,
            BroadPhaseKind::UniformGrid,
            BroadPhaseKind::BruteForce,
        ] {
            assert_eq!(kind.build(&config).name(), kind.as_str());
        }
    }
}
