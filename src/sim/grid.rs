//! Uniform grid broad-phase
//!
//! Particles are bucketed by the cell containing their centre. Each occupied
//! cell is paired with itself and its eight neighbours, so any two particles
//! closer than one cell width are always reported. Pairs spanning two cells
//! are reported once from each side.

use std::collections::HashMap;

use glam::Vec2;

use super::broad_phase::BroadPhase;
use super::particle::Particle;

pub type Cell = (i32, i32);

const NEIGHBORS: [Cell; 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Fixed-size cell hash
#[derive(Debug, Clone)]
pub struct UniformGrid {
    cell_size: f32,
    cells: HashMap<Cell, Vec<usize>>,
    /// Non-empty cells in first-insertion order (keeps iteration deterministic)
    occupied: Vec<Cell>,
}

impl UniformGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            occupied: Vec::new(),
        }
    }

    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> Cell {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Particle indices bucketed in `cell`
    pub fn bucket(&self, cell: Cell) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn occupied_cells(&self) -> &[Cell] {
        &self.occupied
    }

    /// Empty every bucket
    ///
    /// Buckets left empty by the previous rebuild are dropped, so the map only
    /// holds cells occupied during the last two rebuilds.
    pub fn clear(&mut self) {
        self.cells.retain(|_, bucket| !bucket.is_empty());
        for cell in self.occupied.drain(..) {
            if let Some(bucket) = self.cells.get_mut(&cell) {
                bucket.clear();
            }
        }
    }

    pub fn insert(&mut self, id: usize, pos: Vec2) {
        let cell = self.cell_of(pos);
        let bucket = self.cells.entry(cell).or_default();
        if bucket.is_empty() {
            self.occupied.push(cell);
        }
        bucket.push(id);
    }
}

impl BroadPhase for UniformGrid {
    fn name(&self) -> &'static str {
        "uniform_grid"
    }

    fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();
        for (id, p) in particles.iter().enumerate() {
            self.insert(id, p.pos);
        }
    }

    fn candidate_pairs(&self, pairs: &mut Vec<(usize, usize)>) {
        for &(cx, cy) in &self.occupied {
            let bucket = self.bucket((cx, cy));

            for (i, &a) in bucket.iter().enumerate() {
                for &b in &bucket[i + 1..] {
                    pairs.push((a, b));
                }
            }

            for (dx, dy) in NEIGHBORS {
                // Saturated cells at the i32 edge have no neighbour beyond it
                let (Some(nx), Some(ny)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                    continue;
                };
                let neighbor = self.bucket((nx, ny));
                for &a in bucket {
                    for &b in neighbor {
                        pairs.push((a, b));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn particles(points: &[(f32, f32)]) -> Vec<Particle> {
        points
            .iter()
            .map(|&(x, y)| Particle::new(Vec2::new(x, y), 2.0, 0))
            .collect()
    }

    fn tested(grid: &UniformGrid) -> HashSet<(usize, usize)> {
        let mut pairs = Vec::new();
        grid.candidate_pairs(&mut pairs);
        pairs
            .into_iter()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect()
    }

    #[test]
    fn test_cell_of_floors() {
        let grid = UniformGrid::new(50.0);
        assert_eq!(grid.cell_of(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(grid.cell_of(Vec2::new(49.9, 50.0)), (0, 1));
        assert_eq!(grid.cell_of(Vec2::new(-0.1, 120.0)), (-1, 2));
    }

    #[test]
    fn test_every_particle_in_one_bucket() {
        let mut grid = UniformGrid::new(50.0);
        let ps = particles(&[(10.0, 10.0), (20.0, 30.0), (75.0, 10.0), (400.0, 599.0)]);
        grid.rebuild(&ps);
        assert_eq!(grid.bucket((0, 0)), &[0, 1]);
        assert_eq!(grid.bucket((1, 0)), &[2]);
        assert_eq!(grid.bucket((8, 11)), &[3]);
        let total: usize = grid.occupied_cells().iter().map(|&c| grid.bucket(c).len()).sum();
        assert_eq!(total, ps.len());
    }

    #[test]
    fn test_rebuild_forgets_previous_tick() {
        let mut grid = UniformGrid::new(50.0);
        grid.rebuild(&particles(&[(10.0, 10.0), (12.0, 10.0)]));
        grid.rebuild(&particles(&[(300.0, 300.0)]));
        assert!(grid.bucket((0, 0)).is_empty());
        assert_eq!(grid.occupied_cells(), &[(6, 6)]);
        assert!(tested(&grid).is_empty());
    }

    #[test]
    fn test_far_cells_not_paired() {
        let mut grid = UniformGrid::new(50.0);
        grid.rebuild(&particles(&[(10.0, 10.0), (110.0, 10.0), (60.0, 60.0)]));
        let pairs = tested(&grid);
        assert!(!pairs.contains(&(0, 1)));
        assert!(pairs.contains(&(0, 2)));
        assert!(pairs.contains(&(1, 2)));
    }

    #[test]
    fn test_cross_cell_pairs_reported_from_both_sides() {
        let mut grid = UniformGrid::new(50.0);
        grid.rebuild(&particles(&[(49.0, 10.0), (51.0, 10.0)]));
        let mut pairs = Vec::new();
        grid.candidate_pairs(&mut pairs);
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_exact_cell_boundaries() {
        let mut grid = UniformGrid::new(50.0);
        // Exactly one cell width apart, both on cell corners
        grid.rebuild(&particles(&[(50.0, 50.0), (100.0, 50.0), (50.0, 100.0), (100.0, 100.0)]));
        let pairs = tested(&grid);
        for pair in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
            assert!(pairs.contains(&pair), "missing {:?}", pair);
        }
    }

    #[test]
    fn test_stale_buckets_dropped() {
        let mut grid = UniformGrid::new(50.0);
        grid.rebuild(&particles(&[(10.0, 10.0), (120.0, 10.0)]));
        grid.rebuild(&particles(&[(300.0, 300.0)]));
        grid.rebuild(&particles(&[(310.0, 310.0)]));
        assert_eq!(grid.cells.len(), 1);
        assert_eq!(grid.bucket((6, 6)), &[0]);
    }

    #[test]
    fn test_saturated_cells_do_not_overflow() {
        // Positions far beyond i32 cells clamp to the edge of the cell range
        let mut grid = UniformGrid::new(1e-7);
        grid.rebuild(&particles(&[(800.0, 600.0), (799.0, 600.0), (-800.0, -600.0)]));
        assert_eq!(grid.cell_of(Vec2::new(800.0, 600.0)), (i32::MAX, i32::MAX));
        assert_eq!(grid.cell_of(Vec2::new(-800.0, -600.0)), (i32::MIN, i32::MIN));
        let pairs = tested(&grid);
        assert!(pairs.contains(&(0, 1)));
        assert!(!pairs.contains(&(0, 2)));
    }

    proptest! {
        #[test]
        fn prop_close_pairs_always_tested(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            angle in 0.0f32..std::f32::consts::TAU,
            frac in 0.0f32..0.99,
            cell_size in 5.0f32..100.0,
        ) {
            let offset = Vec2::from_angle(angle) * frac * cell_size;
            let ps = particles(&[(x, y), (x + offset.x, y + offset.y)]);
            let mut grid = UniformGrid::new(cell_size);
            grid.rebuild(&ps);
            prop_assert!(tested(&grid).contains(&(0, 1)));
        }
    }
}
