//! Quadtree broad-phase
//!
//! Nodes live in a flat arena and refer to their children by index. The four
//! children of a node are allocated together, so a node only stores the index
//! of its first child. The arena is truncated back to the root every rebuild.
//!
//! A node holds particles directly until it has more than `max_objects` of
//! them and is shallower than `max_levels`; it then splits once and pushes
//! every particle that lies strictly inside one quadrant down a level.
//! Particles on a split line stay with the node.
//!
//! Candidate pairs only come from particles held by the same node. Pairs
//! that end up in sibling quadrants, or one at a node and the other in a
//! descendant, are never reported. This is a known coverage gap of the
//! scheme near quadrant boundaries.

use glam::Vec2;

use super::broad_phase::BroadPhase;
use super::particle::Particle;
use super::rect::Rect;

/// A particle reference held by the tree (index plus position at insertion)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub id: usize,
    pub pos: Vec2,
}

/// One region of the tree
#[derive(Debug, Clone)]
pub struct Node {
    pub level: u32,
    pub bounds: Rect,
    /// Entries held at this node rather than in a child
    pub objects: Vec<Entry>,
    /// Arena index of the NW child; NE, SW, SE follow it
    pub first_child: Option<usize>,
}

impl Node {
    fn new(level: u32, bounds: Rect) -> Self {
        Self {
            level,
            bounds,
            objects: Vec::new(),
            first_child: None,
        }
    }

    pub fn children(&self) -> Option<[usize; 4]> {
        self.first_child.map(|c| [c, c + 1, c + 2, c + 3])
    }
}

/// Quadrant (0 = NW, 1 = NE, 2 = SW, 3 = SE) strictly containing `pos`,
/// or `None` when it sits on a split line
pub fn quadrant(bounds: &Rect, pos: Vec2) -> Option<usize> {
    let mid = bounds.midpoint();

    let row = if pos.y < mid.y {
        0
    } else if pos.y > mid.y {
        2
    } else {
        return None;
    };

    if pos.x < mid.x {
        Some(row)
    } else if pos.x > mid.x {
        Some(row + 1)
    } else {
        None
    }
}

pub const ROOT: usize = 0;

/// Arena-backed quadtree
#[derive(Debug, Clone)]
pub struct Quadtree {
    nodes: Vec<Node>,
    max_objects: usize,
    max_levels: u32,
}

impl Quadtree {
    pub fn new(bounds: Rect, max_objects: usize, max_levels: u32) -> Self {
        Self {
            nodes: vec![Node::new(0, bounds)],
            max_objects,
            max_levels,
        }
    }

    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level currently present
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.level).max().unwrap_or(0)
    }

    /// Drop everything but an empty root
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT];
        root.objects.clear();
        root.first_child = None;
    }

    pub fn insert(&mut self, entry: Entry) {
        self.insert_at(ROOT, entry);
    }

    fn insert_at(&mut self, node: usize, entry: Entry) {
        if let Some(first) = self.nodes[node].first_child {
            if let Some(q) = quadrant(&self.nodes[node].bounds, entry.pos) {
                self.insert_at(first + q, entry);
                return;
            }
        }

        self.nodes[node].objects.push(entry);

        let n = &self.nodes[node];
        if n.objects.len() > self.max_objects && n.level < self.max_levels {
            let existing = n.first_child;
            let first = match existing {
                Some(first) => first,
                None => self.split(node),
            };
            self.redistribute(node, first);
        }
    }

    /// Allocate the four children of `node`, returning the first index
    fn split(&mut self, node: usize) -> usize {
        let level = self.nodes[node].level + 1;
        let first = self.nodes.len();
        for bounds in self.nodes[node].bounds.split() {
            self.nodes.push(Node::new(level, bounds));
        }
        self.nodes[node].first_child = Some(first);
        log::debug!("Quadtree node {} split at level {}", node, level - 1);
        first
    }

    /// Push every unambiguous entry of `node` into its children
    fn redistribute(&mut self, node: usize, first: usize) {
        let bounds = self.nodes[node].bounds;
        let held = std::mem::take(&mut self.nodes[node].objects);
        for entry in held {
            match quadrant(&bounds, entry.pos) {
                Some(q) => self.insert_at(first + q, entry),
                None => self.nodes[node].objects.push(entry),
            }
        }
    }

    fn collect_pairs(&self, node: usize, pairs: &mut Vec<(usize, usize)>) {
        let objects = &self.nodes[node].objects;
        for (i, a) in objects.iter().enumerate() {
            for b in &objects[i + 1..] {
                pairs.push((a.id, b.id));
            }
        }
        if let Some(children) = self.nodes[node].children() {
            for child in children {
                self.collect_pairs(child, pairs);
            }
        }
    }
}

impl BroadPhase for Quadtree {
    fn name(&self) -> &'static str {
        "quadtree"
    }

    fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();
        for (id, p) in particles.iter().enumerate() {
            self.insert(Entry { id, pos: p.pos });
        }
    }

    fn candidate_pairs(&self, pairs: &mut Vec<(usize, usize)>) {
        self.collect_pairs(ROOT, pairs);
    }
}
