use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::ran_model::geometry::Point;

#[derive(Debug, Clone, Copy)]
struct Node<T> {
    point: Point,
    item: T,
    left: Option<usize>,
    right: Option<usize>,
}

/// A query result: distance to the query point and the stored item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<T> {
    pub distance: f64,
    pub item: T,
}

impl<T: Ord> Eq for Neighbor<T> {}

impl<T: Ord> PartialOrd for Neighbor<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Neighbor<T> {
    // Ties in distance are ordered by item so query results are stable.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance).then_with(|| self.item.cmp(&other.item))
    }
}

/// Static 2-d tree built by median splits on alternating axes.
#[derive(Debug, Clone)]
pub struct KdTree<T> {
    nodes: Vec<Node<T>>,
    root: Option<usize>,
}

impl<T: Copy + Ord> KdTree<T> {
    pub fn build(entries: impl IntoIterator<Item = (Point, T)>) -> Self {
        let mut entries: Vec<(Point, T)> = entries.into_iter().collect();
        let mut nodes = Vec::with_capacity(entries.len());
        let root = Self::build_subtree(&mut nodes, &mut entries, 0);

        KdTree { nodes, root }
    }

    fn build_subtree(nodes: &mut Vec<Node<T>>, entries: &mut [(Point, T)], depth: usize) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }

        let axis = depth % 2;
        entries.sort_by(|a, b| coordinate(a.0, axis).total_cmp(&coordinate(b.0, axis)).then_with(|| a.1.cmp(&b.1)));
        let median = entries.len() / 2;
        let (point, item) = entries[median];

        let index = nodes.len();
        nodes.push(Node { point, item, left: None, right: None });

        let (lower, upper) = entries.split_at_mut(median);
        let left = Self::build_subtree(nodes, lower, depth + 1);
        let right = Self::build_subtree(nodes, &mut upper[1..], depth + 1);
        nodes[index].left = left;
        nodes[index].right = right;

        Some(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the `k` stored items closest to `target`, nearest first.
    /// Equal distances are ordered by item.
    pub fn nearest(&self, target: Point, k: usize) -> Vec<Neighbor<T>> {
        if k == 0 {
            return Vec::new();
        }

        let mut best: BinaryHeap<Neighbor<T>> = BinaryHeap::with_capacity(k + 1);
        if let Some(root) = self.root {
            self.search(root, 0, target, k, &mut best);
        }

        best.into_sorted_vec()
    }

    fn search(&self, index: usize, depth: usize, target: Point, k: usize, best: &mut BinaryHeap<Neighbor<T>>) {
        let node = &self.nodes[index];
        let candidate = Neighbor { distance: node.point.distance_to(target), item: node.item };

        if best.len() < k {
            best.push(candidate);
        } else if best.peek().is_some_and(|worst| candidate < *worst) {
            best.pop();
            best.push(candidate);
        }

        let axis = depth % 2;
        let delta = coordinate(target, axis) - coordinate(node.point, axis);
        let (near, far) = if delta < 0.0 { (node.left, node.right) } else { (node.right, node.left) };

        if let Some(near) = near {
            self.search(near, depth + 1, target, k, best);
        }

        // The far side can only hold a closer item if the splitting line is within reach.
        let reachable = best.len() < k || best.peek().is_some_and(|worst| delta.abs() <= worst.distance);
        if let Some(far) = far {
            if reachable {
                self.search(far, depth + 1, target, k, best);
            }
        }
    }
}

fn coordinate(point: Point, axis: usize) -> f64 {
    if axis == 0 { point.x } else { point.y }
}
