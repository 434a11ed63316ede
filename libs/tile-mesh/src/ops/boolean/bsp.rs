//! # BSP Tree
//!
//! Solid represented as a binary space partition, following the csg.js
//! scheme by Evan Wallace. A node stores its splitting plane and the
//! polygons lying in it, plus a subtree for each side.
//!
//! Subtraction combines [`BspNode::clip_to`], which drops the polygons of
//! one tree inside another, with [`BspNode::invert`], which swaps inside
//! and outside.
//!
//! ## Stack Safety
//!
//! Trees built from thousands of wall fragments get deep. Every recursive
//! step runs through `stacker::maybe_grow`, which moves to a fresh heap
//! segment before the thread stack runs out.

use super::plane::Plane;
use super::polygon::{Polygon, SplitResult};
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;

/// A node in the BSP tree.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    /// Splitting plane, taken from the first polygon inserted
    plane: Option<Plane>,
    /// Polygons coplanar with this node's plane
    polygons: Vec<Polygon>,
    /// Front subtree (polygons in front of plane)
    front: Option<Box<BspNode>>,
    /// Back subtree (polygons behind plane)
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a BSP tree from polygons.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Inserts polygons into the tree, splitting them where needed.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            let plane = *self.plane.get_or_insert(*polygons[0].plane());

            let mut out = SplitResult::default();
            for polygon in polygons {
                polygon.split(&plane, &mut out);
            }
            self.polygons.append(&mut out.coplanar_front);
            self.polygons.append(&mut out.coplanar_back);

            if !out.front.is_empty() {
                self.front
                    .get_or_insert_with(Box::default)
                    .build(out.front);
            }
            if !out.back.is_empty() {
                self.back.get_or_insert_with(Box::default).build(out.back);
            }
        });
    }

    /// Converts solid space to empty space and empty space to solid space.
    pub fn invert(&mut self) {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            for polygon in &mut self.polygons {
                polygon.flip();
            }
            if let Some(plane) = &mut self.plane {
                *plane = plane.flipped();
            }
            if let Some(front) = &mut self.front {
                front.invert();
            }
            if let Some(back) = &mut self.back {
                back.invert();
            }
            std::mem::swap(&mut self.front, &mut self.back);
        });
    }

    /// Removes the parts of `polygons` that lie inside this tree's solid.
    ///
    /// Coplanar polygons facing the same way as a node plane are treated as
    /// in front, opposite-facing ones as behind.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let Some(plane) = self.plane else {
            return polygons;
        };

        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            let mut out = SplitResult::default();
            for polygon in polygons {
                polygon.split(&plane, &mut out);
            }

            let mut front = out.front;
            front.append(&mut out.coplanar_front);
            let mut back = out.back;
            back.append(&mut out.coplanar_back);

            let mut result = match &self.front {
                Some(node) => node.clip_polygons(front),
                None => front,
            };
            if let Some(node) = &self.back {
                result.extend(node.clip_polygons(back));
            }
            // Without a back subtree, back polygons are inside the solid
            result
        })
    }

    /// Removes all polygons in this tree that are inside `other`.
    pub fn clip_to(&mut self, other: &BspNode) {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
            if let Some(front) = &mut self.front {
                front.clip_to(other);
            }
            if let Some(back) = &mut self.back {
                back.clip_to(other);
            }
        });
    }

    /// Collects all polygons from this tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<&BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            result.extend(node.polygons.iter().cloned());

            if let Some(front) = &node.front {
                stack.push(front);
            }
            if let Some(back) = &node.back {
                stack.push(back);
            }
        }

        result
    }

    /// Number of polygons stored in the tree.
    pub fn polygon_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&BspNode> = vec![self];
        while let Some(node) = stack.pop() {
            count += node.polygons.len();
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::boolean::polygon::mesh_to_polygons;
    use crate::primitives::create_cube;
    use glam::DVec3;

    fn cube_tree(size: f64, center: bool) -> BspNode {
        BspNode::new(mesh_to_polygons(
            &create_cube(DVec3::splat(size), center).unwrap(),
        ))
    }

    #[test]
    fn test_build_keeps_every_polygon() {
        let tree = cube_tree(1.0, false);
        // Cube faces never cross each other's planes
        assert_eq!(tree.polygon_count(), 12);
        assert_eq!(tree.all_polygons().len(), 12);
    }

    #[test]
    fn test_empty_tree_clips_nothing() {
        let tree = BspNode::default();
        let polygons = cube_tree(1.0, false).all_polygons();
        assert_eq!(tree.clip_polygons(polygons).len(), 12);
    }

    #[test]
    fn test_clip_removes_inside_polygons() {
        let big = cube_tree(4.0, true);
        let small = cube_tree(1.0, true).all_polygons();
        assert!(big.clip_polygons(small).is_empty());
    }

    #[test]
    fn test_clip_keeps_outside_polygons() {
        let tree = cube_tree(1.0, true);
        let mut far = create_cube(DVec3::ONE, true).unwrap();
        far.translate(DVec3::new(10.0, 0.0, 0.0));
        let polygons = mesh_to_polygons(&far);
        assert_eq!(tree.clip_polygons(polygons).len(), 12);
    }

    #[test]
    fn test_invert_twice_restores_planes() {
        let mut tree = cube_tree(1.0, false);
        let before: Vec<DVec3> = tree
            .all_polygons()
            .iter()
            .map(|p| p.plane().normal())
            .collect();
        tree.invert();
        tree.invert();
        let after: Vec<DVec3> = tree
            .all_polygons()
            .iter()
            .map(|p| p.plane().normal())
            .collect();
        assert_eq!(before, after);
    }
}
