//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding boxes. Each node owns exactly two children,
//! which are either further nodes or scene entities; a node built over a
//! single entity points both children at it.

use crate::entity::{Entity, EntityList, HitRecord};
use crate::error::SceneError;
use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;
use std::sync::Arc;

/// Internal BVH node.
pub struct BvhNode {
    left: Arc<dyn Entity>,
    right: Arc<dyn Entity>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over `objects`.
    ///
    /// Fails if `objects` is empty.
    pub fn new(mut objects: Vec<Arc<dyn Entity>>) -> Result<Self, SceneError> {
        if objects.is_empty() {
            return Err(SceneError::Empty);
        }

        let node = Self::build(&mut objects);
        log::debug!(
            "Built BVH over {} entities, bounds {:?}",
            objects.len(),
            node.bbox
        );

        Ok(node)
    }

    /// Build a BVH over the entities of a list.
    pub fn from_list(list: EntityList) -> Result<Self, SceneError> {
        Self::new(list.into_objects())
    }

    /// Recursive construction.
    ///
    /// Median split: sort the range by box minimum along the longest axis of
    /// its bounds, split in half, recurse.
    fn build(objects: &mut [Arc<dyn Entity>]) -> Self {
        let bbox = objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box())
        });
        let axis = bbox.longest_axis();

        let (left, right): (Arc<dyn Entity>, Arc<dyn Entity>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            _ => {
                objects.sort_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let mid = objects.len() / 2;
                let (lower, upper) = objects.split_at_mut(mid);
                (Arc::new(Self::build(lower)), Arc::new(Self::build(upper)))
            }
        };

        Self { left, right, bbox }
    }
}

impl Entity for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>, rng: &mut dyn RngCore) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec, rng);

        // Only check right up to closest hit
        let right_t = if hit_left { ray_t.narrowed_to(rec.t) } else { ray_t };
        let hit_right = self.right.hit(ray, right_t, rec, rng);

        hit_left || hit_right
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
