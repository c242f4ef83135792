//! Collision predicates for the collision phase

use crate::object::ObjectInstance;

/// Decides whether an ordered pair of instances collides this frame
pub trait CollisionPredicate {
    fn overlaps(&self, a: &ObjectInstance, b: &ObjectInstance) -> bool;
}

impl<F> CollisionPredicate for F
where
    F: Fn(&ObjectInstance, &ObjectInstance) -> bool,
{
    fn overlaps(&self, a: &ObjectInstance, b: &ObjectInstance) -> bool {
        self(a, b)
    }
}

/// Sprite bounding boxes at the instances' positions. Instances without a
/// sprite never collide.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundingBoxOverlap;

impl CollisionPredicate for BoundingBoxOverlap {
    fn overlaps(&self, a: &ObjectInstance, b: &ObjectInstance) -> bool {
        match (a.bounding_box(), b.bounding_box()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }
}
