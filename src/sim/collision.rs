//! Overlap detection
//!
//! Stand-in for the host's physics layer: reports every pair of circles that
//! touch. Resolution of what a contact *means* happens in `combat`.

use glam::Vec2;

use super::entity::EntityId;

/// A collision circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
}

/// An unordered pair of touching bodies (lower ID first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Overlap {
    pub a: EntityId,
    pub b: EntityId,
}

impl Overlap {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }
}

/// Circles touch or intersect
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Every overlapping pair, in a stable order
pub fn find_overlaps(bodies: &[Body]) -> Vec<Overlap> {
    let mut overlaps = Vec::new();
    for (i, first) in bodies.iter().enumerate() {
        for second in &bodies[i + 1..] {
            if first.id != second.id
                && circles_overlap(first.pos, first.radius, second.pos, second.radius)
            {
                overlaps.push(Overlap::new(first.id, second.id));
            }
        }
    }
    overlaps.sort();
    overlaps.dedup();
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 0.5, Vec2::new(0.9, 0.0), 0.5));
        assert!(circles_overlap(Vec2::ZERO, 0.5, Vec2::new(1.0, 0.0), 0.5));
        assert!(!circles_overlap(Vec2::ZERO, 0.5, Vec2::new(1.01, 0.0), 0.5));
    }

    #[test]
    fn test_find_overlaps_ordered_pairs() {
        let bodies = [
            Body {
                id: 7,
                pos: Vec2::new(5.0, 5.0),
                radius: 0.5,
            },
            Body {
                id: 3,
                pos: Vec2::new(5.4, 5.0),
                radius: 0.1,
            },
            Body {
                id: 9,
                pos: Vec2::new(12.0, 1.0),
                radius: 0.4,
            },
        ];
        let overlaps = find_overlaps(&bodies);
        assert_eq!(overlaps, vec![Overlap { a: 3, b: 7 }]);
    }

    #[test]
    fn test_overlap_normalizes_order() {
        assert_eq!(Overlap::new(9, 2), Overlap::new(2, 9));
    }
}
