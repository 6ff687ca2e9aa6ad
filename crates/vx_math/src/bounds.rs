//! Axis-aligned bounding volumes for content framing

use glam::Vec3;

/// Axis-aligned bounding box stored as center and half-size.
///
/// `extents` components are never negative; constructors take the absolute
/// value of whatever they are given.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Bounds {
    /// Box of size one, used when content has nothing renderable
    pub const UNIT_EXTENTS: Vec3 = Vec3::splat(0.5);

    /// Create from center and half-extents
    #[inline]
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self {
            center,
            extents: extents.abs(),
        }
    }

    /// Create from center and full size
    #[inline]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self::new(center, size * 0.5)
    }

    /// Create from two corners, in any order
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            center: (min + max) * 0.5,
            extents: (max - min) * 0.5,
        }
    }

    /// Unit box centered at `position`
    #[inline]
    pub fn unit_at(position: Vec3) -> Self {
        Self::new(position, Self::UNIT_EXTENTS)
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }

    /// Full size (twice the extents)
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.extents * 2.0
    }

    /// Radius of the sphere through the box corners
    #[inline]
    pub fn radius(&self) -> f32 {
        self.extents.length()
    }

    /// Smallest box containing both `self` and `other`
    pub fn encapsulate(&self, other: &Bounds) -> Self {
        Self::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Grow to include a point
    pub fn encapsulate_point(&self, point: Vec3) -> Self {
        Self::from_min_max(self.min().min(point), self.max().max(point))
    }

    /// Union of every box yielded by `parts`, or `None` if there are none
    pub fn union_all<I>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Bounds>,
    {
        parts
            .into_iter()
            .reduce(|acc, part| acc.encapsulate(&part))
    }

    /// Check if a point is inside (boundary inclusive)
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        point.cmpge(min).all() && point.cmple(max).all()
    }

    /// Check if another box is fully contained
    #[inline]
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains_point(other.min()) && self.contains_point(other.max())
    }

    /// True when every component is finite
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.extents.is_finite()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit_at(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_takes_absolute_extents() {
        let b = Bounds::new(Vec3::ZERO, Vec3::new(-1.0, 2.0, -3.0));
        assert_eq!(b.extents, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_min_max_any_order() {
        let b = Bounds::from_min_max(Vec3::new(2.0, 2.0, 2.0), Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(b.center, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(b.extents, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(b.min(), Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn test_unit_box() {
        let b = Bounds::unit_at(Vec3::new(3.0, 0.0, -1.0));
        assert_eq!(b.size(), Vec3::ONE);
        assert_eq!(b.center, Vec3::new(3.0, 0.0, -1.0));
    }

    #[test]
    fn test_encapsulate_disjoint() {
        let a = Bounds::from_min_max(Vec3::ZERO, Vec3::ONE);
        let b = Bounds::from_min_max(Vec3::splat(4.0), Vec3::splat(5.0));
        let u = a.encapsulate(&b);
        assert_eq!(u.min(), Vec3::ZERO);
        assert_eq!(u.max(), Vec3::splat(5.0));
        assert!(u.contains_bounds(&a));
        assert!(u.contains_bounds(&b));
    }

    #[test]
    fn test_union_all_empty() {
        assert!(Bounds::union_all(Vec::new()).is_none());
    }

    #[test]
    fn test_radius() {
        let b = Bounds::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(b.radius(), 5.0);
    }

    #[test]
    fn test_encapsulate_point() {
        let b = Bounds::unit_at(Vec3::ZERO).encapsulate_point(Vec3::new(2.0, 0.0, 0.0));
        assert!(b.contains_point(Vec3::new(2.0, 0.0, 0.0)));
        assert_relative_eq!(b.min().x, -0.5);
    }
}
