//! Content bounds calculation.

use vx_math::Bounds;

use crate::content::ContentRoot;
use crate::hierarchy::descendants;
use crate::host::SceneQuery;

/// Union of the world-space bounds of every renderable part under `root`.
///
/// With no renderable parts, returns a unit box at the root's position so
/// framing never divides by a zero extent. Parts with non-finite bounds are
/// skipped.
pub fn compute_bounds<Q: SceneQuery + ?Sized>(query: &Q, root: ContentRoot) -> Bounds {
    let parts = descendants(query, root)
        .filter_map(|node| query.render_bounds(node))
        .filter(Bounds::is_finite);
    Bounds::union_all(parts).unwrap_or_else(|| Bounds::unit_at(query.position(root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryScene, NodeDesc};
    use glam::Vec3;

    #[test]
    fn test_empty_hierarchy_falls_back_to_unit_box() {
        let mut scene = MemoryScene::new();
        let root = scene.spawn(&NodeDesc::empty("root").at([2.0, 1.0, 0.0]));

        let b = compute_bounds(&scene, root);
        assert_eq!(b.center, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(b.size(), Vec3::ONE);
    }

    #[test]
    fn test_union_of_nested_parts() {
        let mut scene = MemoryScene::new();
        let desc = NodeDesc::empty("root").with_children(vec![
            NodeDesc::mesh("a", [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            NodeDesc::empty("group").with_children(vec![NodeDesc::mesh(
                "b",
                [10.0, 0.0, 0.0],
                [1.0, 2.0, 1.0],
            )]),
        ]);
        let root = scene.spawn(&desc);

        let b = compute_bounds(&scene, root);
        assert_eq!(b.min(), Vec3::new(-1.0, -2.0, -1.0));
        assert_eq!(b.max(), Vec3::new(11.0, 2.0, 1.0));
        assert!(b.extents.cmpge(Vec3::ZERO).all());
    }

    #[test]
    fn test_non_finite_parts_are_ignored() {
        let mut scene = MemoryScene::new();
        let desc = NodeDesc::empty("root").with_children(vec![
            NodeDesc::mesh("ok", [0.0; 3], [1.0; 3]),
            NodeDesc::mesh("broken", [f32::NAN, 0.0, 0.0], [1.0; 3]),
        ]);
        let root = scene.spawn(&desc);

        let b = compute_bounds(&scene, root);
        assert_eq!(b.center, Vec3::ZERO);
        assert_eq!(b.extents, Vec3::ONE);
    }

    #[test]
    fn test_center_within_union_of_parts() {
        let mut scene = MemoryScene::new();
        let desc = NodeDesc::empty("root").with_children(vec![
            NodeDesc::mesh("a", [-5.0, 3.0, 0.0], [0.5, 0.5, 0.5]),
            NodeDesc::mesh("b", [5.0, -3.0, 8.0], [0.1, 0.1, 0.1]),
        ]);
        let root = scene.spawn(&desc);

        let b = compute_bounds(&scene, root);
        assert!(b.contains_point(b.center));
        assert!(b.contains_point(Vec3::new(-5.0, 3.0, 0.0)));
        assert!(b.contains_point(Vec3::new(5.0, -3.0, 8.0)));
    }
}
