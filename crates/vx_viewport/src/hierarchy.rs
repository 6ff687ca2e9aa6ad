//! Depth-first traversal over a content hierarchy.

use crate::content::NodeId;
use crate::host::SceneQuery;

/// Pre-order, depth-first iterator over a node and all of its descendants.
///
/// Children are visited in hierarchy order, matching how hosts enumerate
/// components "in children".
pub struct Descendants<'a, Q: SceneQuery + ?Sized> {
    query: &'a Q,
    stack: Vec<NodeId>,
}

impl<'a, Q: SceneQuery + ?Sized> Descendants<'a, Q> {
    pub fn new(query: &'a Q, root: NodeId) -> Self {
        Self {
            query,
            stack: vec![root],
        }
    }
}

impl<'a, Q: SceneQuery + ?Sized> Iterator for Descendants<'a, Q> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        let children = self.query.children(node);
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

/// Iterate `root` and everything below it
#[inline]
pub fn descendants<Q: SceneQuery + ?Sized>(query: &Q, root: NodeId) -> Descendants<'_, Q> {
    Descendants::new(query, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryScene, NodeDesc};

    #[test]
    fn test_pre_order() {
        let mut scene = MemoryScene::new();
        let root = scene.spawn(&NodeDesc::empty("root").with_children(vec![
            NodeDesc::empty("a").with_children(vec![NodeDesc::empty("a1"), NodeDesc::empty("a2")]),
            NodeDesc::empty("b"),
        ]));

        let names: Vec<_> = descendants(&scene, root).filter_map(|n| scene.name(n)).collect();
        assert_eq!(names, vec!["root", "a", "a1", "a2", "b"]);
    }
}
