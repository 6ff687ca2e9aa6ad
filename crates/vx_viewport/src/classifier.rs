//! Content classification.

use crate::content::{ComponentFlags, ContentRoot, ContentType};
use crate::hierarchy::descendants;
use crate::host::SceneQuery;

/// Assign a content type to an instantiated root.
///
/// Any UI canvas or graphic anywhere in the hierarchy makes it `Ugui`, even
/// alongside particles. Otherwise any particle emitter makes it `Particle`.
/// Everything else is a `Model`.
pub fn classify<Q: SceneQuery + ?Sized>(query: &Q, root: ContentRoot) -> ContentType {
    let mut seen = ComponentFlags::NONE;
    for node in descendants(query, root) {
        let flags = query.components(node);
        if flags.intersects(ComponentFlags::UI) {
            return ContentType::Ugui;
        }
        seen.insert(flags);
    }

    if seen.intersects(ComponentFlags::PARTICLE_EMITTER) {
        ContentType::Particle
    } else {
        ContentType::Model
    }
}
