//! Content model: node handles, component flags and content types.

use core::fmt;

use crate::camera::behavior::ContentBehavior;

/// Handle to a node in the host scene.
///
/// Lower 32 bits index the node, upper 32 bits carry a generation counter so
/// a handle to a destroyed node never aliases a new one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    bits: u64,
}

impl NodeId {
    /// Create a handle from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }

    #[inline]
    pub const fn to_bits(&self) -> u64 {
        self.bits
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index(), self.generation())
    }
}

/// Root node of an instantiated asset
pub type ContentRoot = NodeId;

/// Asset selected for preview.
///
/// The core never interprets the key; it is forwarded to the scene host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetRef {
    pub name: String,
}

impl AssetRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Components present on a single node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComponentFlags(u32);

impl ComponentFlags {
    /// No components of interest
    pub const NONE: Self = Self(0);

    /// Something with world-space render bounds (mesh, skinned mesh, sprite)
    pub const RENDERER: Self = Self(1 << 0);

    /// UI canvas
    pub const UI_CANVAS: Self = Self(1 << 1);

    /// UI graphic (image, text, ...)
    pub const UI_GRAPHIC: Self = Self(1 << 2);

    /// Particle emitter
    pub const PARTICLE_EMITTER: Self = Self(1 << 3);

    /// Any UI component
    pub const UI: Self = Self(Self::UI_CANVAS.0 | Self::UI_GRAPHIC.0);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if all specified flags are set
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the specified flags are set
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl core::ops::BitOr for ComponentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// What kind of content is being previewed.
///
/// Chosen once per load; selects the camera behavior for every operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Nothing loaded
    #[default]
    None,
    /// Static or rigged geometry
    Model,
    /// Particle effect
    Particle,
    /// World-space UI hierarchy
    Ugui,
}

impl ContentType {
    /// Behavior table entry for this content type
    #[inline]
    pub fn behavior(self) -> &'static ContentBehavior {
        ContentBehavior::for_type(self)
    }

    /// Short label for status text
    pub fn label(self) -> &'static str {
        match self {
            ContentType::None => "-",
            ContentType::Model => "Model",
            ContentType::Particle => "Particle",
            ContentType::Ugui => "UGUI",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_parts() {
        let id = NodeId::new(7, 3);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 3);
        assert_ne!(id, NodeId::new(7, 4));
    }

    #[test]
    fn test_component_flags() {
        let flags = ComponentFlags::RENDERER | ComponentFlags::UI_GRAPHIC;
        assert!(flags.intersects(ComponentFlags::UI));
        assert!(!flags.contains(ComponentFlags::UI));
        assert!(!flags.intersects(ComponentFlags::PARTICLE_EMITTER));
        assert!(ComponentFlags::NONE.is_empty());
    }
}
