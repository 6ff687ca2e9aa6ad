//! Procedural ground grid sized to the content bounds.
//!
//! The grid lies on the X-Z plane through the bottom of the bounds and is
//! rebuilt only when the bounds change, never on camera movement.

use glam::Vec3;
use vx_math::Bounds;

use crate::content::NodeId;
use crate::host::SceneHost;

/// Hard cap on lines per side of the center line
pub const MAX_GRID_LINES: u32 = 200;
pub const MIN_GRID_SPACING: f32 = 0.1;
pub const MAX_GRID_SPACING: f32 = 2.0;
/// Target number of cells between the center and the edge
pub const GRID_DIVISIONS: f32 = 8.0;

/// Size and spacing of the grid for a set of bounds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    /// Bounding radius of the content, at least 1
    pub half_extent: f32,
    /// Distance between adjacent lines
    pub spacing: f32,
    /// Lines on each side of the center line
    pub line_count: u32,
    /// Half-length of each line: `half_extent` snapped up to a multiple of `spacing`
    pub extent: f32,
}

impl GridSpec {
    pub fn from_bounds(bounds: &Bounds) -> Self {
        let half_extent = bounds.radius().max(1.0);
        let spacing = (half_extent / GRID_DIVISIONS).clamp(MIN_GRID_SPACING, MAX_GRID_SPACING);

        let steps = (half_extent / spacing).ceil();
        let extent = steps * spacing;
        // Float-to-int casts saturate, so huge bounds still land on the cap
        let line_count = (steps as u32).clamp(1, MAX_GRID_LINES);

        Self {
            half_extent,
            spacing,
            line_count,
            extent,
        }
    }

    /// Number of line segments the mesh will contain
    #[inline]
    pub fn segment_count(&self) -> usize {
        2 * (2 * self.line_count as usize + 1)
    }
}

/// Where the grid sits for the given bounds: centered under the content
pub fn grid_origin(bounds: &Bounds) -> Vec3 {
    Vec3::new(bounds.center.x, bounds.min().y, bounds.center.z)
}

/// Line-list mesh in grid-local space
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridMesh {
    pub vertices: Vec<Vec3>,
    pub colors: Vec<[f32; 4]>,
    /// Pairs of vertex indices, one pair per segment
    pub indices: Vec<u32>,
}

impl GridMesh {
    pub const LINE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.25];

    pub fn build(spec: &GridSpec) -> Self {
        let segments = spec.segment_count();
        let mut mesh = Self {
            vertices: Vec::with_capacity(segments * 2),
            colors: Vec::with_capacity(segments * 2),
            indices: Vec::with_capacity(segments * 2),
        };

        let extent = spec.extent;
        let n = spec.line_count as i64;
        for i in -n..=n {
            let offset = i as f32 * spec.spacing;
            mesh.add_line(Vec3::new(-extent, 0.0, offset), Vec3::new(extent, 0.0, offset));
            mesh.add_line(Vec3::new(offset, 0.0, -extent), Vec3::new(offset, 0.0, extent));
        }

        mesh
    }

    fn add_line(&mut self, a: Vec3, b: Vec3) {
        let index = self.vertices.len() as u32;
        self.vertices.push(a);
        self.vertices.push(b);
        self.colors.push(Self::LINE_COLOR);
        self.colors.push(Self::LINE_COLOR);
        self.indices.push(index);
        self.indices.push(index + 1);
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }
}

/// Blend state for the grid lines
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMaterial {
    pub color: [f32; 4],
    pub alpha_blend: bool,
    pub cull: bool,
    pub depth_write: bool,
    pub casts_shadows: bool,
}

impl Default for GridMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 0.35],
            alpha_blend: true,
            cull: false,
            depth_write: false,
            casts_shadows: false,
        }
    }
}

/// Owner of the grid's host object and mesh.
///
/// Resources are created on first use and released explicitly when the grid
/// is no longer wanted or the session is torn down.
#[derive(Debug, Default)]
pub struct GridLayer {
    material: GridMaterial,
    object: Option<NodeId>,
    mesh: Option<GridMesh>,
    spec: Option<GridSpec>,
    origin: Vec3,
}

impl GridLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the grid for `bounds`, or release it when `wanted` is false
    pub fn update<H: SceneHost + ?Sized>(&mut self, host: &mut H, bounds: &Bounds, wanted: bool) {
        if !wanted {
            self.release(host);
            return;
        }

        let Some(object) = self.ensure_object(host) else {
            return;
        };

        let spec = GridSpec::from_bounds(bounds);
        if self.spec != Some(spec) || self.mesh.is_none() {
            let mesh = GridMesh::build(&spec);
            host.upload_grid_mesh(object, &mesh);
            log::debug!(
                "Grid rebuilt: spacing {:.3}, {} lines per side, {} segments",
                spec.spacing,
                spec.line_count,
                mesh.segment_count()
            );
            self.mesh = Some(mesh);
            self.spec = Some(spec);
        }

        self.origin = grid_origin(bounds);
        host.set_position(object, self.origin);
        host.set_active(object, true);
    }

    fn ensure_object<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Option<NodeId> {
        if let Some(object) = self.object {
            return Some(object);
        }

        match host.create_grid_object(&self.material) {
            Some(object) => {
                host.move_to_render_scene(object);
                self.object = Some(object);
                Some(object)
            }
            None => {
                log::warn!("Scene host could not create the grid object");
                None
            }
        }
    }

    /// Destroy the host object and drop the mesh
    pub fn release<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(object) = self.object.take() {
            host.destroy(object);
        }
        self.mesh = None;
        self.spec = None;
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.object.is_some()
    }

    pub fn spec(&self) -> Option<&GridSpec> {
        self.spec.as_ref()
    }

    pub fn mesh(&self) -> Option<&GridMesh> {
        self.mesh.as_ref()
    }

    pub fn object(&self) -> Option<NodeId> {
        self.object
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}
