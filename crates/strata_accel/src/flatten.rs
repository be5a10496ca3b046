//! Scene flattening shared by every accelerator kind.

use strata_core::Scene;
use strata_math::{Aabb, Float, Mat4Ext};

use crate::error::{BuildError, BuildResult};
use crate::report::{BuildEvent, BuildReporter, BuildStats};
use crate::triangle::{vertex_bound, TriAccel};

/// World-space triangles of a scene with their padded bounds.
#[derive(Debug, Default)]
pub(crate) struct FlatScene {
    pub triangles: Vec<TriAccel>,
    /// Padded bound of `triangles[i]`
    pub bounds: Vec<Aabb>,
    /// Counts known after flattening; tree counts are left at zero
    pub stats: BuildStats,
}

/// Transform every face of every primitive into world space.
///
/// Primitives without a mesh are skipped and reported. A mesh that fails
/// validation aborts the whole build.
pub(crate) fn flatten_scene(
    scene: &Scene,
    bound_epsilon: Float,
    reporter: &dyn BuildReporter,
) -> BuildResult<FlatScene> {
    let capacity = scene.total_triangle_count();
    let mut flat = FlatScene {
        triangles: Vec::with_capacity(capacity),
        bounds: Vec::with_capacity(capacity),
        stats: BuildStats {
            primitives: scene.primitive_count(),
            ..Default::default()
        },
    };

    for (primitive, prim) in scene.primitives.iter().enumerate() {
        let Some(mesh) = prim.mesh.as_deref() else {
            flat.stats.skipped_primitives += 1;
            reporter.report(&BuildEvent::PrimitiveSkipped { primitive });
            continue;
        };

        mesh.validate()
            .map_err(|source| BuildError::InvalidMesh { primitive, source })?;

        let transform = prim.transform();
        let world = |i: u32| transform.transform_point(mesh.positions[i as usize]);

        for (face, f) in mesh.indices.chunks_exact(3).enumerate() {
            let (p0, p1, p2) = (world(f[0]), world(f[1]), world(f[2]));
            flat.triangles.push(TriAccel::load(p0, p1, p2, primitive, face));
            flat.bounds.push(vertex_bound(p0, p1, p2).padded(bound_epsilon));
        }
    }

    flat.stats.triangles = flat.triangles.len();
    Ok(flat)
}
