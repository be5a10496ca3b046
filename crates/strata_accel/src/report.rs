//! Build statistics and diagnostics reporting.
//!
//! Accelerators never log directly during a build. They hand [`BuildEvent`]s
//! to an injected [`BuildReporter`]; [`LogReporter`] forwards them to the
//! `log` facade and is used when no reporter is given.

use crate::config::AccelKind;

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Primitives in the scene
    pub primitives: usize,
    /// Primitives without a mesh
    pub skipped_primitives: usize,
    /// Triangles flattened into the accelerator
    pub triangles: usize,
    /// Tree nodes (zero for the linear accelerator)
    pub nodes: usize,
    /// Leaf nodes
    pub leaves: usize,
    /// Depth of the deepest leaf, root at depth 1
    pub depth: usize,
}

/// Diagnostics emitted while building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// A primitive had no mesh and contributed no geometry.
    PrimitiveSkipped { primitive: usize },
    /// The build completed.
    Finished { kind: AccelKind, stats: BuildStats },
}

/// Receives build diagnostics.
pub trait BuildReporter: Send + Sync {
    fn report(&self, event: &BuildEvent);
}

impl<F> BuildReporter for F
where
    F: Fn(&BuildEvent) + Send + Sync,
{
    fn report(&self, event: &BuildEvent) {
        self(event)
    }
}

/// Forwards build events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl BuildReporter for LogReporter {
    fn report(&self, event: &BuildEvent) {
        match event {
            BuildEvent::PrimitiveSkipped { primitive } => {
                log::debug!("Primitive {} has no mesh, skipping", primitive);
            }
            BuildEvent::Finished { kind, stats } => {
                log::info!(
                    "{:?} built: {} triangles from {} primitives ({} skipped), {} nodes, {} leaves, depth {}",
                    kind,
                    stats.triangles,
                    stats.primitives,
                    stats.skipped_primitives,
                    stats.nodes,
                    stats.leaves,
                    stats.depth
                );
            }
        }
    }
}
