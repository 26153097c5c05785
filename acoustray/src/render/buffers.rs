//! Line-list buffers built from engine ray histories.
//!
//! Every ray of a source gets the same number of position slots, its *stride*
//! (`max_order + 1`). Slot `i * stride` holds the source position and the next
//! slots hold the ray's reflection points. With a fixed stride the edges of ray
//! `i` are always `(i * stride + k, i * stride + k + 1)` for `k < max_order`, so
//! limiting the drawing to reflection order `k` only needs the first `k` edges of
//! each ray's run, without touching the positions.

use crate::math::Vec3;
use crate::simulation::{Ray, SourceRays};
use std::sync::Arc;

/// Position and edge-index buffers for one source.
#[derive(Debug, Clone, PartialEq)]
pub struct RayBuffers {
    positions: Arc<[Vec3]>,
    indices: Vec<[u32; 2]>,
    max_order: usize,
    ray_count: usize,
}

impl RayBuffers {
    /// Compiles the buffers of `source` with room for `max_order` reflections per
    /// ray.
    ///
    /// Slots past the end of a shorter history repeat its last point, giving
    /// zero-length edges. Histories longer than `max_order` are cut.
    pub fn compile(source: &SourceRays, max_order: usize) -> Self {
        let stride = max_order + 1;
        let ray_count = source.rays.len();
        let mut positions = Vec::with_capacity(ray_count * stride);
        let mut indices = Vec::with_capacity(ray_count * max_order);
        let mut truncated = 0;

        for (ri, ray) in source.rays.iter().enumerate() {
            let base = ri * stride;
            if ray.order() > max_order {
                truncated += 1;
            }
            let hist = &ray.refpts_hist[..ray.order().min(max_order)];

            positions.push(source.coord);
            positions.extend_from_slice(hist);
            let last = hist.last().copied().unwrap_or(source.coord);
            positions.resize(base + stride, last);

            indices.extend((base..base + max_order).map(|slot| [slot as u32, slot as u32 + 1]));
        }

        if truncated > 0 {
            log::warn!(
                "{} of {} rays have more than {} reflections; their tails are not drawn",
                truncated,
                ray_count,
                max_order
            );
        }
        debug_assert_eq!(indices.len(), ray_count * max_order);

        Self {
            positions: positions.into(),
            indices,
            max_order,
            ray_count,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Shared handle to the positions, for building drawables without a copy
    pub fn shared_positions(&self) -> Arc<[Vec3]> {
        Arc::clone(&self.positions)
    }

    /// All edges, ray by ray, `max_order` edges per ray
    pub fn indices(&self) -> &[[u32; 2]] {
        &self.indices
    }

    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Position slots reserved per ray
    pub fn stride(&self) -> usize {
        self.max_order + 1
    }

    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Edges reaching reflection order `order` at most. Orders above
    /// [`max_order`](Self::max_order) are clamped.
    pub fn edges_up_to(&self, order: usize) -> OrderedEdges<'_> {
        OrderedEdges {
            indices: &self.indices,
            run: self.max_order,
            order: order.min(self.max_order),
        }
    }
}

/// View over the first `order` edges of every ray.
#[derive(Debug, Clone, Copy)]
pub struct OrderedEdges<'a> {
    indices: &'a [[u32; 2]],
    run: usize,
    order: usize,
}

impl<'a> OrderedEdges<'a> {
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of edges in the view
    pub fn len(&self) -> usize {
        if self.run == 0 {
            0
        } else {
            self.indices.len() / self.run * self.order
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = [u32; 2]> + 'a {
        let order = self.order;
        self.indices
            .chunks(self.run.max(1))
            .flat_map(move |edges| edges.iter().take(order).copied())
    }

    pub fn to_vec(&self) -> Vec<[u32; 2]> {
        let mut edges = Vec::with_capacity(self.len());
        edges.extend(self.iter());
        edges
    }
}

/// Compiles the buffers of every source.
///
/// By default the reflection budget of every source comes from the first ray of
/// the first source. With `per_source_max_order` each source is sized by its own
/// longest ray instead.
pub fn compile_sources(sources: &[SourceRays], per_source_max_order: bool) -> Vec<RayBuffers> {
    let reference = sources
        .first()
        .and_then(|s| s.rays.first())
        .map_or(0, Ray::order);

    sources
        .iter()
        .map(|source| {
            let max_order = if per_source_max_order {
                source.max_order()
            } else {
                reference
            };
            RayBuffers::compile(source, max_order)
        })
        .collect()
}
