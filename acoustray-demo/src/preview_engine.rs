//! Small specular-only tracer used to preview ray paths without the real engine.

use acoustray::config::{AirProperties, AlgorithmConfig};
use acoustray::math::{NUM_BANDS, Vec3};
use acoustray::simulation::{
    EngineError, EngineResult, Plane, Ray, ReceiverDesc, SimulationEngine, SourceDesc, SourceRays,
};
use std::f32::consts::PI;

const EPSILON: f32 = 1e-5;

/// Traces `n_rays` evenly spread rays per source, reflecting them specularly
/// up to `transition_order` times. Rays that leave the geometry stop early.
#[derive(Default)]
pub struct PreviewEngine {
    config: Option<AlgorithmConfig>,
    air: Option<AirProperties>,
    planes: Vec<Plane>,
    directions: Vec<Vec3>,
    receivers: Vec<ReceiverDesc>,
    sources: Vec<SourceDesc>,
    results: Vec<SourceRays>,
    rt60: Option<f32>,
}

impl PreviewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sabine reverberation time from the last run, in seconds
    pub fn rt60(&self) -> Option<f32> {
        self.rt60
    }

    fn config(&self) -> EngineResult<&AlgorithmConfig> {
        self.config
            .as_ref()
            .ok_or_else(|| EngineError::new("engine is not configured"))
    }

    fn trace(&self, origin: Vec3, direction: Vec3, max_order: usize) -> Ray {
        let mut hist = Vec::with_capacity(max_order);
        let (mut origin, mut direction) = (origin, direction);
        let mut last_hit = None;

        while hist.len() < max_order {
            let hit = self
                .planes
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != last_hit)
                .filter_map(|(i, p)| intersect(origin, direction, &p.vertices).map(|t| (i, t)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let Some((index, t)) = hit else {
                break;
            };
            let point = origin + direction * t;
            let normal = self.planes[index].normal;
            hist.push(point);
            direction = direction - 2.0 * direction.dot(normal) * normal;
            origin = point;
            last_hit = Some(index);
        }
        Ray::new(hist)
    }
}

impl SimulationEngine for PreviewEngine {
    fn set_configs(&mut self, config: &AlgorithmConfig) -> EngineResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn set_air(&mut self, air: &AirProperties) -> EngineResult<()> {
        self.air = Some(*air);
        Ok(())
    }

    fn set_geometry(&mut self, planes: &[Plane]) -> EngineResult<()> {
        if planes.is_empty() {
            return Err(EngineError::new("scene has no reflective geometry"));
        }
        self.planes = planes.to_vec();
        Ok(())
    }

    fn set_raydir(&mut self) -> EngineResult<()> {
        let n_rays = self.config()?.n_rays as usize;
        self.directions = fibonacci_sphere(n_rays);
        log::debug!("Preview engine: {} ray directions", self.directions.len());
        Ok(())
    }

    fn set_receivers(&mut self, receivers: &[ReceiverDesc]) -> EngineResult<()> {
        self.receivers = receivers.to_vec();
        Ok(())
    }

    fn set_memory_init(&mut self) -> EngineResult<()> {
        self.results.clear();
        self.rt60 = None;
        Ok(())
    }

    fn set_sources(&mut self, sources: &[SourceDesc]) -> EngineResult<()> {
        self.sources = sources.to_vec();
        Ok(())
    }

    fn run_statistical_reverberation(&mut self) -> EngineResult<()> {
        // Divergence theorem over the closed surface; sign depends on winding.
        let volume = self
            .planes
            .iter()
            .map(|p| p.vertices[0].dot(p.vertices[1].cross(p.vertices[2])) / 6.0)
            .sum::<f32>()
            .abs();
        let absorption: f32 = self
            .planes
            .iter()
            .map(|p| p.area * p.alpha.iter().sum::<f32>() / NUM_BANDS as f32)
            .sum();
        if absorption > 0.0 && volume > 0.0 {
            let rt60 = 0.161 * volume / absorption;
            log::info!(
                "Preview engine: volume {:.1} m3, absorption area {:.2} m2, RT60 {:.2} s",
                volume,
                absorption,
                rt60
            );
            self.rt60 = Some(rt60);
        } else {
            log::warn!("Preview engine: geometry is open or fully reflective, no RT60");
        }
        Ok(())
    }

    fn run_raytracing(&mut self) -> EngineResult<()> {
        let max_order = self.config()?.transition_order as usize;
        if self.directions.is_empty() {
            return Err(EngineError::new("ray directions were not derived"));
        }
        self.results = self
            .sources
            .iter()
            .map(|source| {
                let rays = self
                    .directions
                    .iter()
                    .map(|&dir| self.trace(source.coord, dir, max_order))
                    .collect();
                SourceRays::new(source.coord, rays)
            })
            .collect();
        log::info!(
            "Preview engine: traced {} rays for {} sources, {} receivers ignored",
            self.directions.len() * self.sources.len(),
            self.sources.len(),
            self.receivers.len()
        );
        Ok(())
    }

    fn take_sources(&mut self) -> Vec<SourceRays> {
        std::mem::take(&mut self.results)
    }
}

/// Evenly spread unit vectors on the sphere.
fn fibonacci_sphere(n: usize) -> Vec<Vec3> {
    let golden_angle = PI * (3.0 - 5f32.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
            let radius = (1.0 - y * y).sqrt();
            let theta = golden_angle * i as f32;
            Vec3::new(theta.cos() * radius, y, theta.sin() * radius)
        })
        .collect()
}

/// Möller-Trumbore ray/triangle test, distance along `direction` on hit
fn intersect(origin: Vec3, direction: Vec3, [a, b, c]: &[Vec3; 3]) -> Option<f32> {
    let e1 = *b - *a;
    let e2 = *c - *a;
    let p = direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - *a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}
