use acoustray::config::{AirProperties, AlgorithmConfig};
use acoustray::materials::{MaterialRecord, SurfaceMaterial};
use acoustray::render::{CommandRecorder, DrawHandlerRegistry};
use acoustray::scene::{SceneEntity, TriMesh};
use acoustray::simulation::{EngineResult, Plane, Ray, ReceiverDesc, SourceDesc, SourceRays};
use acoustray::{
    AcoustRayEvent, AcoustRayWorld, RenderSettings, SimulationEngine, SimulationSettings, Vec3,
};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Keeps what it was given and answers each source with one ray hitting the
/// middle of the floor.
#[derive(Default)]
struct StubEngine {
    planes: Vec<Plane>,
    sources: Vec<SourceRays>,
}

impl SimulationEngine for StubEngine {
    fn set_configs(&mut self, _config: &AlgorithmConfig) -> EngineResult<()> {
        Ok(())
    }

    fn set_air(&mut self, _air: &AirProperties) -> EngineResult<()> {
        Ok(())
    }

    fn set_geometry(&mut self, planes: &[Plane]) -> EngineResult<()> {
        self.planes = planes.to_vec();
        Ok(())
    }

    fn set_raydir(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn set_receivers(&mut self, _receivers: &[ReceiverDesc]) -> EngineResult<()> {
        Ok(())
    }

    fn set_memory_init(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn set_sources(&mut self, sources: &[SourceDesc]) -> EngineResult<()> {
        self.sources = sources
            .iter()
            .map(|s| SourceRays::new(s.coord, vec![Ray::new(vec![Vec3::new(0.5, 0.5, 0.0)])]))
            .collect();
        Ok(())
    }

    fn run_statistical_reverberation(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn run_raytracing(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn take_sources(&mut self) -> Vec<SourceRays> {
        std::mem::take(&mut self.sources)
    }
}

#[test]
fn test_single_triangle_scene_end_to_end() {
    init_logging();

    let backend = Arc::new(DrawHandlerRegistry::new());
    let mut world = AcoustRayWorld::new(
        backend.clone(),
        SimulationSettings::default(),
        RenderSettings::default(),
    );
    world
        .materials_mut()
        .push(MaterialRecord::new(3, [0.1; 8], "panel"))
        .unwrap();

    let floor = TriMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![vec![0, 1, 2]]).unwrap();
    let scene = vec![
        SceneEntity::geometry("floor", floor).with_material(SurfaceMaterial::new(3, 0.2)),
        SceneEntity::source("speaker", Vec3::new(0.0, 0.0, 2.0)),
    ];

    let mut engine = StubEngine::default();
    let sources = world.run_simulation(&scene, &mut engine).unwrap();

    // What the engine saw
    assert_eq!(engine.planes.len(), 1);
    let plane = &engine.planes[0];
    assert!((plane.area - 0.5).abs() < 1e-6);
    assert!((plane.normal.z.abs() - 1.0).abs() < 1e-6);
    assert_eq!(plane.alpha, [0.1; 8]);
    assert_eq!(plane.s, 0.2);
    assert_eq!(sources.len(), 1);

    // What was compiled for drawing
    let buffers = &world.session().buffers().unwrap()[0];
    assert_eq!(
        buffers.positions(),
        &[Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.5, 0.5, 0.0)]
    );
    assert_eq!(buffers.indices(), &[[0, 1]]);

    // What gets drawn
    let mut frame = CommandRecorder::new();
    backend.redraw(&mut frame);
    assert_eq!(frame.line_count(), 1);
    let segments: Vec<_> = frame.batches().flat_map(|b| b.segments().collect::<Vec<_>>()).collect();
    assert_eq!(segments, vec![(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.5, 0.5, 0.0))]);

    let events = world.poll_events();
    assert!(events.iter().all(|e| !e.is_error()));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, AcoustRayEvent::SimulationFinished { sources: 1, .. }))
    );

    world.teardown();
    assert_eq!(backend.live_handlers(), 0);
}

#[test]
fn test_rerun_replaces_drawing() {
    init_logging();

    let backend = Arc::new(DrawHandlerRegistry::new());
    let mut world = AcoustRayWorld::new(
        backend.clone(),
        SimulationSettings::default(),
        RenderSettings::default().render_order(3),
    );
    let id = world.new_material().unwrap();
    let scene = vec![
        SceneEntity::geometry("room", TriMesh::room_box(Vec3::new(4.0, 4.0, 3.0)))
            .with_material(SurfaceMaterial::new(id, 0.1)),
        SceneEntity::source("a", Vec3::new(0.5, 0.0, 0.0)),
        SceneEntity::source("b", Vec3::new(-0.5, 0.0, 0.0)),
        SceneEntity::receiver("mic", Vec3::new(0.0, 1.0, 0.0)),
    ];

    let mut engine = StubEngine::default();
    world.run_simulation(&scene, &mut engine).unwrap();
    world.run_simulation(&scene, &mut engine).unwrap();

    assert_eq!(engine.planes.len(), 12);
    assert_eq!(backend.live_handlers(), 1);

    let mut frame = CommandRecorder::new();
    backend.redraw(&mut frame);
    assert_eq!(frame.batches().count(), 2);
}
