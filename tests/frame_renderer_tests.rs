//! Frame Renderer Tests
//!
//! Tests for:
//! - The Setup → Cull → Draw → Submit sequence and its recorded trace
//! - Abort semantics when culling parameters cannot be derived
//! - Draw-order invariants (Opaque → Skybox → Transparent)
//! - Effect pass execution, skipping and scope nesting
//! - Renderer reuse across frames (no command leakage)
//! - Frame observer hooks

use std::cell::Cell;
use std::rc::Rc;

use glam::{Vec3, Vec4};

use inkline::{
    CameraKind, ClearFlags, Drawable, DrawableKey, DrawableWorld, EffectId, EffectPass,
    EffectPassProvider, FrameContext, FrameObserver, FrameRenderer, FrameState, FrameSurfaces,
    FrustumCuller, InsertionPoint, RenderCamera, RenderPassRegistry, SurfaceId, TraceDevice,
};
use inkline::device::TraceEvent;
use inkline::interner;

const COLOR_TARGET: SurfaceId = SurfaceId(1);
const DEPTH_TARGET: SurfaceId = SurfaceId(2);

fn surfaces() -> FrameSurfaces {
    FrameSurfaces {
        color: COLOR_TARGET,
        depth: DEPTH_TARGET,
    }
}

fn game_camera() -> RenderCamera {
    RenderCamera::new_perspective(60.0, 1.0, 0.1, 100.0)
        .with_clear(ClearFlags::Color, Vec4::new(0.1, 0.1, 0.1, 1.0))
}

/// A camera whose culling parameters cannot be derived.
fn degenerate_camera() -> RenderCamera {
    RenderCamera::new_perspective(60.0, 1.0, 100.0, 0.1)
}

fn default_technique() -> interner::Name {
    interner::intern(interner::DEFAULT_TECHNIQUE)
}

/// Two opaque drawables (near and far) and one transparent drawable,
/// all in front of the camera at the origin looking down -Z.
fn scene() -> (DrawableWorld, Vec<DrawableKey>) {
    let mut world = DrawableWorld::new();
    let near_opaque = world.insert(Drawable::opaque(Vec3::new(0.0, 0.0, -5.0), 1.0, 1));
    let far_opaque = world.insert(Drawable::opaque(Vec3::new(0.0, 0.0, -20.0), 1.0, 1));
    let transparent = world.insert(Drawable::transparent(Vec3::new(0.0, 0.0, -10.0), 1.0, 1));
    (world, vec![near_opaque, far_opaque, transparent])
}

fn render_once(
    world: &DrawableWorld,
    camera: &RenderCamera,
    registry: &mut RenderPassRegistry,
    device: &mut TraceDevice,
) -> FrameState {
    let _ = env_logger::builder().is_test(true).try_init();
    let culler = FrustumCuller::new(world, default_technique());
    let frame = FrameContext::new(camera, surfaces());
    let mut renderer = FrameRenderer::new();
    renderer.render(&frame, &culler, registry, device);
    renderer.state()
}

fn position_of(events: &[TraceEvent], wanted: &TraceEvent) -> usize {
    events
        .iter()
        .position(|e| e == wanted)
        .unwrap_or_else(|| panic!("event {wanted:?} not found in {events:?}"))
}

// ============================================================================
// Scenario A: full frame with color clear
// ============================================================================

#[test]
fn full_frame_trace_matches_contract() {
    let (world, keys) = scene();
    let camera = game_camera();
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();

    let state = render_once(&world, &camera, &mut registry, &mut device);
    assert_eq!(state, FrameState::Submitted);

    assert_eq!(
        device.events(),
        &[
            TraceEvent::BindCamera { camera: "Camera".to_string() },
            TraceEvent::Clear { color: true, depth: true },
            TraceEvent::BeginScope("Camera".to_string()),
            // Opaque, front to back
            TraceEvent::DrawGeometry(keys[0]),
            TraceEvent::DrawGeometry(keys[1]),
            TraceEvent::DrawSkybox,
            TraceEvent::DrawGeometry(keys[2]),
            TraceEvent::EndScope("Camera".to_string()),
            TraceEvent::Submit,
        ]
    );
}

#[test]
fn depth_only_clear_for_depth_flags() {
    let (world, _) = scene();
    let camera = game_camera().with_clear(ClearFlags::Depth, Vec4::ZERO);
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();

    render_once(&world, &camera, &mut registry, &mut device);
    assert!(device
        .events()
        .contains(&TraceEvent::Clear { color: false, depth: true }));
}

#[test]
fn no_clear_recorded_for_nothing_flags() {
    let (world, _) = scene();
    let camera = game_camera().with_clear(ClearFlags::Nothing, Vec4::ZERO);
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();

    render_once(&world, &camera, &mut registry, &mut device);
    assert!(!device
        .events()
        .iter()
        .any(|e| matches!(e, TraceEvent::Clear { .. })));
}

// ============================================================================
// Scenario B: abort on unsupported culling
// ============================================================================

#[test]
fn abort_produces_no_draws_and_no_submit() {
    let (world, _) = scene();
    let camera = degenerate_camera();
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();

    let state = render_once(&world, &camera, &mut registry, &mut device);

    assert_eq!(state, FrameState::Aborted);
    assert_eq!(device.geometry_draw_count(), 0);
    assert_eq!(device.skybox_draw_count(), 0);
    assert_eq!(device.submit_count(), 0);
    // Only the camera bind from Setup reaches the device
    assert_eq!(
        device.events(),
        &[TraceEvent::BindCamera { camera: "Camera".to_string() }]
    );
}

#[test]
fn abort_executes_no_passes() {
    let (world, _) = scene();
    let camera = degenerate_camera();
    let pass = EffectPass::new("VolumetricLight", InsertionPoint::BeforePostProcess)
        .with_effect(EffectId(7));
    let mut registry = RenderPassRegistry::new();
    registry.register(Box::new(EffectPassProvider::new(pass)));
    let mut device = TraceDevice::new();

    render_once(&world, &camera, &mut registry, &mut device);
    assert_eq!(device.blit_count(), 0);
}

#[test]
fn renderer_recovers_after_abort() {
    let (world, _) = scene();
    let bad = degenerate_camera();
    let good = game_camera();
    let culler = FrustumCuller::new(&world, default_technique());
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();
    let mut renderer = FrameRenderer::new();

    renderer.render(&FrameContext::new(&bad, surfaces()), &culler, &mut registry, &mut device);
    assert_eq!(renderer.state(), FrameState::Aborted);

    // The aborted frame leaves nothing behind for the next one
    renderer.render(&FrameContext::new(&good, surfaces()), &culler, &mut registry, &mut device);
    assert_eq!(renderer.state(), FrameState::Submitted);
    assert_eq!(device.geometry_draw_count(), 3);
    assert_eq!(device.submit_count(), 1);
}

// ============================================================================
// Draw-order invariants
// ============================================================================

#[test]
fn opaque_precedes_skybox_precedes_transparent() {
    let (world, keys) = scene();
    let camera = game_camera();
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();

    render_once(&world, &camera, &mut registry, &mut device);

    let events = device.events();
    let skybox = position_of(events, &TraceEvent::DrawSkybox);
    for key in &keys[..2] {
        assert!(
            position_of(events, &TraceEvent::DrawGeometry(*key)) < skybox,
            "opaque draw after skybox"
        );
    }
    assert!(
        position_of(events, &TraceEvent::DrawGeometry(keys[2])) > skybox,
        "transparent draw before skybox"
    );
}

#[test]
fn exactly_one_skybox_draw_even_for_empty_scenes() {
    let world = DrawableWorld::new();
    let camera = game_camera();
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();

    render_once(&world, &camera, &mut registry, &mut device);
    assert_eq!(device.skybox_draw_count(), 1);
    assert_eq!(device.geometry_draw_count(), 0);
}

#[test]
fn drawables_outside_both_ranges_are_not_drawn() {
    let mut world = DrawableWorld::new();
    world.insert(Drawable::opaque(Vec3::new(0.0, 0.0, -5.0), 1.0, 0).with_queue(6000));
    let camera = game_camera();
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();

    render_once(&world, &camera, &mut registry, &mut device);
    assert_eq!(device.geometry_draw_count(), 0);
}

// ============================================================================
// Scenario C / D: effect passes
// ============================================================================

#[test]
fn enabled_pass_executes_once_between_draw_and_submit() {
    let (world, _) = scene();
    let camera = game_camera();
    let pass = EffectPass::new("VolumetricLight", InsertionPoint::BeforePostProcess)
        .with_effect(EffectId(7));
    let mut registry = RenderPassRegistry::new();
    registry.register(Box::new(EffectPassProvider::new(pass)));
    let mut device = TraceDevice::new();

    render_once(&world, &camera, &mut registry, &mut device);

    let events = device.events();
    assert_eq!(device.blit_count(), 1);

    let blit = position_of(
        events,
        &TraceEvent::Blit { effect: EffectId(7), dest: COLOR_TARGET },
    );
    let skybox = position_of(events, &TraceEvent::DrawSkybox);
    let submit = position_of(events, &TraceEvent::Submit);
    assert!(blit > skybox && blit < submit);

    // The pass's own profiling scope nests inside the camera scope
    let begin = position_of(events, &TraceEvent::BeginScope("VolumetricLight".to_string()));
    let end = position_of(events, &TraceEvent::EndScope("VolumetricLight".to_string()));
    let camera_end = position_of(events, &TraceEvent::EndScope("Camera".to_string()));
    assert!(begin < blit && blit < end && end < camera_end);
}

#[test]
fn pass_with_null_effect_is_skipped_silently() {
    let (world, _) = scene();
    let camera = game_camera();
    let pass = EffectPass::new("VolumetricLight", InsertionPoint::BeforePostProcess);
    let mut registry = RenderPassRegistry::new();
    registry.register(Box::new(EffectPassProvider::new(pass)));
    let mut device = TraceDevice::new();

    render_once(&world, &camera, &mut registry, &mut device);

    // Frame otherwise unaffected
    assert_eq!(device.blit_count(), 0);
    assert_eq!(device.geometry_draw_count(), 3);
    assert_eq!(device.submit_count(), 1);
}

#[test]
fn game_only_pass_never_runs_for_other_camera_kinds() {
    let (world, _) = scene();
    for kind in [CameraKind::SceneView, CameraKind::Preview, CameraKind::Reflection] {
        let camera = game_camera().with_kind(kind);
        let pass = EffectPass::new("VolumetricLight", InsertionPoint::BeforePostProcess)
            .with_effect(EffectId(7));
        let mut registry = RenderPassRegistry::new();
        registry.register(Box::new(EffectPassProvider::new(pass)));
        let mut device = TraceDevice::new();

        render_once(&world, &camera, &mut registry, &mut device);
        assert_eq!(device.blit_count(), 0, "pass ran for {kind:?}");
        assert_eq!(device.submit_count(), 1, "frame aborted for {kind:?}");
    }
}

// ============================================================================
// Reuse
// ============================================================================

#[test]
fn renderer_reuse_leaks_no_commands() {
    let (world, _) = scene();
    let camera = game_camera();
    let culler = FrustumCuller::new(&world, default_technique());
    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();
    let mut renderer = FrameRenderer::new();

    let frame = FrameContext::new(&camera, surfaces());
    renderer.render(&frame, &culler, &mut registry, &mut device);
    let first = device.events().len();

    let frame = FrameContext::new(&camera, surfaces());
    renderer.render(&frame, &culler, &mut registry, &mut device);

    // The second frame records exactly as much as the first
    assert_eq!(device.events().len(), 2 * first);
    assert_eq!(device.submit_count(), 2);
}

// ============================================================================
// Observer hooks
// ============================================================================

#[derive(Default)]
struct CountingObserver {
    prepared: Rc<Cell<u32>>,
    drawn: Rc<Cell<u32>>,
    aborted: Rc<Cell<u32>>,
    submitted: Rc<Cell<u32>>,
}

impl FrameObserver for CountingObserver {
    fn frame_prepared(&mut self, _camera: &RenderCamera) {
        self.prepared.set(self.prepared.get() + 1);
    }
    fn geometry_drawn(&mut self, _stream: &mut inkline::CommandStream, _frame: &FrameContext) {
        self.drawn.set(self.drawn.get() + 1);
    }
    fn frame_aborted(&mut self, _camera: &RenderCamera) {
        self.aborted.set(self.aborted.get() + 1);
    }
    fn frame_submitted(&mut self, _camera: &RenderCamera) {
        self.submitted.set(self.submitted.get() + 1);
    }
}

#[test]
fn observer_sees_submit_path_hooks() {
    let (world, _) = scene();
    let camera = game_camera();
    let culler = FrustumCuller::new(&world, default_technique());
    let observer = CountingObserver::default();
    let (prepared, drawn, aborted, submitted) = (
        observer.prepared.clone(),
        observer.drawn.clone(),
        observer.aborted.clone(),
        observer.submitted.clone(),
    );

    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();
    let mut renderer = FrameRenderer::new().with_observer(Box::new(observer));
    renderer.render(&FrameContext::new(&camera, surfaces()), &culler, &mut registry, &mut device);

    assert_eq!(prepared.get(), 1);
    assert_eq!(drawn.get(), 1);
    assert_eq!(aborted.get(), 0);
    assert_eq!(submitted.get(), 1);
}

#[test]
fn observer_sees_abort_hook() {
    let (world, _) = scene();
    let camera = degenerate_camera();
    let culler = FrustumCuller::new(&world, default_technique());
    let observer = CountingObserver::default();
    let (drawn, aborted, submitted) = (
        observer.drawn.clone(),
        observer.aborted.clone(),
        observer.submitted.clone(),
    );

    let mut registry = RenderPassRegistry::new();
    let mut device = TraceDevice::new();
    let mut renderer = FrameRenderer::new().with_observer(Box::new(observer));
    renderer.render(&FrameContext::new(&camera, surfaces()), &culler, &mut registry, &mut device);

    assert_eq!(aborted.get(), 1);
    assert_eq!(drawn.get(), 0);
    assert_eq!(submitted.get(), 0);
}
