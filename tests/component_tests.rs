use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use hero_scene::animation::DragPhase;
use hero_scene::component::{HeroScene, LifecycleState};
use hero_scene::config::SceneConfig;
use hero_scene::core::controller::{PointerEvent, PointerHandler};
use hero_scene::core::render_pipeline::{FrameView, RenderSurface};
use hero_scene::core::window::SurfaceSize;
use hero_scene::errors::{AssetError, SceneError};
use hero_scene::loaders::ModelAsset;
use hero_scene::scene::{geometry, ObjectId, SceneObject};
use hero_scene::theme::{Theme, ThemeSignal, ThemeSource};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Resize(SurfaceSize),
    Add(ObjectId),
    Draw { number: u64, theme: Theme },
}

/// Records every call; optionally fails the next draws with a given error.
struct FakeSurface {
    log: Rc<RefCell<Vec<Call>>>,
    fail_next: Rc<RefCell<Option<wgpu::SurfaceError>>>,
}

impl RenderSurface for FakeSurface {
    fn resize(&mut self, size: SurfaceSize) {
        self.log.borrow_mut().push(Call::Resize(size));
    }

    fn add_object(&mut self, id: ObjectId, _object: &SceneObject) {
        self.log.borrow_mut().push(Call::Add(id));
    }

    fn draw(&mut self, view: &FrameView<'_>) -> Result<(), SceneError> {
        if let Some(err) = self.fail_next.borrow_mut().take() {
            return Err(err.into());
        }
        self.log.borrow_mut().push(Call::Draw {
            number: view.frame.number,
            theme: view.scene.theme(),
        });
        Ok(())
    }
}

struct Harness {
    hero: HeroScene<FakeSurface>,
    themes: ThemeSignal,
    log: Rc<RefCell<Vec<Call>>>,
    fail_next: Rc<RefCell<Option<wgpu::SurfaceError>>>,
}

fn mount_with(config: SceneConfig) -> Harness {
    let themes = ThemeSignal::new(Theme::Dark);
    let log = Rc::new(RefCell::new(Vec::new()));
    let fail_next = Rc::new(RefCell::new(None));

    let surface = FakeSurface {
        log: log.clone(),
        fail_next: fail_next.clone(),
    };
    let hero = HeroScene::mount(&config, SurfaceSize::new(800, 600), &themes, |_, _| Ok(surface)).unwrap();

    Harness {
        hero,
        themes,
        log,
        fail_next,
    }
}

fn mount() -> Harness {
    mount_with(SceneConfig::hero())
}

fn draws(log: &Rc<RefCell<Vec<Call>>>) -> usize {
    log.borrow().iter().filter(|c| matches!(c, Call::Draw { .. })).count()
}

fn cube_asset() -> ModelAsset {
    ModelAsset {
        name: "cube".into(),
        mesh: Arc::new(geometry::cuboid(1.0, 1.0, 1.0)),
    }
}

#[cfg(test)]
mod component_tests {
    use super::*;

    #[test]
    fn test_mount_runs_and_draws() {
        let mut h = mount();
        assert_eq!(h.hero.state(), LifecycleState::Running);

        let info = h.hero.frame_at(0.5).unwrap();

        assert_eq!(info.number, 1);
        assert_eq!(h.log.borrow().last(), Some(&Call::Draw { number: 1, theme: Theme::Dark }));
    }

    #[test]
    fn test_mount_without_surface_still_animates() {
        let themes = ThemeSignal::default();
        let mut hero: HeroScene<FakeSurface> =
            HeroScene::mount(&SceneConfig::hero(), SurfaceSize::new(800, 600), &themes, |_, _| {
                Err(SceneError::AdapterUnavailable("headless".into()))
            })
            .unwrap();

        assert!(hero.surface().is_none());
        assert!(hero.frame_at(1.0).is_some());

        let core = hero.scene().find("core").unwrap();
        assert!((hero.scene().transform(core).unwrap().rotation.x - (0.2 + 0.0625 * 0.5f32.cos())).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SceneConfig::hero();
        config.drag_target = Some("missing".into());

        let themes = ThemeSignal::default();
        let result = HeroScene::<FakeSurface>::mount(&config, SurfaceSize::new(1, 1), &themes, |_, _| {
            unreachable!("surface acquired for an invalid config")
        });

        assert!(matches!(result, Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_mount_takes_current_theme() {
        let themes = ThemeSignal::new(Theme::Light);
        let hero: HeroScene<FakeSurface> =
            HeroScene::mount(&SceneConfig::hero(), SurfaceSize::new(800, 600), &themes, |_, _| {
                Err(SceneError::AdapterUnavailable("headless".into()))
            })
            .unwrap();

        assert_eq!(hero.theme(), Theme::Light);
        assert_eq!(hero.scene().clear_color(), SceneConfig::hero().background.light);
    }

    #[test]
    fn test_theme_change_repaints_next_frame() {
        let mut h = mount();
        h.hero.frame_at(0.1);

        h.themes.set(Theme::Light);
        h.hero.frame_at(0.2);

        assert_eq!(h.log.borrow().last(), Some(&Call::Draw { number: 2, theme: Theme::Light }));
        let core = h.hero.scene().find("core").unwrap();
        let material = &h.hero.scene().object(core).unwrap().material;
        assert_eq!(material.color, material.palette.light);
    }

    #[test]
    fn test_theme_repaint_is_idempotent() {
        let mut h = mount();

        h.hero.apply_theme(Theme::Light);
        let once: Vec<_> = h.hero.scene().objects.iter().map(|o| o.material.clone()).collect();
        let particles_once = h.hero.scene().particles.as_ref().unwrap().color;

        h.hero.apply_theme(Theme::Light);
        let twice: Vec<_> = h.hero.scene().objects.iter().map(|o| o.material.clone()).collect();

        assert_eq!(once, twice);
        assert_eq!(h.hero.scene().particles.as_ref().unwrap().color, particles_once);
    }

    #[test]
    fn test_drag_overrides_time_rotation() {
        let mut h = mount();
        let core = h.hero.drag_target().unwrap();

        h.hero.frame_at(1.0);
        h.hero.handle_pointer(PointerEvent::Moved(Vec2::new(200.0, 200.0)));
        h.hero.handle_pointer(PointerEvent::Pressed(Vec2::new(200.0, 200.0)));
        assert_eq!(h.hero.state(), LifecycleState::Dragging);

        let before = h.hero.scene().transform(core).unwrap().rotation;
        h.hero.handle_pointer(PointerEvent::Moved(Vec2::new(230.0, 190.0)));
        // A large jump in time must not move the held axes.
        h.hero.frame_at(50.0);
        let after = h.hero.scene().transform(core).unwrap().rotation;

        assert!((after.x - before.x - (-10.0 * 0.01)).abs() < 1e-5);
        assert!((after.y - before.y - 30.0 * 0.01).abs() < 1e-5);
    }

    #[test]
    fn test_release_coasts_then_settles_on_idle_spin() {
        let mut h = mount();
        let core = h.hero.drag_target().unwrap();

        h.hero.handle_pointer(PointerEvent::Pressed(Vec2::ZERO));
        h.hero.handle_pointer(PointerEvent::Moved(Vec2::new(40.0, 0.0)));
        h.hero.handle_pointer(PointerEvent::Released);
        assert_eq!(h.hero.state(), LifecycleState::Running);
        assert_eq!(h.hero.drag().phase(), DragPhase::Coasting);

        let mut t = 0.0;
        for _ in 0..1000 {
            t += 1.0 / 60.0;
            h.hero.frame_at(t);
        }
        assert_eq!(h.hero.drag().phase(), DragPhase::Idle);

        let before = h.hero.scene().transform(core).unwrap().rotation;
        h.hero.frame_at(t + 1.0 / 60.0);
        let after = h.hero.scene().transform(core).unwrap().rotation;
        let idle = h.hero.drag().config().idle_velocity();
        assert!((after.x - before.x - idle.x).abs() < 1e-6);
        assert!((after.y - before.y - idle.y).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_leaving_ends_drag() {
        let mut h = mount();
        h.hero.handle_pointer(PointerEvent::Pressed(Vec2::ZERO));
        h.hero.handle_pointer(PointerEvent::Left);

        assert_eq!(h.hero.state(), LifecycleState::Running);
        assert!(!h.hero.drag().is_dragging());
    }

    #[test]
    fn test_resize_updates_camera_and_surface() {
        let mut h = mount();

        h.hero.resize(SurfaceSize::new(1000, 500));
        h.hero.resize(SurfaceSize::new(0, 0));

        assert!((h.hero.camera().aspect - 2.0).abs() < 1e-6);
        let resizes: Vec<_> = h.log.borrow().iter().filter(|c| matches!(c, Call::Resize(_))).cloned().collect();
        assert_eq!(resizes, vec![Call::Resize(SurfaceSize::new(1000, 500))]);
    }

    #[test]
    fn test_lost_surface_is_reconfigured() {
        let mut h = mount();
        *h.fail_next.borrow_mut() = Some(wgpu::SurfaceError::Lost);

        h.hero.frame_at(0.1);
        assert_eq!(h.log.borrow().last(), Some(&Call::Resize(SurfaceSize::new(800, 600))));

        h.hero.frame_at(0.2);
        assert_eq!(draws(&h.log), 1);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut h = mount();
        h.hero.frame_at(0.1);
        let core = h.hero.scene().find("core").unwrap();

        h.hero.unmount();
        let calls = h.log.borrow().len();
        let transforms = h.hero.scene().transforms.clone();
        let aspect = h.hero.camera().aspect;

        assert_eq!(h.hero.state(), LifecycleState::TornDown);
        assert_eq!(h.hero.frame_at(1.0), None);
        assert_eq!(h.hero.frame(), None);
        h.hero.resize(SurfaceSize::new(300, 900));
        h.hero.handle_pointer(PointerEvent::Pressed(Vec2::ZERO));
        h.hero.handle_pointer(PointerEvent::Moved(Vec2::new(50.0, 50.0)));
        h.themes.toggle();
        h.hero.apply_theme(Theme::Light);

        assert_eq!(h.log.borrow().len(), calls);
        assert_eq!(h.hero.scene().transforms, transforms);
        assert_eq!(h.hero.camera().aspect, aspect);
        assert_eq!(h.hero.theme(), Theme::Dark);
        assert_eq!(h.hero.drag().phase(), DragPhase::Untouched);
        assert!(h.hero.surface().is_none());
        assert_eq!(h.themes.subscriber_count(), 0);
        assert!(h.hero.scene().transform(core).is_some());
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut h = mount();
        h.hero.unmount();
        h.hero.unmount();
        assert_eq!(h.hero.state(), LifecycleState::TornDown);
    }

    #[test]
    fn test_stopping_loop_handle_stops_frames() {
        let mut h = mount();
        let handle = h.hero.loop_handle();

        handle.stop();
        handle.stop();

        assert!(!h.hero.is_live());
        assert_eq!(h.hero.frame_at(1.0), None);
        assert_eq!(draws(&h.log), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let h = mount();
        let themes = h.themes.clone();
        assert_eq!(themes.subscriber_count(), 1);

        drop(h);
        themes.toggle();
        assert_eq!(themes.subscriber_count(), 0);
    }

    #[test]
    fn test_attach_model_adds_animated_object() {
        let mut h = mount();
        let before = h.hero.scene().len();

        let id = h.hero.attach_model(Ok(cube_asset())).unwrap();

        assert_eq!(id, ObjectId(before));
        assert_eq!(h.log.borrow().last(), Some(&Call::Add(id)));
        assert_eq!(h.hero.scene().object(id).unwrap().shape.kind(), "mesh");

        h.hero.frame_at(2.0);
        let transform = h.hero.scene().transform(id).unwrap();
        assert_eq!(transform.position, Vec3::new(0.0, -2.5, 3.0));
        assert!((transform.rotation.y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_failed_model_leaves_scene_unchanged() {
        let mut h = mount();
        let before = h.hero.scene().len();

        let result = h.hero.attach_model(Err(AssetError::NoGeometry("empty.gltf".into())));

        assert_eq!(result, None);
        assert_eq!(h.hero.scene().len(), before);
        assert!(h.hero.frame_at(0.1).is_some());
    }

    #[test]
    fn test_model_after_teardown_is_discarded() {
        let mut h = mount();
        let before = h.hero.scene().len();
        h.hero.unmount();

        assert_eq!(h.hero.attach_model(Ok(cube_asset())), None);
        assert_eq!(h.hero.scene().len(), before);
    }
}
