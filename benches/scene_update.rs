use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use hero_scene::animation::{DragState, RotationHold};
use hero_scene::config::SceneConfig;
use hero_scene::scene::geometry::{sphere, torus};
use hero_scene::scene::Scene;
use hero_scene::theme::Theme;

fn bench_animation(c: &mut Criterion) {
    let mut group = c.benchmark_group("animation");

    let (mut scene, driver) = Scene::build(&SceneConfig::hero()).expect("hero config is valid");
    let core = scene.find("core").expect("hero has a core sphere");

    group.bench_function("apply_hero", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t += 1.0 / 60.0;
            driver.apply(&mut scene, black_box(t), None);
        })
    });

    group.bench_function("apply_hero_dragging", |b| {
        let hold = Some(RotationHold::drag(core));
        let mut t = 0.0f32;
        b.iter(|| {
            t += 1.0 / 60.0;
            driver.apply(&mut scene, black_box(t), hold);
        })
    });

    group.bench_function("drag_coast_to_idle", |b| {
        b.iter(|| {
            let mut drag = DragState::default();
            drag.press(Vec2::ZERO);
            drag.move_to(black_box(Vec2::new(120.0, 40.0)));
            drag.release();
            for _ in 0..600 {
                black_box(drag.step());
            }
        })
    });

    group.bench_function("theme_repaint", |b| {
        let mut theme = Theme::Dark;
        b.iter(|| {
            theme = theme.toggled();
            scene.apply_theme(theme);
        })
    });

    group.finish();
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    group.sample_size(20);

    group.bench_function("core_sphere_100x200", |b| b.iter(|| sphere(black_box(1.0), 100, 200)));
    group.bench_function("torus_16x100", |b| b.iter(|| torus(black_box(0.6), 0.2, 16, 100)));

    group.bench_function("build_starfield", |b| {
        let config = SceneConfig::starfield();
        b.iter(|| Scene::build(black_box(&config)))
    });

    group.finish();
}

criterion_group!(benches, bench_animation, bench_geometry);
criterion_main!(benches);
