use std::path::PathBuf;

use hero_scene::config::{LightConfig, SceneConfig, ShapeConfig};
use hero_scene::errors::SceneError;
use hero_scene::scene::{Light, Scene};
use hero_scene::theme::{Color, Theme};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hero-scene-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_builtin_variants_validate() {
        SceneConfig::hero().validate().unwrap();
        SceneConfig::starfield().validate().unwrap();
    }

    #[test]
    fn test_hero_layout() {
        let config = SceneConfig::hero();
        let names: Vec<_> = config.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            ["core", "box-1", "box-2", "box-3", "torus-1", "torus-2", "orb-1", "orb-2", "orb-3"]
        );

        let core = &config.objects[0];
        assert_eq!(core.scale, 2.5);
        assert_eq!(
            core.shape,
            ShapeConfig::Sphere {
                radius: 1.0,
                width_segments: 100,
                height_segments: 200
            }
        );
        assert_eq!(core.material.color, Color::from_hex("#5B8ADF").unwrap());
        assert_eq!(config.camera.position, [0.0, 0.0, 8.0]);
        assert_eq!(config.camera.fov_degrees, 75.0);

        let particles = config.particles.unwrap();
        assert_eq!(particles.count, 150);
        assert_eq!(particles.extent, 15.0);
    }

    #[test]
    fn test_hero_lights() {
        let (scene, _) = Scene::build(&SceneConfig::hero()).unwrap();
        assert_eq!(scene.lights.len(), 5);
        assert_eq!(scene.lights.iter().filter(|l| l.is_ambient()).count(), 1);
        assert!(matches!(scene.lights[4], Light::Spot { angle, .. } if angle == 0.3));
    }

    #[test]
    fn test_starfield_is_dense() {
        let config = SceneConfig::starfield();
        assert_eq!(config.objects.len(), 1);
        assert_eq!(config.particles.unwrap().count, 20_000);
        assert!(config.camera.far >= 4000.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SceneConfig::hero();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"#5B8ADF\""));

        let parsed: SceneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_minimal_file() {
        let path = temp_file(
            "minimal.json",
            r##"{
                "camera": { "position": [0, 0, 5], "fov_degrees": 60, "near": 0.1, "far": 100, "auto_rotate_speed": 0 },
                "background": { "dark": "#000000", "light": "#FFFFFF" },
                "objects": [{
                    "name": "ball",
                    "shape": { "kind": "sphere", "radius": 1, "width_segments": 8, "height_segments": 8 },
                    "position": [0, 0, 0],
                    "material": { "color": "#FF0000", "metalness": 0.1, "roughness": 0.9 }
                }],
                "lights": [{ "kind": "ambient", "intensity": 1.0 }]
            }"##,
        );

        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.objects[0].scale, 1.0);
        assert_eq!(config.objects[0].material.opacity, 1.0);
        assert_eq!(config.lights, vec![LightConfig::Ambient { color: Color::WHITE, intensity: 1.0 }]);
        assert_eq!(config.drag_target, None);

        let (mut scene, _) = Scene::build(&config).unwrap();
        scene.apply_theme(Theme::Light);
        assert_eq!(scene.objects[0].material.color, Color::from_hex("#FF0000").unwrap());
    }

    #[test]
    fn test_load_rejects_bad_colour() {
        let json = serde_json::to_string(&SceneConfig::hero()).unwrap().replace("#5B8ADF", "#5B8ADX");
        let path = temp_file("bad-colour.json", &json);

        let err = SceneConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("#5B8ADX"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(SceneConfig::load("/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_validation_failures() {
        let cases: Vec<fn(&mut SceneConfig)> = vec![
            |c| c.drag_target = Some("nothing".into()),
            |c| c.drag.damping = 1.0,
            |c| c.drag.damping = 0.0,
            |c| c.drag.sensitivity = 0.0,
            |c| c.drag.sensitivity = f32::NAN,
            |c| c.drag.idle_spin = [0.0, 0.0],
            |c| c.drag.idle_spin = [f32::NAN, 0.01],
            |c| c.objects[0].scale = f32::NAN,
            |c| c.camera.fov_degrees = 180.0,
            |c| c.camera.near = c.camera.far,
            |c| c.objects[1].scale = 0.0,
            |c| c.particles.as_mut().unwrap().extent = -1.0,
        ];

        for (index, mutate) in cases.into_iter().enumerate() {
            let mut config = SceneConfig::hero();
            mutate(&mut config);
            assert!(
                matches!(config.validate(), Err(SceneError::InvalidConfig(_))),
                "case {index} passed validation"
            );
        }
    }
}
