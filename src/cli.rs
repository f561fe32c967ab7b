// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{ModelConfig, SceneConfig};
use crate::theme::Theme;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Core sphere, boxes, tori and orbs in a particle haze
    #[default]
    Hero,
    /// Single sphere in a dense starfield
    Starfield,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hero-scene")]
#[command(about = "Animated 3D hero background", long_about = None)]
pub struct Cli {
    /// Built-in scene to show
    #[arg(long, value_enum, default_value_t = Variant::Hero)]
    pub variant: Variant,

    /// JSON scene configuration, overrides --variant
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initial theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// glTF model to load in the background after mount
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Disable the diagnostics overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Print the resolved scene configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Resolve the scene configuration from the file or variant, plus `--model`.
    pub fn scene_config(&self) -> anyhow::Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => match self.variant {
                Variant::Hero => SceneConfig::hero(),
                Variant::Starfield => SceneConfig::starfield(),
            },
        };

        if let Some(path) = &self.model {
            let model = config.model.get_or_insert_with(ModelConfig::default);
            model.path = path.clone();
        }

        Ok(config)
    }

    pub fn initial_theme(&self) -> Theme {
        self.theme.map(Theme::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_hero_dark() {
        let cli = Cli::parse_from(["hero-scene"]);
        assert_eq!(cli.variant, Variant::Hero);
        assert_eq!(cli.initial_theme(), Theme::Dark);
        assert!(!cli.no_ui);
    }

    #[test]
    fn model_flag_fills_default_model() {
        let cli = Cli::parse_from(["hero-scene", "--variant", "starfield", "--model", "a.glb"]);
        let config = cli.scene_config().unwrap();
        let model = config.model.unwrap();
        assert_eq!(model.path, PathBuf::from("a.glb"));
        assert_eq!(model.position, [0.0, -2.5, 3.0]);
    }

    #[test]
    fn theme_flag_parses() {
        let cli = Cli::parse_from(["hero-scene", "--theme", "light"]);
        assert_eq!(cli.initial_theme(), Theme::Light);
    }
}
