use std::path::PathBuf;

use clap::{Parser, Subcommand};
use renderer::geometry::Shape;

use crate::scenes::SceneKind;

#[derive(Parser, Debug)]
#[command(
    name = "glassworks",
    author,
    version,
    about = "Refractive glass demo scenes",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scene to render: `torus`, `cube`, or `bubble`.
    #[arg(value_name = "SCENE", default_value = "torus")]
    pub scene: SceneKind,

    /// Mesh shape override (`torus`, `box`, `sphere`, `cylinder`,
    /// `dodecahedron`); ignored by the bubble scene.
    #[arg(long, value_name = "SHAPE")]
    pub shape: Option<Shape>,

    /// Preset TOML file layered over the scene defaults.
    #[arg(long, value_name = "FILE")]
    pub preset: Option<PathBuf>,

    /// Text drawn into the synthesized backdrop raster.
    #[arg(long, value_name = "TEXT")]
    pub backdrop_text: Option<String>,

    /// Image file to use as the backdrop instead of the synthesized raster.
    #[arg(long, value_name = "PATH")]
    pub backdrop_image: Option<PathBuf>,

    /// Equirectangular HDR environment map URL.
    #[arg(long, value_name = "URL", env = "GLASSWORKS_ENVIRONMENT_URL")]
    pub environment_url: Option<String>,

    /// Directory holding the six cubemap faces (posx/negx/posy/negy/posz/negz).
    #[arg(long, value_name = "DIR")]
    pub cubemap_dir: Option<PathBuf>,

    /// Dispersion loop iteration override.
    #[arg(long, value_name = "COUNT")]
    pub loop_count: Option<u32>,

    /// Skip the environment map fetch and keep the placeholder.
    #[arg(long)]
    pub no_fetch: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the tunable parameters with their ranges and defaults.
    Params,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_torus_scene() {
        let cli = Cli::try_parse_from(["glassworks"]).unwrap();
        assert_eq!(cli.run.scene, SceneKind::Torus);
        assert!(cli.run.shape.is_none());
        assert!(!cli.run.no_fetch);
        assert!(cli.command.is_none());
    }

    #[test]
    fn scene_and_overrides_parse() {
        let cli = Cli::try_parse_from([
            "glassworks",
            "cube",
            "--shape",
            "dodecahedron",
            "--loop-count",
            "8",
            "--backdrop-text",
            "GLASS",
            "--no-fetch",
        ])
        .unwrap();
        assert_eq!(cli.run.scene, SceneKind::Cube);
        assert_eq!(cli.run.shape, Some(Shape::Dodecahedron));
        assert_eq!(cli.run.loop_count, Some(8));
        assert_eq!(cli.run.backdrop_text.as_deref(), Some("GLASS"));
        assert!(cli.run.no_fetch);
    }

    #[test]
    fn unknown_scene_is_a_parse_error() {
        assert!(Cli::try_parse_from(["glassworks", "prism"]).is_err());
    }

    #[test]
    fn params_subcommand_parses() {
        let cli = Cli::try_parse_from(["glassworks", "params"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Params)));
    }
}
