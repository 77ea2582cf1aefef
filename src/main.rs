//! Squaretui — classic falling-block puzzle game in the terminal.

mod app;
mod audio;
mod game;
mod highscores;
mod input;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};

/// Options derived from the CLI that affect game behaviour.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub no_animation: bool,
    pub mute: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        width: args.width,
        height: args.height,
        no_animation: args.no_animation,
        mute: args.mute,
    };
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "squaretui",
    version,
    about = "Classic falling-block puzzle in the terminal. Stack the pieces and complete rows to clear them.",
    long_about = "Squaretui is a terminal rendition of the classic falling-block puzzle.\n\n\
        Pieces fall faster as you level up (one level per 10 cleared lines), and \
        clearing several rows at once is worth more: 100/300/500/800 points times the level.\n\n\
        CONTROLS (normal):\n  Left/Right  Move    Up    Rotate     Down     Soft drop\n  Enter/Space Hard drop   P     Pause      R        Restart    Q / Esc  Quit\n\n\
        CONTROLS (vim):\n  h/l         Move    k     Rotate     j        Soft drop\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Playfield width in columns (grid cells).
    #[arg(long, default_value_t = game::GRID_WIDTH, value_name = "COLS",
          value_parser = clap::value_parser!(u16).range(4..=64))]
    pub width: u16,

    /// Playfield height in rows (grid cells).
    #[arg(long, default_value_t = game::GRID_HEIGHT, value_name = "ROWS",
          value_parser = clap::value_parser!(u16).range(8..=64))]
    pub height: u16,

    /// Path to theme file (btop-style theme[key]="value"). Uses the stock palette if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the line-clear flash animation.
    #[arg(long)]
    pub no_animation: bool,

    /// Disable sound (no line-clear chime).
    #[arg(long)]
    pub mute: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
