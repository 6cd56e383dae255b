//! stacktui: classic falling-block puzzle game in the terminal.

mod app;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use ui::ViewOptions;

/// Options derived from CLI that affect the game session and its display.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub start_level: u32,
    pub seed: Option<u64>,
    pub frame_rate: f64,
    pub view: ViewOptions,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|err| {
        eprintln!("stacktui: {err}; using default theme");
        let mut fallback = theme::Theme::default();
        fallback.apply_palette(args.palette);
        fallback
    });
    let config = GameConfig {
        start_level: args.start_level,
        seed: args.seed,
        frame_rate: args.frame_rate,
        view: ViewOptions {
            ghost: !args.no_ghost,
            animation: !args.no_animation,
            show_buffer: !args.hide_buffer,
        },
    };
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "stacktui",
    version,
    about = "Classic falling-block puzzle in the terminal. Complete rows to clear them; the game ends when the stack reaches the top.",
    long_about = "stacktui is a terminal falling-block puzzle.\n\n\
        Steer the falling piece, complete horizontal rows to clear them and score. Every ten \
        rows the level rises and pieces fall faster. The game ends when a locked piece reaches \
        the top row.\n\n\
        CONTROLS:\n  Left/h   Move left    Right/l  Move right   Up/k   Rotate\n  \
        Down/j   Soft drop    Space/Enter        Hard drop\n  R        Restart after game over     Q / Esc  Quit"
)]
pub struct Args {
    /// Level to start at. Higher levels fall faster and score more per row.
    #[arg(short = 'l', long, default_value = "0", value_name = "N",
          value_parser = clap::value_parser!(u32).range(0..=i64::from(stacktui::scoring::MAX_LEVEL)))]
    pub start_level: u32,

    /// Seed for the piece sequence (same seed, same pieces).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Target frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Hide the drop preview.
    #[arg(long)]
    pub no_ghost: bool,

    /// Disable the line-clear fade (rows flash instead).
    #[arg(long)]
    pub no_animation: bool,

    /// Draw only the visible playfield, not the overflow rows above it.
    #[arg(long)]
    pub hide_buffer: bool,
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
