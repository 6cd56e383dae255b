//! Colours for the board, pieces and sidebar, optionally read from a btop theme file.

use ratatui::style::Color;
use stacktui::catalog::{KIND_COUNT, PieceKind};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours in catalog order: I, O, T, S, Z, J, L.
    pub pieces: [Color; KIND_COUNT],
    pub board_bg: Color,
    /// Overflow rows above the visible playfield.
    pub buffer_bg: Color,
    pub border: Color,
    pub text: Color,
    /// Titles and stat labels.
    pub accent: Color,
    /// Hints and the ghost piece.
    pub muted: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("cannot read theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a hex colour: {0:?}")]
    InvalidHex(String),
}

/// btop key and One Dark fallback for each piece kind.
const PIECE_KEYS: [(&str, &str); KIND_COUNT] = [
    ("hi_fg", "#56B6C2"),
    ("title", "#E5C07B"),
    ("net_box", "#C678DD"),
    ("mem_box", "#98C379"),
    ("cpu_end", "#E06C75"),
    ("cpu_box", "#61AFEF"),
    ("proc_misc", "#D19A66"),
];

const HIGH_CONTRAST: [&str; KIND_COUNT] =
    ["#00FFFF", "#FFFF00", "#FF00FF", "#00FF00", "#FF0000", "#0088FF", "#FF8800"];

// Paul Tol's bright/vibrant picks, distinct under red-green deficiency.
const COLORBLIND: [&str; KIND_COUNT] =
    ["#33BBEE", "#CCBB44", "#AA3377", "#009988", "#CC3311", "#0077BB", "#EE7733"];

impl Default for Theme {
    fn default() -> Self {
        Self::from_entries(&HashMap::new())
    }
}

impl Theme {
    /// Reads `path` if given and present, otherwise One Dark, then applies `palette`.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path.filter(|p| p.exists()) {
            Some(p) => Self::from_entries(&parse_entries(&std::fs::read_to_string(p)?)),
            None => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Replaces the piece colours for the accessibility palettes.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        let replacement = match palette {
            crate::Palette::Normal => return,
            crate::Palette::HighContrast => HIGH_CONTRAST,
            crate::Palette::Colorblind => COLORBLIND,
        };
        for (slot, hex) in self.pieces.iter_mut().zip(replacement) {
            if let Ok(color) = parse_hex(hex) {
                *slot = color;
            }
        }
    }

    fn from_entries(entries: &HashMap<String, String>) -> Self {
        let pick = |key: &str, fallback: &str| {
            entries
                .get(key)
                .and_then(|v| parse_hex(v).ok())
                .or_else(|| parse_hex(fallback).ok())
                .unwrap_or(Color::Reset)
        };
        Self {
            pieces: PIECE_KEYS.map(|(key, fallback)| pick(key, fallback)),
            board_bg: pick("meter_bg", "#31353F"),
            buffer_bg: pick("main_bg", "#282C34"),
            border: pick("div_line", "#3F444F"),
            text: pick("main_fg", "#ABB2BF"),
            accent: pick("title", "#E5C07B"),
            muted: pick("inactive_fg", "#5C6370"),
        }
    }

    /// Colour of a grid cell; empty cells take the board background.
    pub fn cell_color(&self, value: u8) -> Color {
        PieceKind::from_cell_value(value).map_or(self.board_bg, |kind| self.piece_color(kind))
    }

    #[inline]
    pub fn piece_color(&self, kind: PieceKind) -> Color {
        self.pieces[kind.index()]
    }
}

/// `theme[key]="value"` lines (either quote style) into a key/value map.
/// Comments, blank values and anything else are skipped.
fn parse_entries(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("theme[")?;
            let (key, value) = rest.split_once(']')?;
            let value = value.trim().strip_prefix('=')?.trim();
            let value = value.trim_matches(|c| c == '"' || c == '\'');
            (!value.is_empty()).then(|| (key.trim().to_owned(), value.to_owned()))
        })
        .collect()
}

/// `#RRGGBB` or `#RGB`, leading `#` optional.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let digits = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_owned());
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match digits.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
        _ => Err(invalid()),
    }
}
