//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Piece and UI colours, optionally loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours (index 0..=6): cyan, yellow, purple, orange, blue,
    /// green, red — one per tetromino kind.
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, level, lines).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Cleared rows flash in this colour.
    pub flash: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Theme {
    /// The stock palette: fully saturated piece colours on a dark grey well.
    pub fn classic() -> Self {
        Self {
            pieces: [
                parse_hex("#00FFFF").unwrap(), // cyan (I)
                parse_hex("#FFFF00").unwrap(), // yellow (O)
                parse_hex("#B400FF").unwrap(), // purple (T)
                parse_hex("#FFA500").unwrap(), // orange (L)
                parse_hex("#0078FF").unwrap(), // blue (J)
                parse_hex("#00FF00").unwrap(), // green (S)
                parse_hex("#FF0000").unwrap(), // red (Z)
            ],
            bg: parse_hex("#323232").unwrap(),
            div_line: parse_hex("#808080").unwrap(),
            main_fg: parse_hex("#FFFFFF").unwrap(),
            title: parse_hex("#FFFF00").unwrap(),
            flash: parse_hex("#FFFFC8").unwrap(),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to the stock palette if path is None or the file is missing.
    /// `palette` selects the colour variant: Normal, HighContrast, or Colorblind.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::classic();
        t.apply_palette(palette);
        t
    }

    /// Override piece colours for high-contrast or colorblind variants.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.pieces = [
                    parse_hex("#00FFFF").unwrap(), // cyan
                    parse_hex("#FFFF00").unwrap(), // yellow
                    parse_hex("#FF00FF").unwrap(), // magenta
                    parse_hex("#FF8800").unwrap(), // orange
                    parse_hex("#0088FF").unwrap(), // blue
                    parse_hex("#00FF00").unwrap(), // green
                    parse_hex("#FF0000").unwrap(), // red
                ];
                self.bg = parse_hex("#000000").unwrap();
            }
            crate::Palette::Colorblind => {
                // Avoid red/green alone; distinct hues with varied lightness.
                self.pieces = [
                    parse_hex("#33BBEE").unwrap(), // cyan
                    parse_hex("#CCBB44").unwrap(), // yellow
                    parse_hex("#AA3377").unwrap(), // purple
                    parse_hex("#EE7733").unwrap(), // orange
                    parse_hex("#0077BB").unwrap(), // blue
                    parse_hex("#009988").unwrap(), // teal
                    parse_hex("#CC3311").unwrap(), // red
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        // Keys follow btop theme naming; fallbacks are the stock palette.
        Self {
            pieces: [
                get("hi_fg")
                    .or_else(|| get("proc_misc"))
                    .unwrap_or_else(|| parse_hex("#00FFFF").unwrap()),
                get("cpu_mid")
                    .or_else(|| get("title"))
                    .unwrap_or_else(|| parse_hex("#FFFF00").unwrap()),
                get("net_box").unwrap_or_else(|| parse_hex("#B400FF").unwrap()),
                get("temp_mid").unwrap_or_else(|| parse_hex("#FFA500").unwrap()),
                get("cpu_box").unwrap_or_else(|| parse_hex("#0078FF").unwrap()),
                get("mem_box")
                    .or_else(|| get("cpu_start"))
                    .unwrap_or_else(|| parse_hex("#00FF00").unwrap()),
                get("cpu_end")
                    .or_else(|| get("temp_end"))
                    .unwrap_or_else(|| parse_hex("#FF0000").unwrap()),
            ],
            bg: get("meter_bg").unwrap_or_else(|| parse_hex("#323232").unwrap()),
            div_line: get("div_line").unwrap_or_else(|| parse_hex("#808080").unwrap()),
            main_fg: get("main_fg").unwrap_or_else(|| parse_hex("#FFFFFF").unwrap()),
            title: get("title").unwrap_or_else(|| parse_hex("#FFFF00").unwrap()),
            flash: parse_hex("#FFFFC8").unwrap(),
        }
    }

    /// Colour for a piece colour index (0..=6).
    #[inline]
    pub fn piece_color(&self, index: u8) -> Color {
        self.pieces[(index as usize) % 7]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let (r, g, b) = if s.len() == 6 {
        let r =
            u8::from_str_radix(&s[0..2], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let g =
            u8::from_str_radix(&s[2..4], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let b =
            u8::from_str_radix(&s[4..6], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        (r, g, b)
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let g = u8::from_str_radix(&s[1..2], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let b = u8::from_str_radix(&s[2..3], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        (r, g, b)
    } else {
        return Err(ThemeError::InvalidHex(s.to_string()));
    };
    Ok(Color::Rgb(r, g, b))
}
