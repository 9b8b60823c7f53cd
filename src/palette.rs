//! Five-swatch color palettes generated from a base hue and a style mode.

use egui::Color32;
use serde::{Deserialize, Serialize};

pub const SWATCH_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaletteMode {
    #[default]
    Cyberpunk,
    Minimal,
    Vibrant,
    GamerDark,
    WebModern,
    Glassmorphism,
    NeoBrutalism,
    RetroWave,
    NatureOrganic,
    TechAi,
    SunsetGradient,
    DarkAcademia,
    Y2kRevival,
}

impl PaletteMode {
    pub const ALL: [PaletteMode; 13] = [
        PaletteMode::Cyberpunk,
        PaletteMode::Minimal,
        PaletteMode::Vibrant,
        PaletteMode::GamerDark,
        PaletteMode::WebModern,
        PaletteMode::Glassmorphism,
        PaletteMode::NeoBrutalism,
        PaletteMode::RetroWave,
        PaletteMode::NatureOrganic,
        PaletteMode::TechAi,
        PaletteMode::SunsetGradient,
        PaletteMode::DarkAcademia,
        PaletteMode::Y2kRevival,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaletteMode::Cyberpunk => "cyberpunk",
            PaletteMode::Minimal => "minimal",
            PaletteMode::Vibrant => "vibrant",
            PaletteMode::GamerDark => "gamer-dark",
            PaletteMode::WebModern => "web-modern",
            PaletteMode::Glassmorphism => "glassmorphism",
            PaletteMode::NeoBrutalism => "neo-brutalism",
            PaletteMode::RetroWave => "retro-wave",
            PaletteMode::NatureOrganic => "nature-organic",
            PaletteMode::TechAi => "tech-ai",
            PaletteMode::SunsetGradient => "sunset-gradient",
            PaletteMode::DarkAcademia => "dark-academia",
            PaletteMode::Y2kRevival => "y2k-revival",
        }
    }
}

/// What each slot of a palette is meant for, in slot order.
pub const ROLES: [&str; SWATCH_COUNT] = ["Background", "Text", "Primary", "Secondary", "Accent"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    pub color: Color32,
    /// Locked swatches survive regeneration.
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub mode: PaletteMode,
    pub swatches: [Swatch; SWATCH_COUNT],
}

impl Default for Palette {
    fn default() -> Self {
        Self::generate(PaletteMode::default(), 0.0)
    }
}

impl Palette {
    /// Fresh palette with nothing locked.
    pub fn generate(mode: PaletteMode, base_hue: f32) -> Self {
        Self {
            mode,
            swatches: mode_colors(mode, base_hue).map(|color| Swatch { color, locked: false }),
        }
    }

    /// New colors for every unlocked slot.
    pub fn regenerate(&mut self, base_hue: f32) {
        let colors = mode_colors(self.mode, base_hue);
        for (swatch, color) in self.swatches.iter_mut().zip(colors) {
            if !swatch.locked {
                swatch.color = color;
            }
        }
    }

    /// Switch style and regenerate the unlocked slots.
    pub fn set_mode(&mut self, mode: PaletteMode, base_hue: f32) {
        self.mode = mode;
        self.regenerate(base_hue);
    }

    /// Flip the lock on slot `index`. Returns the new state, or `None` when out of range.
    pub fn toggle_lock(&mut self, index: usize) -> Option<bool> {
        let swatch = self.swatches.get_mut(index)?;
        swatch.locked = !swatch.locked;
        Some(swatch.locked)
    }

    pub fn colors(&self) -> [Color32; SWATCH_COUNT] {
        self.swatches.map(|s| s.color)
    }

    /// A `:root` block with one `--color-N` custom property per slot.
    pub fn css_variables(&self) -> String {
        let mut css = String::from(":root {\n");
        for (i, swatch) in self.swatches.iter().enumerate() {
            css.push_str(&format!("  --color-{}: {};\n", i, css_color(swatch.color)));
        }
        css.push('}');
        css
    }
}

/// `#rrggbb` for opaque colors, `rgba(r, g, b, a)` otherwise.
pub fn css_color(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("rgba({}, {}, {}, {:.2})", r, g, b, a as f32 / 255.0)
    }
}

pub fn normalize_hue(hue: f32) -> f32 {
    hue.rem_euclid(360.0)
}

/// Opaque sRGB color from hue in degrees, saturation and lightness in `0..=1`.
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let h = normalize_hue(hue) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

/// Hue, saturation and lightness of an opaque color.
fn to_hsl(color: Color32) -> (f32, f32, f32) {
    let [r, g, b, _] = color.to_srgba_unmultiplied().map(|c| c as f32 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d == 0.0 {
        return (0.0, 0.0, l);
    }
    let s = d / (1.0 - (2.0 * l - 1.0).abs());
    let h = if max == r {
        60.0 * ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    (h, s, l)
}

/// Shift lightness by `amount` steps of 0.18, negative darkens.
pub fn shift_lightness(color: Color32, amount: f32) -> Color32 {
    let (h, s, l) = to_hsl(color);
    hsl(h, s, l + amount * 0.18)
}

fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

const fn hex(rgb: u32) -> Color32 {
    Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// The five slot colors of `mode` around `base_hue` (degrees).
pub fn mode_colors(mode: PaletteMode, base_hue: f32) -> [Color32; SWATCH_COUNT] {
    let h = normalize_hue(base_hue);
    match mode {
        PaletteMode::Cyberpunk => [
            hex(0x0a0a0f),
            Color32::WHITE,
            hsl(h, 1.0, 0.6),
            hsl(h, 0.8, 0.3),
            hsl(h + 180.0, 1.0, 0.6),
        ],
        PaletteMode::Minimal => [
            Color32::WHITE,
            hex(0x1a1a1a),
            hsl(h, 0.3, 0.7),
            hex(0xf5f5f5),
            hex(0xe0e0e0),
        ],
        PaletteMode::Vibrant => [
            hsl(h, 0.1, 0.98),
            hsl(h, 0.8, 0.2),
            hsl(h, 0.9, 0.6),
            hsl(h + 30.0, 0.9, 0.6),
            hsl(h - 30.0, 0.9, 0.6),
        ],
        PaletteMode::GamerDark => {
            let accent = hsl(h, 1.0, 0.6);
            [hex(0x0f0f1a), Color32::WHITE, accent, hex(0x1a1a2e), shift_lightness(accent, -0.5)]
        }
        PaletteMode::WebModern => {
            let primary = hsl(h, 0.7, 0.5);
            [
                Color32::WHITE,
                hex(0x2d3748),
                primary,
                hsl(h, 0.5, 0.95),
                shift_lightness(primary, -0.3),
            ]
        }
        PaletteMode::Glassmorphism => {
            let primary = hsl(h, 0.7, 0.6);
            [
                hsl(h, 0.3, 0.95),
                hsl(0.0, 0.0, 0.2),
                primary,
                with_alpha(primary, 0.15),
                with_alpha(Color32::WHITE, 0.4),
            ]
        }
        PaletteMode::NeoBrutalism => [
            Color32::WHITE,
            Color32::BLACK,
            hsl(h, 1.0, 0.5),
            hsl(h + 60.0, 1.0, 0.5),
            hsl(h + 120.0, 1.0, 0.5),
        ],
        PaletteMode::RetroWave => {
            let primary = 280.0 + h % 40.0;
            [
                hex(0x0b0b1f),
                Color32::WHITE,
                hsl(primary, 1.0, 0.6),
                hsl(primary + 60.0, 1.0, 0.6),
                hsl(primary - 60.0, 1.0, 0.6),
            ]
        }
        PaletteMode::NatureOrganic => [
            hex(0xf5f0e6),
            hex(0x2c3e2f),
            hsl(90.0 + h % 30.0, 0.6, 0.5),
            hsl(30.0 + h % 20.0, 0.5, 0.6),
            hsl(60.0 + h % 20.0, 0.4, 0.7),
        ],
        PaletteMode::TechAi => {
            let base = 210.0 + h % 80.0;
            [
                hex(0x0a0a0f),
                hex(0xe0e0e0),
                hsl(base, 1.0, 0.6),
                hsl(base + 40.0, 1.0, 0.6),
                hsl(base + 80.0, 1.0, 0.6),
            ]
        }
        PaletteMode::SunsetGradient => {
            let base = hsl(20.0 + h % 20.0, 0.9, 0.6);
            [
                base,
                hsl(0.0, 0.0, 0.2),
                shift_lightness(base, 0.5),
                hsl(340.0 + h % 20.0, 0.9, 0.6),
                hsl(260.0 + h % 20.0, 0.8, 0.5),
            ]
        }
        PaletteMode::DarkAcademia => [
            hex(0x1c1c1c),
            hex(0xe8dccc),
            hsl(30.0 + h % 15.0, 0.4, 0.28),
            hsl(20.0 + h % 15.0, 0.5, 0.35),
            hsl(40.0 + h % 15.0, 0.35, 0.45),
        ],
        PaletteMode::Y2kRevival => [
            hsl(h, 1.0, 0.6),
            hsl(h + 180.0, 1.0, 0.6),
            hsl(h + 60.0, 1.0, 0.6),
            hsl(h + 120.0, 1.0, 0.6),
            hex(0xc0c0c0),
        ],
    }
}

/// A random whole-degree hue.
pub fn random_hue() -> f32 {
    (uuid::Uuid::new_v4().as_u128() % 360) as f32
}
