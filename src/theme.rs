use anyhow::{anyhow, Context, Result};
use eframe::egui::{self, Color32, Stroke};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

/// Resolved panel colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: String,
    pub variant: ThemeVariant,
    pub background: Color32,
    pub foreground: Color32,
    pub box_fill: Color32,
    pub accent: Color32,
    pub accent_active: Color32,
    pub status_text: Color32,
    pub volume_text: Color32,
    pub footer_text: Color32,
}

impl Palette {
    pub fn builtin(variant: ThemeVariant) -> Result<Self> {
        let source = match variant {
            ThemeVariant::Light => LIGHT_PALETTE_TOML,
            ThemeVariant::Dark => DARK_PALETTE_TOML,
        };
        let doc: PaletteDocument = toml::from_str(source)
            .with_context(|| format!("Failed to parse built-in {variant:?} palette"))?;
        resolve_document(doc, variant)
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let (theme, mut visuals) = match self.variant {
            ThemeVariant::Light => (egui::Theme::Light, egui::Visuals::light()),
            ThemeVariant::Dark => (egui::Theme::Dark, egui::Visuals::dark()),
        };

        visuals.panel_fill = self.background;
        visuals.window_fill = self.background;
        visuals.extreme_bg_color = self.box_fill;
        visuals.override_text_color = Some(self.foreground);

        let widgets = &mut visuals.widgets;
        widgets.inactive.bg_fill = self.accent;
        widgets.inactive.weak_bg_fill = self.accent;
        widgets.hovered.bg_fill = self.accent_active;
        widgets.hovered.weak_bg_fill = self.accent_active;
        widgets.active.bg_fill = self.accent_active;
        widgets.active.weak_bg_fill = self.accent_active;
        widgets.inactive.bg_stroke = Stroke::NONE;

        ctx.set_theme(theme);
        ctx.set_visuals_of(theme, visuals);
    }
}

fn resolve_document(doc: PaletteDocument, variant: ThemeVariant) -> Result<Palette> {
    let colors = doc.colors;
    let color = |key: &str, value: &str| {
        parse_hex_color(value).with_context(|| format!("Invalid color for colors.{key}"))
    };

    Ok(Palette {
        name: doc.meta.name,
        variant,
        background: color("background", &colors.background)?,
        foreground: color("foreground", &colors.foreground)?,
        box_fill: color("box_fill", &colors.box_fill)?,
        accent: color("accent", &colors.accent)?,
        accent_active: color("accent_active", &colors.accent_active)?,
        status_text: color("status_text", &colors.status_text)?,
        volume_text: color("volume_text", &colors.volume_text)?,
        footer_text: color("footer_text", &colors.footer_text)?,
    })
}

fn parse_hex_color(value: &str) -> Result<Color32> {
    let hex = value
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| anyhow!("Expected #rrggbb, got {value}"))?;
    if hex.len() != 6 {
        return Err(anyhow!("Invalid hex color: #{hex}"));
    }
    let bytes = u32::from_str_radix(hex, 16).map_err(|_| anyhow!("Invalid hex color: #{hex}"))?;

    let r = ((bytes >> 16) & 0xFF) as u8;
    let g = ((bytes >> 8) & 0xFF) as u8;
    let b = (bytes & 0xFF) as u8;
    Ok(Color32::from_rgb(r, g, b))
}

#[derive(Deserialize)]
struct PaletteDocument {
    meta: MetaSection,
    colors: ColorsSection,
}

#[derive(Deserialize)]
struct MetaSection {
    name: String,
}

#[derive(Deserialize)]
struct ColorsSection {
    background: String,
    foreground: String,
    box_fill: String,
    accent: String,
    accent_active: String,
    status_text: String,
    volume_text: String,
    footer_text: String,
}

const LIGHT_PALETTE_TOML: &str = r##"
[meta]
name = "light"

[colors]
background = "#f4f4f4"
foreground = "#000000"
box_fill = "#ffffff"
accent = "#e0e0e0"
accent_active = "#d0d0d0"
status_text = "#444444"
volume_text = "#666666"
footer_text = "#666666"
"##;

const DARK_PALETTE_TOML: &str = r##"
[meta]
name = "dark"

[colors]
background = "#2b2b2b"
foreground = "#f4f4f4"
box_fill = "#3c3c3c"
accent = "#6aa84f"
accent_active = "#b6d7a8"
status_text = "#cccccc"
volume_text = "#aaaaaa"
footer_text = "#999999"
"##;
