//! Theme module: owns appearance preferences and derives render-ready tokens.
//!
//! The engine is the only writer of `ThemeState`. Every setter replaces the state
//! and recomputes `DerivedTokens` before returning, so readers never observe
//! tokens that lag behind the preferences they came from.
//!
//! Public API:
//! - `ThemeEngine` setters (`set_accent_color`, `set_palette`, ...).
//! - `ThemeEngine::tokens()` for the accent foreground/surface and class tokens.
//! - `ThemeEngine::terminal_theme()` projects the same tokens onto a cursive `Theme`.

pub mod color;
pub mod customization;

use cursive::theme::{BorderStyle, Color, Palette as CursivePalette, PaletteColor, Theme};
use log::{debug, warn};

use self::color::{ColorError, Rgb, apply_alpha, compute_foreground};
use self::customization::{
    CardStyle, Customization, DEFAULT_ACCENT, FontFamily, FontSize, Palette, Spacing,
    StyleClasses, resolve_style_classes,
};

/// Opacity of the tinted accent surface.
pub const SURFACE_ALPHA: f64 = 0.12;

/// Everything the user can change about the look of the app.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeState {
    pub palette: Palette,
    pub dark_mode: bool,
    pub customization: Customization,
}

/// Values computed from `ThemeState`; never edited directly.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTokens {
    pub accent_foreground: &'static str,
    pub accent_surface: String,
    pub style_classes: StyleClasses,
    pub root_class: String,
    pub css_variables: Vec<(&'static str, String)>,
}

impl DerivedTokens {
    /// Pure derivation from a theme state.
    pub fn derive(state: &ThemeState) -> Self {
        let accent = state.customization.accent_color.as_str();
        let accent_foreground = compute_foreground(accent);
        let accent_surface = apply_alpha(accent, SURFACE_ALPHA);
        let style_classes = resolve_style_classes(&state.customization);

        let root_class = state
            .dark_mode
            .then_some("dark")
            .into_iter()
            .chain(std::iter::once(state.palette.class()))
            .chain(style_classes.iter())
            .collect::<Vec<_>>()
            .join(" ");

        let css_variables = vec![
            ("--custom-accent", accent.to_string()),
            ("--custom-accent-foreground", accent_foreground.to_string()),
            ("--primary", accent.to_string()),
            ("--primary-foreground", accent_foreground.to_string()),
            ("--ring", accent.to_string()),
            ("--accent", accent_surface.clone()),
            ("--accent-foreground", accent_foreground.to_string()),
        ];

        Self {
            accent_foreground,
            accent_surface,
            style_classes,
            root_class,
            css_variables,
        }
    }
}

/// Holds theme state together with its eagerly derived tokens.
#[derive(Debug, Clone)]
pub struct ThemeEngine {
    state: ThemeState,
    tokens: DerivedTokens,
}

impl Default for ThemeEngine {
    fn default() -> Self {
        Self::new(ThemeState::default())
    }
}

impl ThemeEngine {
    pub fn new(state: ThemeState) -> Self {
        let tokens = DerivedTokens::derive(&state);
        Self { state, tokens }
    }

    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    pub fn tokens(&self) -> &DerivedTokens {
        &self.tokens
    }

    pub fn accent_color(&self) -> &str {
        &self.state.customization.accent_color
    }

    /// Replace the accent. Malformed input leaves state and tokens untouched.
    pub fn set_accent_color(&mut self, hex: &str) -> Result<(), ColorError> {
        if let Err(e) = Rgb::parse_strict(hex) {
            warn!("Rejected accent color: {e}");
            return Err(e);
        }
        let hex = hex.to_string();
        self.replace(|s| s.customization.accent_color = hex);
        Ok(())
    }

    pub fn reset_accent_color(&mut self) {
        self.replace(|s| s.customization.accent_color = DEFAULT_ACCENT.to_string());
    }

    /// Replace the whole customization record; rejected as a unit on a bad accent.
    pub fn set_customization(&mut self, customization: Customization) -> Result<(), ColorError> {
        if let Err(e) = Rgb::parse_strict(&customization.accent_color) {
            warn!("Rejected customization: {e}");
            return Err(e);
        }
        self.replace(|s| s.customization = customization);
        Ok(())
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.replace(|s| s.palette = palette);
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.replace(|s| s.dark_mode = enabled);
    }

    pub fn set_font_size(&mut self, font_size: FontSize) {
        self.replace(|s| s.customization.font_size = font_size);
    }

    pub fn set_font_family(&mut self, font_family: FontFamily) {
        self.replace(|s| s.customization.font_family = font_family);
    }

    pub fn set_card_style(&mut self, card_style: CardStyle) {
        self.replace(|s| s.customization.card_style = card_style);
    }

    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.replace(|s| s.customization.spacing = spacing);
    }

    /// Build the next state off to the side, then swap state and tokens together.
    fn replace(&mut self, edit: impl FnOnce(&mut ThemeState)) {
        let mut next = self.state.clone();
        edit(&mut next);
        let tokens = DerivedTokens::derive(&next);
        debug!(
            "Theme updated: root_class='{}', accent={}",
            tokens.root_class, next.customization.accent_color
        );
        self.state = next;
        self.tokens = tokens;
    }

    /// Project the current state onto a cursive theme.
    pub fn terminal_theme(&self) -> Theme {
        let (borders, shadow) = match self.state.customization.card_style {
            CardStyle::Default => (BorderStyle::Simple, false),
            CardStyle::Bordered => (BorderStyle::Outset, false),
            CardStyle::Elevated => (BorderStyle::Simple, true),
        };
        Theme {
            borders,
            shadow,
            palette: self.build_palette(),
        }
    }

    fn build_palette(&self) -> CursivePalette {
        let mut p = CursivePalette::default();
        let surfaces = if self.state.dark_mode {
            &DARK_SURFACES
        } else {
            &LIGHT_SURFACES
        };

        p[PaletteColor::Background] = surfaces.background.into();
        p[PaletteColor::Shadow] = surfaces.shadow.into();
        p[PaletteColor::View] = surfaces.view.into();
        p[PaletteColor::Primary] = surfaces.primary.into();
        p[PaletteColor::Secondary] = surfaces.secondary.into();
        p[PaletteColor::Tertiary] = surfaces.tertiary.into();
        p[PaletteColor::TitleSecondary] = surfaces.secondary.into();

        // Deep swatch reads on light views, the light swatch on dark ones.
        let [_, light, deep] = self.state.palette.swatches();
        let title = if self.state.dark_mode { light } else { deep };
        p[PaletteColor::TitlePrimary] = Rgb::decode(title).into();

        let accent = Rgb::decode(self.accent_color());
        p[PaletteColor::Highlight] = accent.into();
        p[PaletteColor::HighlightInactive] = accent.blend_over(surfaces.view, SURFACE_ALPHA).into();
        p[PaletteColor::HighlightText] = Rgb::decode(self.tokens.accent_foreground).into();

        p
    }
}

/// Base surfaces and text hierarchy for one brightness mode.
struct Surfaces {
    background: Rgb,
    shadow: Rgb,
    view: Rgb,
    primary: Rgb,
    secondary: Rgb,
    tertiary: Rgb,
}

const DARK_SURFACES: Surfaces = Surfaces {
    background: Rgb::new(18, 20, 24),
    shadow: Rgb::new(10, 11, 13),
    view: Rgb::new(28, 30, 34),
    primary: Rgb::new(230, 232, 235),
    secondary: Rgb::new(168, 174, 186),
    tertiary: Rgb::new(121, 127, 140),
};

const LIGHT_SURFACES: Surfaces = Surfaces {
    background: Rgb::new(233, 235, 239),
    shadow: Rgb::new(180, 184, 192),
    view: Rgb::WHITE,
    primary: Rgb::new(3, 2, 19),
    secondary: Rgb::new(113, 113, 130),
    tertiary: Rgb::new(150, 152, 164),
};

/// Cursive color for a hex string, using the lenient decoder.
pub fn terminal_color(hex: &str) -> Color {
    Rgb::decode(hex).into()
}
