//! Closed preference enums and their static style-class lookups.
//!
//! All enums deserialize from lowercase names so they can appear directly in
//! `config.yaml`.

use serde::Deserialize;

/// Accent used when nothing else is configured.
pub const DEFAULT_ACCENT: &str = "#030213";

/// Named color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Default,
    Blue,
    Purple,
    Green,
}

impl Palette {
    pub const ALL: [Self; 4] = [Self::Default, Self::Blue, Self::Purple, Self::Green];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Blue => "Ocean Blue",
            Self::Purple => "Purple Dream",
            Self::Green => "Forest Green",
        }
    }

    /// Class token applied to the root container.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Green => "green",
        }
    }

    /// Preview swatches: base, light, deep.
    pub const fn swatches(self) -> [&'static str; 3] {
        match self {
            Self::Default => ["#030213", "#e9ebef", "#717182"],
            Self::Blue => ["#0077b6", "#90e0ef", "#023e8a"],
            Self::Purple => ["#7209b7", "#e0aaff", "#560bad"],
            Self::Green => ["#2d6a4f", "#95d5b2", "#1b4332"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Default,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    #[default]
    Default,
    Bordered,
    Elevated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    Normal,
    #[default]
    Comfortable,
}

impl FontSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    pub const fn class(self) -> &'static str {
        match self {
            Self::Small => "text-sm",
            Self::Medium => "",
            Self::Large => "text-lg",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl FontFamily {
    pub const ALL: [Self; 3] = [Self::Default, Self::Serif, Self::Mono];

    pub const fn class(self) -> &'static str {
        match self {
            Self::Default => "font-sans",
            Self::Serif => "font-serif",
            Self::Mono => "font-mono",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Serif => "Serif",
            Self::Mono => "Mono",
        }
    }
}

impl CardStyle {
    pub const ALL: [Self; 3] = [Self::Default, Self::Bordered, Self::Elevated];

    pub const fn class(self) -> &'static str {
        match self {
            Self::Default => "card-default",
            Self::Bordered => "card-bordered",
            Self::Elevated => "card-elevated",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Bordered => "Bordered",
            Self::Elevated => "Elevated",
        }
    }
}

impl Spacing {
    pub const ALL: [Self; 3] = [Self::Compact, Self::Normal, Self::Comfortable];

    pub const fn class(self) -> &'static str {
        match self {
            Self::Compact => "space-compact",
            Self::Normal => "",
            Self::Comfortable => "space-comfortable",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Compact => "Compact",
            Self::Normal => "Normal",
            Self::Comfortable => "Comfortable",
        }
    }

    /// Dialog padding in terminal cells.
    pub const fn padding(self) -> usize {
        match self {
            Self::Compact => 0,
            Self::Normal => 1,
            Self::Comfortable => 2,
        }
    }
}

/// User-editable cosmetic preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customization {
    pub font_size: FontSize,
    pub font_family: FontFamily,
    pub card_style: CardStyle,
    pub spacing: Spacing,
    pub accent_color: String,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            font_size: FontSize::default(),
            font_family: FontFamily::default(),
            card_style: CardStyle::default(),
            spacing: Spacing::default(),
            accent_color: DEFAULT_ACCENT.to_string(),
        }
    }
}

/// One class token per customization field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleClasses {
    pub font_size: &'static str,
    pub font_family: &'static str,
    pub card_style: &'static str,
    pub spacing: &'static str,
}

impl StyleClasses {
    /// Non-empty tokens in field order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> {
        [self.font_size, self.font_family, self.card_style, self.spacing]
            .into_iter()
            .filter(|c| !c.is_empty())
    }
}

pub fn resolve_style_classes(customization: &Customization) -> StyleClasses {
    StyleClasses {
        font_size: customization.font_size.class(),
        font_family: customization.font_family.class(),
        card_style: customization.card_style.class(),
        spacing: customization.spacing.class(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_preferences() {
        let c = Customization::default();
        assert_eq!(c.font_size, FontSize::Medium);
        assert_eq!(c.font_family, FontFamily::Default);
        assert_eq!(c.card_style, CardStyle::Default);
        assert_eq!(c.spacing, Spacing::Comfortable);
        assert_eq!(c.accent_color, "#030213");
        assert_eq!(Palette::default(), Palette::Default);
    }

    #[test]
    fn lookups_map_each_field() {
        let c = Customization {
            font_size: FontSize::Large,
            font_family: FontFamily::Mono,
            card_style: CardStyle::Elevated,
            spacing: Spacing::Compact,
            ..Customization::default()
        };
        let classes = resolve_style_classes(&c);
        assert_eq!(classes.font_size, "text-lg");
        assert_eq!(classes.font_family, "font-mono");
        assert_eq!(classes.card_style, "card-elevated");
        assert_eq!(classes.spacing, "space-compact");
    }

    #[test]
    fn empty_tokens_are_skipped() {
        let c = Customization {
            spacing: Spacing::Normal,
            ..Customization::default()
        };
        let tokens: Vec<_> = resolve_style_classes(&c).iter().collect();
        assert_eq!(tokens, ["font-sans", "card-default"]);
    }

    #[test]
    fn palette_metadata() {
        assert_eq!(Palette::Blue.label(), "Ocean Blue");
        assert_eq!(Palette::Green.swatches()[0], "#2d6a4f");
        assert!(Palette::ALL.iter().all(|p| !p.class().is_empty()));
    }
}
