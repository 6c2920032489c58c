//! Per-course colors with a guaranteed readable foreground.
//!
//! Colors live in memory for the lifetime of the app. Built-in courses get a
//! preset by default; overrides replace that preset until reset.

use std::collections::HashMap;

use log::{info, warn};

use crate::theme::color::{compute_foreground, normalize_hex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseColor {
    pub primary: String,
    pub light: String,
    pub dark: String,
    pub foreground: String,
}

impl CourseColor {
    /// Normalise all hex values and derive the foreground from `primary`.
    pub fn new(primary: &str, light: &str, dark: &str) -> Self {
        let primary = normalize_hex(primary);
        let foreground = compute_foreground(&primary).to_string();
        Self {
            primary,
            light: normalize_hex(light),
            dark: normalize_hex(dark),
            foreground,
        }
    }
}

const PRESETS: [(&str, [&str; 3]); 12] = [
    ("blue", ["#3B82F6", "#DBEAFE", "#1E40AF"]),
    ("green", ["#10B981", "#D1FAE5", "#047857"]),
    ("orange", ["#F59E0B", "#FEF3C7", "#D97706"]),
    ("purple", ["#8B5CF6", "#EDE9FE", "#6D28D9"]),
    ("red", ["#EF4444", "#FEE2E2", "#B91C1C"]),
    ("pink", ["#EC4899", "#FCE7F3", "#BE185D"]),
    ("indigo", ["#6366F1", "#E0E7FF", "#4338CA"]),
    ("teal", ["#14B8A6", "#CCFBF1", "#0F766E"]),
    ("cyan", ["#06B6D4", "#CFFAFE", "#0E7490"]),
    ("amber", ["#F59E0B", "#FEF3C7", "#D97706"]),
    ("lime", ["#84CC16", "#ECFCCB", "#65A30D"]),
    ("emerald", ["#10B981", "#D1FAE5", "#047857"]),
];

/// Built-in courses and their preset.
pub const DEFAULT_COURSES: [(&str, &str); 5] = [
    ("crn4020", "blue"),
    ("cop4600", "green"),
    ("cis4930", "orange"),
    ("cis4931", "purple"),
    ("eng102", "indigo"),
];

pub fn preset(name: &str) -> Option<CourseColor> {
    PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, [primary, light, dark])| CourseColor::new(primary, light, dark))
}

pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(n, _)| *n)
}

/// `"emerald"` -> `"Emerald"`.
pub fn preset_display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// First preset (blue).
fn fallback() -> CourseColor {
    let [primary, light, dark] = PRESETS[0].1;
    CourseColor::new(primary, light, dark)
}

/// Course id -> color, seeded from `DEFAULT_COURSES`.
#[derive(Debug, Clone)]
pub struct CourseColors {
    colors: HashMap<String, CourseColor>,
}

impl Default for CourseColors {
    fn default() -> Self {
        Self {
            colors: defaults(),
        }
    }
}

fn defaults() -> HashMap<String, CourseColor> {
    DEFAULT_COURSES
        .iter()
        .map(|(id, name)| {
            let color = preset(name).unwrap_or_else(fallback);
            ((*id).to_string(), color)
        })
        .collect()
}

impl CourseColors {
    /// Color for `course_id`; unknown courses get the blue preset.
    pub fn color(&self, course_id: &str) -> CourseColor {
        self.colors
            .get(course_id)
            .cloned()
            .unwrap_or_else(fallback)
    }

    /// Store an override; values are re-normalised and the foreground re-derived.
    pub fn set(&mut self, course_id: &str, color: &CourseColor) {
        let normalized = CourseColor::new(&color.primary, &color.light, &color.dark);
        info!("Course {course_id} color set to {}", normalized.primary);
        self.colors.insert(course_id.to_string(), normalized);
    }

    /// Apply a named preset. Unknown names change nothing and return false.
    pub fn set_preset(&mut self, course_id: &str, preset_name: &str) -> bool {
        match preset(preset_name) {
            Some(color) => {
                self.set(course_id, &color);
                true
            }
            None => {
                warn!("Unknown course color preset '{preset_name}'");
                false
            }
        }
    }

    /// Drop any override; built-in courses fall back to their default preset.
    pub fn reset(&mut self, course_id: &str) {
        match DEFAULT_COURSES.iter().find(|(id, _)| *id == course_id) {
            Some((_, name)) => {
                let color = preset(name).unwrap_or_else(fallback);
                self.colors.insert(course_id.to_string(), color);
            }
            None => {
                self.colors.remove(course_id);
            }
        }
    }

    pub fn reset_all(&mut self) {
        self.colors = defaults();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_courses_have_defaults() {
        let colors = CourseColors::default();
        assert_eq!(colors.color("cop4600").primary, "#10B981");
        assert_eq!(colors.color("eng102").primary, "#6366F1");
        assert_eq!(colors.color("unknown"), preset("blue").unwrap());
    }

    #[test]
    fn foreground_follows_primary() {
        assert_eq!(preset("amber").unwrap().foreground, "#0F172A");
        assert_eq!(preset("indigo").unwrap().foreground, "#FFFFFF");

        let c = CourseColor::new("#fff", "#eee", "ddd");
        assert_eq!(c.primary, "#FFFFFF");
        assert_eq!(c.light, "#EEEEEE");
        assert_eq!(c.dark, "#DDDDDD");
        assert_eq!(c.foreground, "#0F172A");
    }

    #[test]
    fn set_rederives_foreground() {
        let mut colors = CourseColors::default();
        let tampered = CourseColor {
            primary: "#000000".into(),
            light: "#111111".into(),
            dark: "#000000".into(),
            foreground: "#000000".into(),
        };
        colors.set("crn4020", &tampered);
        assert_eq!(colors.color("crn4020").foreground, "#FFFFFF");
    }

    #[test]
    fn presets_and_reset() {
        let mut colors = CourseColors::default();
        assert!(colors.set_preset("crn4020", "teal"));
        assert_eq!(colors.color("crn4020").primary, "#14B8A6");
        assert!(!colors.set_preset("crn4020", "chartreuse"));
        assert_eq!(colors.color("crn4020").primary, "#14B8A6");

        colors.reset("crn4020");
        assert_eq!(colors.color("crn4020").primary, "#3B82F6");

        colors.set_preset("phy2048", "red");
        colors.set_preset("cis4931", "lime");
        colors.reset_all();
        assert_eq!(colors.color("phy2048"), preset("blue").unwrap());
        assert_eq!(colors.color("cis4931").primary, "#8B5CF6");
    }

    #[test]
    fn reset_unknown_course_drops_override() {
        let mut colors = CourseColors::default();
        assert!(colors.set_preset("phy2048", "red"));
        assert_eq!(colors.color("phy2048").primary, "#EF4444");

        colors.reset("phy2048");
        assert_eq!(colors.color("phy2048"), preset("blue").unwrap());
        assert_eq!(colors.color("crn4020").primary, "#3B82F6");
    }

    #[test]
    fn preset_names_and_labels() {
        assert_eq!(preset_names().count(), 12);
        assert_eq!(preset_display_name("emerald"), "Emerald");
        assert_eq!(preset_display_name(""), "");
    }
}
