use colored::{Color, ColoredString, Colorize};
use rps_common::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn text(self) -> Color {
        match self {
            Theme::Light => Color::TrueColor { r: 0x22, g: 0x22, b: 0x22 },
            Theme::Dark => Color::TrueColor { r: 0xee, g: 0xee, b: 0xee },
        }
    }

    pub fn accent(self) -> Color {
        match self {
            Theme::Light => Color::TrueColor { r: 0x66, g: 0x7e, b: 0xea },
            Theme::Dark => Color::TrueColor { r: 0x76, g: 0x4b, b: 0xa2 },
        }
    }

    pub fn outcome(self, outcome: Outcome) -> Color {
        match outcome {
            Outcome::Win => Color::TrueColor { r: 0x4a, g: 0xde, b: 0x80 },
            Outcome::Lose => Color::TrueColor { r: 0xf8, g: 0x71, b: 0x71 },
            Outcome::Draw => Color::TrueColor { r: 0xfb, g: 0xbf, b: 0x24 },
        }
    }

    pub fn paint(self, text: &str) -> ColoredString {
        text.color(self.text())
    }

    pub fn highlight(self, text: &str) -> ColoredString {
        text.color(self.accent()).bold()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_back_and_forth() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_persisted_as_lowercase() {
        assert_eq!(serde_json::to_value(Theme::Light).unwrap(), serde_json::json!("light"));
        assert_eq!(serde_json::from_value::<Theme>(serde_json::json!("dark")).unwrap(), Theme::Dark);
    }

    #[test]
    fn test_outcome_colors_are_distinct() {
        let theme = Theme::default();
        let colors = [Outcome::Win, Outcome::Lose, Outcome::Draw].map(|o| theme.outcome(o));
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }
}
