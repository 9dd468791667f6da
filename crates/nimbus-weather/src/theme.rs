//! Condition → theme and description → emoji lookups.
//!
//! Both are ordered tables evaluated first-match-wins over lowercase substrings.
//! Row order is the priority order.

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Display styling derived from a condition label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgb,
    pub accent: Rgb,
    pub emoji: &'static str,
}

pub const CLEAR: Theme = Theme {
    name: "clear",
    background: Rgb(0x4A, 0x90, 0xE2),
    accent: Rgb(0xFF, 0xD7, 0x00),
    emoji: "☀️",
};

pub const CLOUDY: Theme = Theme {
    name: "cloudy",
    background: Rgb(0x8E, 0x9A, 0xAF),
    accent: Rgb(0xDF, 0xE6, 0xEE),
    emoji: "☁️",
};

pub const RAIN: Theme = Theme {
    name: "rain",
    background: Rgb(0x4A, 0x6F, 0xA5),
    accent: Rgb(0x9F, 0xC5, 0xE8),
    emoji: "🌧️",
};

pub const SNOW: Theme = Theme {
    name: "snow",
    background: Rgb(0xA8, 0xC8, 0xDC),
    accent: Rgb(0xFF, 0xFF, 0xFF),
    emoji: "❄️",
};

pub const STORM: Theme = Theme {
    name: "storm",
    background: Rgb(0x2C, 0x3E, 0x50),
    accent: Rgb(0xF3, 0x9C, 0x12),
    emoji: "⛈️",
};

pub const MIST: Theme = Theme {
    name: "mist",
    background: Rgb(0x90, 0xA4, 0xAE),
    accent: Rgb(0xEC, 0xEF, 0xF1),
    emoji: "🌫️",
};

/// Used when no keyword matches
pub const PARTLY_CLOUDY: Theme = Theme {
    name: "partly_cloudy",
    background: Rgb(0x6C, 0x8E, 0xBF),
    accent: Rgb(0xFF, 0xE0, 0x8A),
    emoji: "⛅",
};

const THEMES: &[(&[&str], Theme)] = &[
    (&["clear"], CLEAR),
    (&["cloud"], CLOUDY),
    (&["rain", "drizzle"], RAIN),
    (&["snow"], SNOW),
    (&["thunder", "storm"], STORM),
    (&["mist", "fog", "haze"], MIST),
];

pub const DEFAULT_EMOJI: &str = "🌤️";

const DESCRIPTION_EMOJI: &[(&[&str], &str)] = &[
    (&["clear", "sunny"], "☀️"),
    (&["cloud"], "☁️"),
    (&["rain"], "🌧️"),
    (&["snow"], "❄️"),
    (&["storm", "thunder"], "⛈️"),
    (&["mist", "fog"], "🌫️"),
];

fn first_match<T: Copy>(table: &[(&[&str], T)], text: &str) -> Option<T> {
    let text = text.to_lowercase();
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, value)| *value)
}

/// Theme for a condition label such as "Rain" or "Clouds"
pub fn theme(condition_main: &str) -> Theme {
    first_match(THEMES, condition_main).unwrap_or(PARTLY_CLOUDY)
}

/// Emoji for a free-text description such as "light rain"
pub fn description_emoji(description: &str) -> &'static str {
    first_match(DESCRIPTION_EMOJI, description).unwrap_or(DEFAULT_EMOJI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openweather_labels() {
        assert_eq!(theme("Clear"), CLEAR);
        assert_eq!(theme("Clouds"), CLOUDY);
        assert_eq!(theme("Rain"), RAIN);
        assert_eq!(theme("Drizzle"), RAIN);
        assert_eq!(theme("Snow"), SNOW);
        assert_eq!(theme("Thunderstorm"), STORM);
        assert_eq!(theme("Mist"), MIST);
        assert_eq!(theme("Fog"), MIST);
        assert_eq!(theme("Haze"), MIST);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(theme("RAIN"), RAIN);
        assert_eq!(theme("light rain"), RAIN);
        assert_eq!(theme("sNoW"), SNOW);
    }

    #[test]
    fn test_unmatched_is_default() {
        for label in ["", "Smoke", "Dust", "Tornado", "Squall", "Ash", "sand", "42"] {
            assert_eq!(theme(label), PARTLY_CLOUDY, "label {label:?}");
        }
    }

    #[test]
    fn test_theme_is_idempotent() {
        for label in ["Rain", "Smoke", "thunderstorm with rain"] {
            assert_eq!(theme(label), theme(label));
        }
    }

    #[test]
    fn test_keyword_priority_pairwise() {
        // Every keyword of an earlier row beats every keyword of a later row,
        // in either position within the text.
        for (i, (earlier, expected)) in THEMES.iter().enumerate() {
            for (later, _) in &THEMES[i + 1..] {
                for a in earlier.iter() {
                    for b in later.iter() {
                        assert_eq!(theme(&format!("{a} {b}")), *expected, "{a} {b}");
                        assert_eq!(theme(&format!("{b} {a}")), *expected, "{b} {a}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_rain_only_loses_to_earlier_rows() {
        assert_eq!(theme("thunderstorm with rain"), RAIN);
        assert_eq!(theme("rain and fog"), RAIN);
        assert_eq!(theme("rain and snow"), RAIN);
        assert_eq!(theme("clouds with rain"), CLOUDY);
        assert_eq!(theme("clearing rain"), CLEAR);
    }

    #[test]
    fn test_description_emoji() {
        assert_eq!(description_emoji("clear sky"), "☀️");
        assert_eq!(description_emoji("Sunny"), "☀️");
        assert_eq!(description_emoji("broken clouds"), "☁️");
        assert_eq!(description_emoji("light rain"), "🌧️");
        assert_eq!(description_emoji("heavy snow"), "❄️");
        assert_eq!(description_emoji("thunderstorm"), "⛈️");
        assert_eq!(description_emoji("mist"), "🌫️");
        assert_eq!(description_emoji("smoke"), DEFAULT_EMOJI);
    }

    #[test]
    fn test_description_emoji_priority() {
        // Description table checks storm before mist, and rain before storm
        assert_eq!(description_emoji("thunderstorm with light rain"), "🌧️");
        assert_eq!(description_emoji("storm fog"), "⛈️");
        // "drizzle" has no row of its own in the description table
        assert_eq!(description_emoji("drizzle"), DEFAULT_EMOJI);
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb(0x4A, 0x90, 0xE2).to_string(), "#4A90E2");
        assert_eq!(Rgb(0, 0, 0).to_string(), "#000000");
    }
}
