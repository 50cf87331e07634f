use std::fmt;

/// Background theme derived from the current condition category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default,
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Snow,
    Mist,
    Thunderstorm,
}

impl Theme {
    /// Case-insensitive lookup; `None` for categories without a theme.
    pub fn from_category(category: &str) -> Option<Self> {
        let theme = match category.trim().to_lowercase().as_str() {
            "clear" => Theme::Clear,
            "clouds" => Theme::Clouds,
            "rain" => Theme::Rain,
            "drizzle" => Theme::Drizzle,
            "snow" => Theme::Snow,
            "mist" | "fog" | "haze" => Theme::Mist,
            "thunderstorm" => Theme::Thunderstorm,
            _ => return None,
        };
        Some(theme)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Clear => "clear",
            Theme::Clouds => "clouds",
            Theme::Rain => "rain",
            Theme::Drizzle => "drizzle",
            Theme::Snow => "snow",
            Theme::Mist => "mist",
            Theme::Thunderstorm => "thunderstorm",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
