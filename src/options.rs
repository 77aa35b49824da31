use clap::ValueEnum;
use std::fmt;

/// Tone the rewritten text should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Empathetic,
    Concise,
    Persuasive,
    DirectButPolite,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Empathetic => "Empathetic",
            Tone::Concise => "Concise",
            Tone::Persuasive => "Persuasive",
            Tone::DirectButPolite => "Direct but polite",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired length of the rewritten text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

impl Length {
    pub fn as_str(&self) -> &'static str {
        match self {
            Length::Short => "Short",
            Length::Medium => "Medium",
            Length::Long => "Long",
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current form state for one rewrite. Goals keep their insertion order
/// so the rendered prompt is stable for identical input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    pub tone: Tone,
    pub length: Length,
    pub audience: String,
    pub goals: Vec<String>,
}

impl RewriteOptions {
    pub fn goals_string(&self) -> String {
        self.goals.join(", ")
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            length: Length::default(),
            audience: "General".to_string(),
            goals: vec!["Be clear".to_string(), "Be polite".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_displays_human_labels() {
        assert_eq!(Tone::Professional.to_string(), "Professional");
        assert_eq!(Tone::DirectButPolite.to_string(), "Direct but polite");
    }

    #[test]
    fn default_options_match_the_form_defaults() {
        let options = RewriteOptions::default();
        assert_eq!(options.tone, Tone::Professional);
        assert_eq!(options.length, Length::Medium);
        assert_eq!(options.audience, "General");
        assert_eq!(options.goals_string(), "Be clear, Be polite");
    }

    #[test]
    fn goals_keep_insertion_order() {
        let options = RewriteOptions {
            goals: vec![
                "Keep it brief".to_string(),
                "Be clear".to_string(),
                "Ask for decision".to_string(),
            ],
            ..RewriteOptions::default()
        };
        assert_eq!(
            options.goals_string(),
            "Keep it brief, Be clear, Ask for decision"
        );
    }
}
