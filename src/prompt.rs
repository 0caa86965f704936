//! Portrait modes and their prompt templates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the portrait is of one person or a couple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// One photo.
    #[default]
    Single,
    /// Two photos, one per partner.
    Couple,
}

impl SelectionMode {
    /// Number of photos this mode needs before generation can start.
    pub fn required_images(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Couple => 2,
        }
    }

    /// Returns the mode as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Couple => "couple",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "couple" => Ok(Self::Couple),
            other => Err(format!("unknown mode '{other}' (expected single or couple)")),
        }
    }
}

// The single template also covers a couple sharing one photo. Kept as written
// until product decides whether that branch should exist.
const SINGLE_PERSON_PROMPT: &str = "Generate a photorealistic image based on the person or people in the provided photo, showing them celebrating Deepavali. If there is one person, dress them in traditional Indian attire (a stylish kurtha for a male, or a beautiful chudidar for a female) holding a lit 'diya' (oil lamp). If there is a couple, dress them in complementary traditional Indian attire and have them jointly hold a single lit 'diya'. In either case, they should have warm, happy expressions. The background should be a festive home interior, softly lit and decorated with fairy lights and marigold garlands for Deepavali. The final image should be a high-quality portrait focused on the subject(s).";

const COUPLE_PROMPT: &str = "Generate a photorealistic, high-quality image of this couple celebrating Deepavali together. The male should be wearing a stylish, traditional Indian kurtha, and the female should be wearing a beautiful, traditional chudidar. They should be standing side-by-side, smiling warmly at the camera. Both individuals should be given equal prominence in the frame. Together, their hands should be holding a single lit 'diya' (oil lamp). The background should be a festive home interior, softly lit and decorated with fairy lights and marigold garlands for Deepavali. The final image should be a well-composed portrait focusing on the couple's happy celebration.";

/// Returns the fixed prompt for `mode`.
pub fn build_prompt(mode: SelectionMode) -> &'static str {
    match mode {
        SelectionMode::Single => SINGLE_PERSON_PROMPT,
        SelectionMode::Couple => COUPLE_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_images() {
        assert_eq!(SelectionMode::Single.required_images(), 1);
        assert_eq!(SelectionMode::Couple.required_images(), 2);
        assert_eq!(SelectionMode::default(), SelectionMode::Single);
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("single".parse::<SelectionMode>(), Ok(SelectionMode::Single));
        assert_eq!(" Couple ".parse::<SelectionMode>(), Ok(SelectionMode::Couple));
        assert!("trio".parse::<SelectionMode>().is_err());
        assert_eq!(SelectionMode::Couple.to_string(), "couple");
    }

    #[test]
    fn test_templates_differ() {
        assert_ne!(
            build_prompt(SelectionMode::Single),
            build_prompt(SelectionMode::Couple)
        );
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        assert_eq!(
            build_prompt(SelectionMode::Couple),
            build_prompt(SelectionMode::Couple)
        );
    }

    #[test]
    fn test_single_template_content() {
        let prompt = build_prompt(SelectionMode::Single);
        assert!(prompt.contains("person or people in the provided photo"));
        assert!(prompt.contains("If there is a couple"));
        assert!(prompt.contains("lit 'diya'"));
    }

    #[test]
    fn test_couple_template_content() {
        let prompt = build_prompt(SelectionMode::Couple);
        assert!(prompt.contains("equal prominence"));
        assert!(prompt.contains("single lit 'diya'"));
        assert!(prompt.contains("marigold garlands"));
    }

    #[test]
    fn test_mode_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&SelectionMode::Couple).unwrap(),
            "\"couple\""
        );
    }
}
