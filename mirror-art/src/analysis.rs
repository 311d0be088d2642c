//! Analysis result: the generator's input
//!
//! Produced upstream by the summarization step and consumed once per render.
//! JSON field names are camelCase.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{RenderError, Result};
use crate::tone::Tone;

/// Number of sentences every artifact embeds
pub const SENTENCE_COUNT: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// `fusion`, `gentle` or `intense`; anything else renders as `fusion`
    pub tone: String,
    pub selected_sentences: Vec<String>,
    #[serde(default)]
    pub color_palette: ColorPalette,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<String>,
}

/// How sentence blocks are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutHint {
    /// The tone's own arrangement
    Native,
    /// Every block centered horizontally
    Centered,
}

impl AnalysisResult {
    pub fn new(tone: &str, sentences: [&str; SENTENCE_COUNT]) -> Self {
        Self {
            tone: tone.to_string(),
            selected_sentences: sentences.iter().map(|s| s.to_string()).collect(),
            color_palette: ColorPalette::default(),
            layout: None,
            typography: None,
        }
    }

    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.color_palette = palette;
        self
    }

    /// Resolved tone (unknown names fall back to fusion)
    pub fn tone(&self) -> Tone {
        Tone::resolve(&self.tone)
    }

    /// Reject input the renderer cannot lay out
    pub fn validate(&self) -> Result<()> {
        if self.selected_sentences.len() != SENTENCE_COUNT {
            return Err(RenderError::InvalidAnalysis(format!(
                "expected {} selected sentences, got {}",
                SENTENCE_COUNT,
                self.selected_sentences.len()
            )));
        }
        Ok(())
    }

    pub fn layout_hint(&self) -> LayoutHint {
        match self.layout.as_deref().map(|l| l.trim().to_lowercase()) {
            Some(l) if l == "centered" || l == "center" => LayoutHint::Centered,
            _ => LayoutHint::Native,
        }
    }

    /// Font family selected by the typography hint, or the tone default
    pub fn font_family(&self, tone: Tone) -> String {
        let hint = self
            .typography
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .unwrap_or_default();

        if hint.contains("serif") && !hint.contains("sans") {
            "serif".to_string()
        } else if hint.contains("sans") {
            "sans".to_string()
        } else if hint.contains("mono") {
            "mono".to_string()
        } else {
            tone.default_family().to_string()
        }
    }

    /// Seed for decorative randomness, derived from the sentences only
    ///
    /// Identical sentences give identical decoration regardless of the
    /// requested tone name.
    pub fn decoration_seed(&self) -> u64 {
        let mut hasher = Sha256::new();
        for sentence in &self.selected_sentences {
            hasher.update(sentence.as_bytes());
            hasher.update([0x1fu8]);
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let analysis: AnalysisResult = serde_json::from_str(
            r##"{
                "tone": "gentle",
                "selectedSentences": ["A short line.", "Another.", "Third one here."],
                "colorPalette": {"background": "#0F0F23", "accent": "#FFFFFF"}
            }"##,
        )
        .unwrap();

        assert_eq!(analysis.tone(), Tone::Gentle);
        assert_eq!(analysis.selected_sentences.len(), 3);
        assert_eq!(analysis.color_palette.background.as_deref(), Some("#0F0F23"));
        assert!(analysis.color_palette.primary.is_none());
        assert!(analysis.validate().is_ok());
    }

    #[test]
    fn test_validate_sentence_count() {
        let mut analysis = AnalysisResult::new("fusion", ["a", "b", "c"]);
        analysis.selected_sentences.pop();
        assert!(matches!(analysis.validate(), Err(RenderError::InvalidAnalysis(_))));

        analysis.selected_sentences.extend(["c".to_string(), "d".to_string()]);
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn test_hints() {
        let mut analysis = AnalysisResult::new("intense", ["a", "b", "c"]);
        assert_eq!(analysis.layout_hint(), LayoutHint::Native);
        assert_eq!(analysis.font_family(Tone::Intense), "sans");

        analysis.layout = Some("Centered".to_string());
        analysis.typography = Some("elegant serif".to_string());
        assert_eq!(analysis.layout_hint(), LayoutHint::Centered);
        assert_eq!(analysis.font_family(Tone::Intense), "serif");

        analysis.typography = Some("modern sans-serif".to_string());
        assert_eq!(analysis.font_family(Tone::Intense), "sans");
    }

    #[test]
    fn test_seed_ignores_tone() {
        let a = AnalysisResult::new("mystery", ["one", "two", "three"]);
        let b = AnalysisResult::new("fusion", ["one", "two", "three"]);
        let c = AnalysisResult::new("fusion", ["one", "two", "four"]);
        assert_eq!(a.decoration_seed(), b.decoration_seed());
        assert_ne!(b.decoration_seed(), c.decoration_seed());
    }
}
