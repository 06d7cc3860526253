//! Domain types shared by the client, the orchestrator and the CLI.
//!
//! The wire names follow the analysis endpoint's JSON contract
//! (`base64Data`, `lang`, `modelId`, `fileType`, camelCase result fields).

use crate::error::{AppError, Result};
use crate::image_processing::EncodedPayload;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vision models the analysis endpoint knows how to route to.
pub const AVAILABLE_MODELS: &[&str] = &[
    "doubao-1.5-vision-pro-250328",
    "doubao-1-5-thinking-vision-pro-250428",
    "doubao-seed-1-6-vision-250815",
];

/// Language used for the analysis text and for the status messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
    Id,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Zh, Language::En, Language::Id];

    /// Wire code of the language.
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
            Language::Id => "id",
        }
    }

    /// Rotating status messages shown while an analysis is in flight.
    pub fn loading_messages(self) -> &'static [&'static str] {
        match self {
            Language::Zh => &[
                "正在压缩图片...",
                "正在分析色彩搭配...",
                "正在识别时尚单品...",
                "正在生成造型建议...",
                "马上就好...",
            ],
            Language::En => &[
                "Compressing image...",
                "Analyzing colors...",
                "Identifying items...",
                "Generating advice...",
                "Almost there...",
            ],
            Language::Id => &[
                "Mengompres gambar...",
                "Menganalisis warna...",
                "Mengidentifikasi item...",
                "Menghasilkan saran...",
                "Hampir selesai...",
            ],
        }
    }

    /// The single message shown to the user for any failed analysis.
    pub fn generic_error(self) -> &'static str {
        match self {
            Language::Zh => "分析失败，请换一张照片再试一次。",
            Language::En => "Analysis failed. Please try again with another photo.",
            Language::Id => "Analisis gagal. Silakan coba lagi dengan foto lain.",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            "id" => Ok(Language::Id),
            other => Err(AppError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Identifier of a vision model, guaranteed to be one of [`AVAILABLE_MODELS`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();
        if AVAILABLE_MODELS.contains(&id) {
            Ok(Self(id.to_string()))
        } else {
            Err(AppError::UnknownModel(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self(AVAILABLE_MODELS[0].to_string())
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModelId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

/// Body of the `POST` sent to the analysis endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub payload: EncodedPayload,
    #[serde(rename = "lang")]
    pub language: Language,
    pub model_id: ModelId,
}

/// A single garment or accessory picked out of the photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutfitItem {
    pub name: String,
    pub category: String,
    pub color: String,
    pub comment: String,
}

/// Structured fashion feedback returned by the analysis endpoint.
///
/// Fields the endpoint adds beyond the known schema are kept in `extra`
/// so the value re-serializes to what the server sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FashionAnalysis {
    /// Kept as sent (integer or fractional); read it through [`score`](Self::score).
    pub overall_score: serde_json::Number,
    pub style: String,
    pub summary: String,
    pub items: Vec<OutfitItem>,
    pub color_palette: Vec<String>,
    pub strengths: Vec<String>,
    pub suggestions: Vec<String>,
    pub occasions: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FashionAnalysis {
    pub const MAX_SCORE: f64 = 100.0;

    /// The overall score as a float.
    pub fn score(&self) -> f64 {
        self.overall_score.as_f64().unwrap_or(f64::NAN)
    }

    /// Parses and validates a response body.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the value does not match the
    /// schema or breaks one of its rules.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let analysis: Self = serde_json::from_value(value)
            .map_err(|e| AppError::validation(format!("schema mismatch: {}", e)))?;
        analysis.validate()?;
        Ok(analysis)
    }

    /// Checks the rules serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=Self::MAX_SCORE).contains(&self.score()) {
            return Err(AppError::validation(format!(
                "overallScore {} is outside 0..={}",
                self.overall_score,
                Self::MAX_SCORE
            )));
        }
        if self.style.trim().is_empty() {
            return Err(AppError::validation("style is empty"));
        }
        if self.summary.trim().is_empty() {
            return Err(AppError::validation("summary is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "overallScore": 82,
            "style": "Smart casual",
            "summary": "Clean lines with a relaxed fit.",
            "items": [
                { "name": "Denim jacket", "category": "outerwear", "color": "indigo", "comment": "Good fit" }
            ],
            "colorPalette": ["#1f2a44", "#f5f5f0"],
            "strengths": ["Balanced proportions"],
            "suggestions": ["Try white sneakers"],
            "occasions": ["Weekend brunch"]
        })
    }

    #[test]
    fn language_parses_wire_codes() {
        assert_eq!("zh".parse::<Language>().unwrap(), Language::Zh);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("id".parse::<Language>().unwrap(), Language::Id);
        assert!(matches!(
            "fr".parse::<Language>(),
            Err(AppError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn every_language_has_five_loading_messages() {
        for lang in Language::ALL {
            assert_eq!(lang.loading_messages().len(), 5);
        }
    }

    #[test]
    fn model_id_rejects_unknown_models() {
        assert!(ModelId::parse(AVAILABLE_MODELS[1]).is_ok());
        assert!(matches!(
            ModelId::parse("gpt-4o"),
            Err(AppError::UnknownModel(_))
        ));
        assert!(serde_json::from_value::<ModelId>(json!("gpt-4o")).is_err());
    }

    #[test]
    fn request_uses_wire_field_names() {
        let request = AnalysisRequest {
            payload: EncodedPayload::jpeg("QUJD".to_string(), 2, 1),
            language: Language::En,
            model_id: ModelId::default(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "base64Data": "QUJD",
                "lang": "en",
                "modelId": "doubao-1.5-vision-pro-250328",
                "fileType": "image/jpeg"
            })
        );
    }

    #[test]
    fn analysis_keeps_unknown_fields() {
        let mut body = sample();
        body["seasonTip"] = json!("Layer a knit in autumn");

        let analysis = FashionAnalysis::from_value(body.clone()).unwrap();
        assert_eq!(analysis.score(), 82.0);
        assert_eq!(serde_json::to_value(&analysis).unwrap(), body);
    }

    #[test]
    fn analysis_rejects_missing_fields() {
        let mut body = sample();
        body.as_object_mut().unwrap().remove("summary");

        let err = FashionAnalysis::from_value(body).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn analysis_rejects_out_of_range_score() {
        let mut body = sample();
        body["overallScore"] = json!(140);

        let err = FashionAnalysis::from_value(body).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn analysis_accepts_fractional_score() {
        let mut body = sample();
        body["overallScore"] = json!(8.5);

        let analysis = FashionAnalysis::from_value(body.clone()).unwrap();
        assert_eq!(analysis.score(), 8.5);
        assert_eq!(serde_json::to_value(&analysis).unwrap(), body);
    }

    #[test]
    fn analysis_rejects_negative_score() {
        let mut body = sample();
        body["overallScore"] = json!(-3);

        let err = FashionAnalysis::from_value(body).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn analysis_rejects_blank_summary() {
        let mut body = sample();
        body["summary"] = json!("   ");

        assert!(FashionAnalysis::from_value(body).is_err());
    }
}
