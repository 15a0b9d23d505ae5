//! Script breakdown produced by the analysis service.

use serde::{Deserialize, Serialize};

/// A single scene of a broken-down script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Scene number.
    pub number: u32,
    /// Slug line, e.g. "INT. KITCHEN - NIGHT".
    pub heading: String,
    pub location: String,
    pub time: String,
    pub characters: Vec<String>,
    pub props: Vec<String>,
    pub wardrobe: Vec<String>,
    pub sfx: Vec<String>,
    pub notes: String,
    /// Budget estimate as display text.
    pub budget: String,
}

/// Breakdown of a whole script.
///
/// Fields other than `scenes` are kept as-is so nothing the analysis service
/// sends is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptBreakdown {
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ScriptBreakdown {
    /// Reads a breakdown out of an analysis payload.
    ///
    /// Returns `None` when the payload is not a JSON object or its scenes do
    /// not have the expected shape.
    pub fn from_analysis(analysis: &serde_json::Value) -> Option<Self> {
        if !analysis.is_object() {
            return None;
        }
        serde_json::from_value(analysis.clone()).ok()
    }
}
