//! Fixture loading for batch evaluation.
//!
//! Ground truth and predictions arrive as JSON files authored by an external
//! fixture generator. Ground-truth files look like:
//!
//! ```json
//! { "blueprint_id": "level1_test_001", "category": "level1",
//!   "ground_truth": [ { "id": "room_1", "bounding_box": [100, 100, 500, 600], "name_hint": "Kitchen" } ] }
//! ```
//!
//! Prediction files carry either the raw model response text
//! (`{ "response": "..." }`) or an already-extracted room array
//! (`{ "rooms": [...] }`). Pairing convention on disk:
//! `<id>_ground_truth.json` next to `<id>_predicted.json`.

use crate::room::GroundTruthRoom;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A ground-truth fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruthFixture {
    /// Stable case identifier.
    pub blueprint_id: String,
    /// Optional difficulty/category label for report breakdowns.
    #[serde(default)]
    pub category: Option<String>,
    /// Authoritative room boundaries.
    pub ground_truth: Vec<GroundTruthRoom>,
}

/// A prediction fixture file: raw response text, or extracted room records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionFixture {
    /// Raw model response text, if the fixture stores one.
    #[serde(default)]
    pub response: Option<String>,
    /// Pre-extracted room records, if the fixture stores those instead.
    #[serde(default)]
    pub rooms: Option<Value>,
}

impl PredictionFixture {
    /// Convert to response text for the shared extraction path.
    ///
    /// Fixtures that store a room array are serialized back to JSON text so
    /// every prediction flows through the same extract-validate pipeline.
    ///
    /// # Errors
    ///
    /// [`Error::Fixture`] when the fixture carries neither field.
    pub fn into_response_text(self) -> Result<String> {
        if let Some(response) = self.response {
            return Ok(response);
        }
        if let Some(rooms) = self.rooms {
            return Ok(rooms.to_string());
        }
        Err(Error::fixture(
            "prediction fixture has neither 'response' nor 'rooms'",
        ))
    }
}

/// Load a ground-truth fixture from disk.
pub fn load_ground_truth(path: &Path) -> Result<GroundTruthFixture> {
    let text = fs::read_to_string(path)?;
    let fixture = serde_json::from_str(&text)?;
    Ok(fixture)
}

/// Load a prediction fixture from disk.
pub fn load_prediction(path: &Path) -> Result<PredictionFixture> {
    let text = fs::read_to_string(path)?;
    let fixture = serde_json::from_str(&text)?;
    Ok(fixture)
}

/// A paired ground-truth/prediction fixture on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePair {
    /// Case identifier derived from the file name.
    pub case_id: String,
    /// Path to `<id>_ground_truth.json`.
    pub ground_truth_path: PathBuf,
    /// Path to `<id>_predicted.json`.
    pub prediction_path: PathBuf,
}

const GROUND_TRUTH_SUFFIX: &str = "_ground_truth.json";
const PREDICTION_SUFFIX: &str = "_predicted.json";

/// Discover fixture pairs by scanning a ground-truth directory and looking
/// up the matching prediction files.
///
/// Ground-truth files without a prediction counterpart are skipped with a
/// warning, mirroring how a partial results directory is handled upstream.
/// Pairs are returned sorted by case id.
pub fn discover_cases(ground_truth_dir: &Path, predictions_dir: &Path) -> Result<Vec<FixturePair>> {
    let mut pairs = Vec::new();

    for entry in fs::read_dir(ground_truth_dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        let case_id = match name.strip_suffix(GROUND_TRUTH_SUFFIX) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => continue,
        };

        let prediction_path = predictions_dir.join(format!("{}{}", case_id, PREDICTION_SUFFIX));
        if !prediction_path.exists() {
            log::warn!("predictions not found for {}, skipping", case_id);
            continue;
        }

        pairs.push(FixturePair {
            case_id,
            ground_truth_path: path,
            prediction_path,
        });
    }

    pairs.sort_by(|a, b| a.case_id.cmp(&b.case_id));
    Ok(pairs)
}
