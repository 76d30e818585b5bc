//! Camera classification dataset: a snapshot of per-camera observations.
//!
//! The dataset is produced out-of-band by the classification pipeline as a
//! JSON object keyed by camera id. Entries written by older pipeline
//! versions can miss fields or carry statuses we do not know; the parser
//! keeps whatever it can make sense of and drops the rest, because a
//! malformed entry is just absent evidence, not a fatal condition.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::models::{
    CameraInfo, CameraRecord, CaptureFailure, Classification, Coordinate, SafetyLevel,
};

/// An immutable snapshot of camera observations, keyed by camera id.
///
/// Records are ordered by id so iteration (and everything derived from it,
/// like stats samples and equal-distance ties) is stable across runs.
#[derive(Debug, Clone, Default)]
pub struct CameraDataset {
    records: BTreeMap<String, CameraRecord>,
}

/// Aggregate counts over a dataset snapshot.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DatasetStats {
    pub total: usize,
    pub safe: usize,
    pub caution: usize,
    pub hazardous: usize,
    pub failed: usize,
}

impl CameraDataset {
    /// Build a dataset from the raw results JSON, skipping entries that
    /// cannot be interpreted.
    pub fn from_value(value: &Value) -> Self {
        let mut records = BTreeMap::new();

        let Some(entries) = value.as_object() else {
            return Self { records };
        };

        for (id, entry) in entries {
            if let Some(record) = parse_record(id, entry) {
                records.insert(id.clone(), record);
            }
        }

        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CameraRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &CameraRecord> {
        self.records.values()
    }

    pub fn stats(&self) -> DatasetStats {
        let mut stats = DatasetStats {
            total: self.records.len(),
            safe: 0,
            caution: 0,
            hazardous: 0,
            failed: 0,
        };

        for record in self.records.values() {
            match record.safety_level() {
                Some(SafetyLevel::Safe) => stats.safe += 1,
                Some(SafetyLevel::Caution) => stats.caution += 1,
                Some(SafetyLevel::Hazardous) => stats.hazardous += 1,
                Some(SafetyLevel::Unknown) => {}
                None => stats.failed += 1,
            }
        }

        stats
    }
}

fn parse_record(id: &str, entry: &Value) -> Option<CameraRecord> {
    let entry = entry.as_object()?;
    let status = entry.get("status").and_then(Value::as_str).unwrap_or("error");

    let camera = entry
        .get("camera")
        .and_then(Value::as_object)
        .map(|meta| CameraInfo {
            id: id.to_string(),
            display_name: meta
                .get("display_name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            location: parse_location(meta),
        })
        .unwrap_or(CameraInfo {
            id: id.to_string(),
            display_name: "Unknown".to_string(),
            location: None,
        });

    if status != "success" {
        let reason = match status {
            "download_failed" => CaptureFailure::DownloadFailed,
            "classification_failed" => CaptureFailure::ClassificationFailed,
            _ => CaptureFailure::Error,
        };
        return Some(CameraRecord::Failed { camera, reason });
    }

    let classification = entry
        .get("classification")
        .and_then(Value::as_object)
        .map(|block| Classification {
            condition: block
                .get("condition")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            confidence: block
                .get("confidence")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            safety_level: block
                .get("safety_level")
                .and_then(Value::as_str)
                .map(SafetyLevel::from_label)
                .unwrap_or(SafetyLevel::Unknown),
            observed_at: block
                .get("timestamp")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
        })
        // A success entry with no classification block still happened; it
        // just carries no evidence.
        .unwrap_or(Classification {
            condition: "unknown".to_string(),
            confidence: 0.0,
            safety_level: SafetyLevel::Unknown,
            observed_at: None,
        });

    Some(CameraRecord::Classified {
        camera,
        classification,
    })
}

fn parse_location(meta: &serde_json::Map<String, Value>) -> Option<Coordinate> {
    let lat = meta.get("latitude").and_then(Value::as_f64)?;
    let lon = meta.get("longitude").and_then(Value::as_f64)?;
    Some(Coordinate::new(lon, lat))
}

impl SafetyLevel {
    /// Lenient label parse; anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "safe" => Self::Safe,
            "caution" => Self::Caution,
            "hazardous" => Self::Hazardous,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "100": {
                "status": "success",
                "camera": {"display_name": "I-80 Parleys Summit", "latitude": 40.75, "longitude": -111.6},
                "classification": {"condition": "snowy road", "confidence": 0.91, "safety_level": "hazardous"}
            },
            "101": {
                "status": "success",
                "camera": {"display_name": "I-15 at 600 S", "latitude": 40.76, "longitude": -111.89},
                "classification": {"condition": "dry road", "confidence": 0.88, "safety_level": "safe"}
            },
            "102": {
                "status": "download_failed",
                "camera": {"display_name": "US-189 Provo Canyon", "latitude": 40.34, "longitude": -111.6},
                "classification": null
            },
            "103": {
                "status": "some_future_status",
                "camera": {"display_name": "SR-190 Big Cottonwood"}
            },
            "104": "not even an object"
        })
    }

    #[test]
    fn parses_mixed_statuses() {
        let dataset = CameraDataset::from_value(&sample());
        // the bare string entry is discarded
        assert_eq!(dataset.len(), 4);

        assert!(matches!(
            dataset.get("100"),
            Some(CameraRecord::Classified { .. })
        ));
        assert!(matches!(
            dataset.get("102"),
            Some(CameraRecord::Failed {
                reason: CaptureFailure::DownloadFailed,
                ..
            })
        ));
        // unknown statuses degrade to a generic failure
        assert!(matches!(
            dataset.get("103"),
            Some(CameraRecord::Failed {
                reason: CaptureFailure::Error,
                ..
            })
        ));
    }

    #[test]
    fn stats_count_levels_and_failures() {
        let stats = CameraDataset::from_value(&sample()).stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.safe, 1);
        assert_eq!(stats.hazardous, 1);
        assert_eq!(stats.caution, 0);
        assert_eq!(stats.failed, 2);
    }

    #[test]
    fn records_iterate_in_id_order() {
        let dataset = CameraDataset::from_value(&sample());
        let ids: Vec<&str> = dataset
            .records()
            .map(|record| record.camera().id.as_str())
            .collect();
        assert_eq!(ids, ["100", "101", "102", "103"]);
    }

    #[test]
    fn success_without_classification_is_unknown_evidence() {
        let value = json!({
            "200": {
                "status": "success",
                "camera": {"display_name": "Cam", "latitude": 40.0, "longitude": -111.0}
            }
        });
        let dataset = CameraDataset::from_value(&value);
        let record = dataset.get("200").unwrap();
        assert_eq!(record.safety_level(), Some(SafetyLevel::Unknown));
    }

    #[test]
    fn missing_coordinates_parse_as_no_location() {
        let value = json!({
            "300": {
                "status": "success",
                "camera": {"display_name": "Cam", "latitude": 40.0},
                "classification": {"condition": "dry", "confidence": 0.9, "safety_level": "safe"}
            }
        });
        let dataset = CameraDataset::from_value(&value);
        assert!(dataset.get("300").unwrap().camera().location.is_none());
    }
}
