//! Base-record lookup against the local NDC dataset file.
//!
//! The dataset is an openFDA NDC directory dump: `{"results": [entry, ...]}`.
//! It is read in full on every lookup and scanned in order; the first entry
//! whose `product_ndc` equals the normalized code wins.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Deserialize;
use serde_json::Value;

use super::LookupError;
use crate::models::{DrugRecord, NdcEntry};
use crate::ndc::NdcCode;

/// Top-level dataset shape. Entries stay as raw JSON so a single odd entry
/// elsewhere in the file cannot fail the lookup.
#[derive(Debug, Default, Deserialize)]
struct NdcDataset {
    #[serde(default)]
    results: Vec<Value>,
}

/// Handle on the dataset file. Opened read-only per lookup, never cached.
#[derive(Debug, Clone)]
pub struct LocalDataset {
    path: PathBuf,
}

impl LocalDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<NdcDataset, LookupError> {
        let started = Instant::now();
        let bytes = std::fs::read(&self.path).map_err(|source| LookupError::DatasetUnreadable {
            path: self.path.clone(),
            source,
        })?;
        let dataset: NdcDataset =
            serde_json::from_slice(&bytes).map_err(|source| LookupError::DatasetMalformed {
                path: self.path.clone(),
                source,
            })?;
        tracing::info!(
            path = %self.path.display(),
            entries = dataset.results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "NDC dataset loaded"
        );
        Ok(dataset)
    }
}

/// Find the base drug record for a normalized NDC.
///
/// Exact, case-sensitive comparison on `product_ndc`; no normalization is
/// re-applied to dataset entries. Duplicates resolve to the first match.
pub fn find_base_record(ndc: &NdcCode, dataset: &LocalDataset) -> Result<DrugRecord, LookupError> {
    tracing::info!(ndc = %ndc, "Searching local NDC dataset");
    let data = dataset.load()?;

    let entry = data
        .results
        .into_iter()
        .find(|entry| entry.get("product_ndc").and_then(Value::as_str) == Some(ndc.as_str()));

    let Some(entry) = entry else {
        tracing::warn!(ndc = %ndc, "No drug found in local dataset");
        return Err(LookupError::NotFound(ndc.to_string()));
    };

    // Fields of unexpected type are dropped one by one while parsing
    let parsed = serde_json::from_value::<NdcEntry>(entry).unwrap_or_else(|e| {
        tracing::warn!(ndc = %ndc, error = %e, "Dataset entry has unexpected shape");
        NdcEntry::default()
    });

    let record = DrugRecord::from_entry(parsed);
    tracing::info!(
        ndc = %ndc,
        brand = %record.brand_name,
        generic = %record.generic_name,
        "Drug found in local dataset"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndc::normalize;
    use serde_json::json;

    fn write_dataset(dir: &tempfile::TempDir, value: Value) -> LocalDataset {
        let path = dir.path().join("drug-ndc.json");
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        LocalDataset::new(path)
    }

    #[test]
    fn finds_matching_entry() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_dataset(
            &dir,
            json!({"results": [{"product_ndc": "12345-6789-01", "brand_name": "Acme"}]}),
        );

        let record = find_base_record(&normalize("12345-6789-01"), &dataset).unwrap();
        assert_eq!(record.brand_name, "Acme");
        assert_eq!(record.generic_name, "Unknown");
    }

    #[test]
    fn missing_ndc_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_dataset(
            &dir,
            json!({"results": [{"product_ndc": "12345-6789-01", "brand_name": "Acme"}]}),
        );

        let err = find_base_record(&normalize("99999-0000-00"), &dataset).unwrap_err();
        assert!(matches!(err, LookupError::NotFound(ref ndc) if ndc == "99999-0000-00"));
    }

    #[test]
    fn first_duplicate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_dataset(
            &dir,
            json!({"results": [
                {"product_ndc": "0002-3227", "brand_name": "First"},
                {"product_ndc": "0002-3227", "brand_name": "Second"}
            ]}),
        );

        let ndc = crate::ndc::normalize("0002-3227");
        let record = find_base_record(&ndc, &dataset).unwrap();
        assert_eq!(record.brand_name, "First");
    }

    #[test]
    fn comparison_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_dataset(
            &dir,
            json!({"results": [{"product_ndc": "12345678901", "brand_name": "Raw"}]}),
        );
        // The dataset is not normalized on our side
        assert!(find_base_record(&normalize("12345678901"), &dataset).is_err());
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dataset = LocalDataset::new("/nonexistent/drug-ndc.json");
        let err = find_base_record(&normalize("12345678901"), &dataset).unwrap_err();
        assert!(matches!(err, LookupError::DatasetUnreadable { .. }));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drug-ndc.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = find_base_record(&normalize("12345678901"), &LocalDataset::new(path)).unwrap_err();
        assert!(matches!(err, LookupError::DatasetMalformed { .. }));
    }

    #[test]
    fn missing_results_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_dataset(&dir, json!({"meta": {}}));
        let err = find_base_record(&normalize("12345678901"), &dataset).unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[test]
    fn odd_entries_do_not_break_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_dataset(
            &dir,
            json!({"results": [
                "not an object",
                {"product_ndc": 42},
                {"product_ndc": "12345-6789-01", "brand_name": "Acme", "route": "ORAL"}
            ]}),
        );
        let record = find_base_record(&normalize("12345678901"), &dataset).unwrap();
        assert_eq!(record.brand_name, "Acme");
        // `route` should be a list; the bad value is dropped and defaulted
        assert_eq!(record.route, vec!["Unknown".to_string()]);
    }

    #[test]
    fn one_bad_package_keeps_its_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = write_dataset(
            &dir,
            json!({"results": [{
                "product_ndc": "12345-6789-01",
                "brand_name": "Acme",
                "packaging": [
                    {"package_ndc": "A", "description": "good"},
                    {"package_ndc": "B", "sample": "N"},
                    "not a package"
                ],
                "active_ingredients": [{"name": "X", "strength": 5}, {"name": "Y", "strength": "1 mg"}],
                "openfda": {"manufacturer_name": "Acme Inc", "is_original_packager": [true]}
            }]}),
        );

        let record = find_base_record(&normalize("12345678901"), &dataset).unwrap();
        assert_eq!(record.packaging.len(), 2);
        assert_eq!(record.packaging[0].description, "good");
        assert_eq!(record.packaging[1].package_ndc, "B");
        assert!(!record.packaging[1].sample);
        assert_eq!(record.active_ingredients.len(), 2);
        assert_eq!(record.active_ingredients[0].strength, "Unknown");
        assert_eq!(record.active_ingredients[1].strength, "1 mg");
        // A scalar where a list belongs is dropped without losing the other openfda fields
        assert_eq!(record.manufacturer_name, "Unknown");
        assert!(record.is_original_packager);
    }
}
