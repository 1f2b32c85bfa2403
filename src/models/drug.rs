//! Base drug record, the NDC directory entry a report is built around.
//!
//! The dataset entry (`NdcEntry`) mirrors the openFDA NDC directory shape with
//! every field optional. `DrugRecord::from_entry` resolves all fallbacks once,
//! so nothing downstream ever sees a missing field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::enums::ApplicationType;
use super::UNKNOWN;

// ═══════════════════════════════════════════
// Dataset shape
// ═══════════════════════════════════════════

/// One entry of the NDC dataset's `results` array, as stored on disk.
///
/// Every field is read leniently: a value of the wrong type is dropped on its
/// own and falls back like a missing field, leaving its siblings intact.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NdcEntry {
    #[serde(deserialize_with = "lenient")]
    pub product_ndc: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub brand_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub generic_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub dosage_form: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub route: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub active_ingredients: Option<Vec<NdcIngredient>>,
    #[serde(deserialize_with = "lenient")]
    pub labeler_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub marketing_category: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub marketing_start_date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub application_number: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub product_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub listing_expiration_date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub finished: Option<bool>,
    #[serde(deserialize_with = "lenient_list")]
    pub packaging: Option<Vec<NdcPackage>>,
    #[serde(deserialize_with = "lenient")]
    pub openfda: Option<NdcOpenFda>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NdcIngredient {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub strength: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NdcPackage {
    #[serde(deserialize_with = "lenient")]
    pub package_ndc: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub marketing_start_date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub sample: Option<bool>,
}

/// Harmonized openFDA fields. Every value is a list in the source data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NdcOpenFda {
    #[serde(deserialize_with = "lenient_list")]
    pub manufacturer_name: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub is_original_packager: Option<Vec<bool>>,
}

/// `Some` when the value has the expected type, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A list whose elements are kept one by one; elements of the wrong type are
/// skipped. Anything other than a list is `None`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

// ═══════════════════════════════════════════
// Resolved record
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveIngredient {
    pub name: String,
    pub strength: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    pub package_ndc: String,
    pub description: String,
    pub marketing_start_date: String,
    pub sample: bool,
}

/// Fully-populated drug record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugRecord {
    pub product_ndc: String,
    pub brand_name: String,
    pub generic_name: String,
    pub dosage_form: String,
    pub route: Vec<String>,
    pub active_ingredients: Vec<ActiveIngredient>,
    pub labeler_name: String,
    pub manufacturer_name: String,
    pub is_original_packager: bool,
    pub marketing_category: String,
    pub marketing_start_date: String,
    pub application_number: String,
    pub product_type: String,
    pub listing_expiration_date: String,
    /// Whether the listing is a finished product; drives the marketing status.
    pub finished: bool,
    pub packaging: Vec<Package>,
}

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}

impl DrugRecord {
    /// Resolve every fallback of a dataset entry in one place.
    pub fn from_entry(entry: NdcEntry) -> Self {
        let openfda = entry.openfda.unwrap_or_default();

        let active_ingredients = entry
            .active_ingredients
            .unwrap_or_default()
            .into_iter()
            .map(|i| ActiveIngredient {
                name: or_unknown(i.name),
                strength: or_unknown(i.strength),
            })
            .collect();

        let packaging = entry
            .packaging
            .unwrap_or_default()
            .into_iter()
            .map(|p| Package {
                package_ndc: or_unknown(p.package_ndc),
                description: or_unknown(p.description),
                marketing_start_date: or_unknown(p.marketing_start_date),
                sample: p.sample.unwrap_or(false),
            })
            .collect();

        Self {
            product_ndc: or_unknown(entry.product_ndc),
            brand_name: or_unknown(entry.brand_name),
            generic_name: or_unknown(entry.generic_name),
            dosage_form: or_unknown(entry.dosage_form),
            route: entry.route.unwrap_or_else(|| vec![UNKNOWN.to_string()]),
            active_ingredients,
            labeler_name: or_unknown(entry.labeler_name),
            manufacturer_name: or_unknown(
                openfda.manufacturer_name.and_then(|names| names.into_iter().next()),
            ),
            is_original_packager: openfda
                .is_original_packager
                .and_then(|flags| flags.into_iter().next())
                .unwrap_or(false),
            marketing_category: or_unknown(entry.marketing_category),
            marketing_start_date: or_unknown(entry.marketing_start_date),
            application_number: or_unknown(entry.application_number),
            product_type: or_unknown(entry.product_type),
            listing_expiration_date: or_unknown(entry.listing_expiration_date),
            finished: entry.finished.unwrap_or(false),
            packaging,
        }
    }

    /// `"name (strength), name (strength)"`, or `"Unknown"` with no ingredients.
    pub fn active_ingredients_summary(&self) -> String {
        if self.active_ingredients.is_empty() {
            return UNKNOWN.to_string();
        }
        self.active_ingredients
            .iter()
            .map(|i| format!("{} ({})", i.name, i.strength))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Ingredient names only, for prompts that do not need strengths.
    pub fn ingredient_names(&self) -> String {
        if self.active_ingredients.is_empty() {
            return UNKNOWN.to_string();
        }
        self.active_ingredients
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_otc(&self) -> bool {
        self.marketing_category.contains("OTC")
    }

    pub fn is_prescription(&self) -> bool {
        !self.is_otc()
    }

    /// Application type from the application number prefix.
    pub fn application_type(&self) -> ApplicationType {
        let number = self.application_number.as_str();
        if number.is_empty() || number == UNKNOWN {
            ApplicationType::Unknown
        } else if number.starts_with('N') {
            ApplicationType::Nda
        } else if number.starts_with("ANDA") {
            ApplicationType::Anda
        } else if number.starts_with("BLA") {
            ApplicationType::Bla
        } else {
            ApplicationType::Other
        }
    }
}

impl std::fmt::Display for DrugRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) - NDC: {}",
            self.brand_name, self.generic_name, self.product_ndc
        )
    }
}
