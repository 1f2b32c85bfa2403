use serde::{Deserialize, Serialize};

use super::InvalidEnumValue;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnumValue {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(InsightKind {
    DrugSummary => "drug_summary",
    MechanismOfAction => "mechanism_of_action",
    SideEffects => "side_effects",
    MarketTrends => "market_trends",
    PatientJourney => "patient_journey",
});

impl InsightKind {
    /// Every kind, in report order.
    pub const ALL: [InsightKind; 5] = [
        Self::DrugSummary,
        Self::MechanismOfAction,
        Self::SideEffects,
        Self::MarketTrends,
        Self::PatientJourney,
    ];

    /// Heading used when the insight is rendered in a document.
    pub fn title(&self) -> &'static str {
        match self {
            Self::DrugSummary => "Drug Summary",
            Self::MechanismOfAction => "Mechanism of Action",
            Self::SideEffects => "Side Effects",
            Self::MarketTrends => "Market Trends",
            Self::PatientJourney => "Patient Journey",
        }
    }
}

str_enum!(ApplicationType {
    Nda => "NDA",
    Anda => "ANDA",
    Bla => "BLA",
    Other => "Other",
    Unknown => "Unknown",
});

str_enum!(InsightProviderKind {
    Placeholder => "placeholder",
    Gemini => "gemini",
    Ollama => "ollama",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn insight_kind_round_trip() {
        for (variant, s) in [
            (InsightKind::DrugSummary, "drug_summary"),
            (InsightKind::MechanismOfAction, "mechanism_of_action"),
            (InsightKind::SideEffects, "side_effects"),
            (InsightKind::MarketTrends, "market_trends"),
            (InsightKind::PatientJourney, "patient_journey"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(InsightKind::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn insight_kind_serializes_like_as_str() {
        for kind in InsightKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn provider_kind_round_trip() {
        for (variant, s) in [
            (InsightProviderKind::Placeholder, "placeholder"),
            (InsightProviderKind::Gemini, "gemini"),
            (InsightProviderKind::Ollama, "ollama"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(InsightProviderKind::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn provider_kind_deserializes_from_yaml() {
        let kind: InsightProviderKind = serde_yaml::from_str("gemini").unwrap();
        assert_eq!(kind, InsightProviderKind::Gemini);
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = InsightKind::from_str("summary").unwrap_err();
        assert_eq!(err.field, "InsightKind");
        assert_eq!(err.value, "summary");
        assert!(InsightProviderKind::from_str("openai").is_err());
    }
}
