//! Approximate-match tolerance.
//!
//! A leaf carries `Option<FuzzyConfig>`; `None` is the "disabled" sentinel and
//! means no fuzzy parameters are emitted at all.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FuzzyError;

/// Largest edit distance the backend accepts for a fixed fuzziness.
pub const MAX_EDIT_DISTANCE: u8 = 2;

/// Edit distance the backend accepts for a fixed fuzziness (0, 1 or 2).
///
/// Only constructible through [`EditDistance::new`], so an out-of-range
/// distance can never reach a compiled query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditDistance(u8);

impl EditDistance {
    pub fn new(distance: u8) -> Result<Self, FuzzyError> {
        if distance > MAX_EDIT_DISTANCE {
            return Err(FuzzyError::InvalidEditDistance(distance));
        }
        Ok(Self(distance))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for EditDistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum edit distance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fuzziness {
    /// Edit distance derived from term length by the backend.
    #[default]
    Auto,
    /// Fixed edit distance.
    Fixed(EditDistance),
}

impl Fuzziness {
    /// Fixed edit distance, rejecting values the backend would refuse.
    pub fn fixed(distance: u8) -> Result<Self, FuzzyError> {
        EditDistance::new(distance).map(Fuzziness::Fixed)
    }
}

impl std::fmt::Display for Fuzziness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fuzziness::Auto => write!(f, "AUTO"),
            Fuzziness::Fixed(d) => write!(f, "{}", d),
        }
    }
}

impl Serialize for Fuzziness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fuzziness::Auto => serializer.serialize_str("AUTO"),
            Fuzziness::Fixed(d) => serializer.serialize_u8(d.get()),
        }
    }
}

impl<'de> Deserialize<'de> for Fuzziness {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u8),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(d) => Fuzziness::fixed(d).map_err(serde::de::Error::custom),
            Raw::Text(s) if s.eq_ignore_ascii_case("auto") => Ok(Fuzziness::Auto),
            Raw::Text(s) => s
                .parse::<u8>()
                .map_err(|_| serde::de::Error::custom(format!("invalid fuzziness: {}", s)))
                .and_then(|d| Fuzziness::fixed(d).map_err(serde::de::Error::custom)),
        }
    }
}

/// Immutable fuzzy matching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    /// Maximum edit distance
    #[serde(default)]
    pub fuzziness: Fuzziness,

    /// Maximum number of terms the fuzzy query expands to
    #[serde(default = "default_max_expansions")]
    pub max_expansions: u32,

    /// Number of leading characters left unchanged
    #[serde(default)]
    pub prefix_length: u32,

    /// Whether swapping two adjacent characters counts as one edit
    #[serde(default = "default_transpositions")]
    pub transpositions: bool,
}

fn default_max_expansions() -> u32 {
    50
}

fn default_transpositions() -> bool {
    true
}

impl FuzzyConfig {
    /// Backend defaults: AUTO distance, 50 expansions, no prefix, transpositions on.
    pub const AUTO: FuzzyConfig = FuzzyConfig {
        fuzziness: Fuzziness::Auto,
        max_expansions: 50,
        prefix_length: 0,
        transpositions: true,
    };

    /// Sentinel for "do not apply fuzzy matching".
    pub const DISABLED: Option<FuzzyConfig> = None;

    pub fn new(
        fuzziness: Fuzziness,
        max_expansions: u32,
        prefix_length: u32,
        transpositions: bool,
    ) -> Self {
        Self {
            fuzziness,
            max_expansions,
            prefix_length,
            transpositions,
        }
    }

    pub fn with_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: u32) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_prefix_length(mut self, prefix_length: u32) -> Self {
        self.prefix_length = prefix_length;
        self
    }

    pub fn with_transpositions(mut self, transpositions: bool) -> Self {
        self.transpositions = transpositions;
        self
    }
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self::AUTO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_defaults() {
        let fuzzy = FuzzyConfig::default();
        assert_eq!(fuzzy.fuzziness, Fuzziness::Auto);
        assert_eq!(fuzzy.max_expansions, 50);
        assert_eq!(fuzzy.prefix_length, 0);
        assert!(fuzzy.transpositions);
        assert!(FuzzyConfig::DISABLED.is_none());
    }

    #[test]
    fn test_fixed_fuzziness_bounds() {
        for distance in 0..=MAX_EDIT_DISTANCE {
            let fixed = Fuzziness::fixed(distance).unwrap();
            assert_eq!(fixed, Fuzziness::Fixed(EditDistance::new(distance).unwrap()));
            assert_eq!(fixed.to_string(), distance.to_string());
        }
        assert!(matches!(
            Fuzziness::fixed(3),
            Err(FuzzyError::InvalidEditDistance(3))
        ));
        assert!(matches!(
            EditDistance::new(u8::MAX),
            Err(FuzzyError::InvalidEditDistance(255))
        ));
    }

    #[test]
    fn test_fuzziness_serialization() {
        assert_eq!(serde_json::to_string(&Fuzziness::Auto).unwrap(), "\"AUTO\"");
        assert_eq!(serde_json::to_string(&Fuzziness::fixed(1).unwrap()).unwrap(), "1");
    }

    #[test]
    fn test_fuzziness_deserialization() {
        let auto: Fuzziness = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(auto, Fuzziness::Auto);
        let fixed: Fuzziness = serde_json::from_str("2").unwrap();
        assert_eq!(fixed, Fuzziness::fixed(2).unwrap());
        let text: Fuzziness = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(text, Fuzziness::fixed(1).unwrap());
        assert!(serde_json::from_str::<Fuzziness>("5").is_err());
        assert!(serde_json::from_str::<Fuzziness>("\"fast\"").is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let fuzzy: FuzzyConfig = serde_json::from_str(r#"{"prefix_length": 2}"#).unwrap();
        assert_eq!(fuzzy, FuzzyConfig::AUTO.with_prefix_length(2));
    }
}
