//! Core types for soil parameters, target ranges, and readings.
//!
//! Wire names match the short keys used by the sensor firmware and the
//! generation schema (`temp`, `moisture`, `ec`, ...), so serialized values
//! stay interchangeable with the rest of the Nasgh deployment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of soil parameters tracked by a Nasgh probe.
///
/// Declaration order is the display order used in summaries and prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParameterKey {
    /// Soil temperature (°C)
    #[serde(rename = "temp")]
    Temperature,
    /// Volumetric soil moisture (%)
    #[serde(rename = "moisture")]
    Moisture,
    /// Electrical conductivity (µS/cm)
    #[serde(rename = "ec")]
    ElectricalConductivity,
    /// Acidity
    #[serde(rename = "ph")]
    Ph,
    /// Nitrogen (mg/kg)
    #[serde(rename = "n")]
    Nitrogen,
    /// Phosphorus (mg/kg)
    #[serde(rename = "p")]
    Phosphorus,
    /// Potassium (mg/kg)
    #[serde(rename = "k")]
    Potassium,
    /// Aggregate soil health score (0-100)
    #[serde(rename = "shs")]
    SoilHealthIndex,
    /// Humic acid index (0-20)
    #[serde(rename = "humic")]
    HumicIndex,
}

impl ParameterKey {
    /// All parameters in display order.
    pub fn all() -> [ParameterKey; 9] {
        [
            Self::Temperature,
            Self::Moisture,
            Self::ElectricalConductivity,
            Self::Ph,
            Self::Nitrogen,
            Self::Phosphorus,
            Self::Potassium,
            Self::SoilHealthIndex,
            Self::HumicIndex,
        ]
    }

    /// Short wire name (`temp`, `moisture`, `ec`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temp",
            Self::Moisture => "moisture",
            Self::ElectricalConductivity => "ec",
            Self::Ph => "ph",
            Self::Nitrogen => "n",
            Self::Phosphorus => "p",
            Self::Potassium => "k",
            Self::SoilHealthIndex => "shs",
            Self::HumicIndex => "humic",
        }
    }

    /// Human-readable label with unit, for prompts and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "soil temperature (°C)",
            Self::Moisture => "soil moisture (%)",
            Self::ElectricalConductivity => "electrical conductivity EC (µS/cm)",
            Self::Ph => "pH",
            Self::Nitrogen => "nitrogen N (mg/kg)",
            Self::Phosphorus => "phosphorus P (mg/kg)",
            Self::Potassium => "potassium K (mg/kg)",
            Self::SoilHealthIndex => "soil health score SHS (0-100)",
            Self::HumicIndex => "humic acid index (0-20)",
        }
    }

    /// Parse a wire name back into a key.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A target band for one soil parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Range {
    /// Create a new range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range is usable only when both bounds are finite and `max > min`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max > self.min
    }

    /// Whether a value falls inside the band, bounds inclusive.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Target ranges for a plant at one growth stage.
///
/// Parameters may be absent; an absent parameter means "no target
/// available", never an implicit zero band. Records handed to callers are
/// treated as immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeRecord {
    targets: BTreeMap<ParameterKey, Range>,
}

impl RangeRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the target range for one parameter.
    pub fn get(&self, parameter: ParameterKey) -> Option<Range> {
        self.targets.get(&parameter).copied()
    }

    /// Set the target range for one parameter.
    pub fn set(&mut self, parameter: ParameterKey, range: Range) {
        self.targets.insert(parameter, range);
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, parameter: ParameterKey, min: f64, max: f64) -> Self {
        self.set(parameter, Range::new(min, max));
        self
    }

    /// Number of parameters with a target.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the record holds no targets at all.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterate over targets in parameter order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, Range)> + '_ {
        self.targets.iter().map(|(k, v)| (*k, *v))
    }

    /// Whether every present target satisfies `max > min` with finite bounds.
    pub fn is_well_formed(&self) -> bool {
        self.targets.values().all(Range::is_valid)
    }
}

impl FromIterator<(ParameterKey, Range)> for RangeRecord {
    fn from_iter<I: IntoIterator<Item = (ParameterKey, Range)>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

/// Growth stage of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthStage {
    Vegetative,
    Flowering,
    FruitSetting,
    Harvest,
}

impl GrowthStage {
    /// All stages in lifecycle order.
    pub fn all() -> [GrowthStage; 4] {
        [
            Self::Vegetative,
            Self::Flowering,
            Self::FruitSetting,
            Self::Harvest,
        ]
    }

    /// Wire name (`vegetative`, `flowering`, `fruit-setting`, `harvest`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetative => "vegetative",
            Self::Flowering => "flowering",
            Self::FruitSetting => "fruit-setting",
            Self::Harvest => "harvest",
        }
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrowthStage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vegetative" => Ok(Self::Vegetative),
            "flowering" => Ok(Self::Flowering),
            "fruit-setting" | "fruit setting" | "fruiting" => Ok(Self::FruitSetting),
            "harvest" => Ok(Self::Harvest),
            other => Err(UnknownStage(other.to_string())),
        }
    }
}

/// Error for an unrecognized growth-stage name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown growth stage: {0:?}")]
pub struct UnknownStage(pub String);

/// Composite key identifying a plant at a growth stage.
///
/// `plant` is a normalized slug from [`crate::normalize`]; several display
/// names (aliases, scripts) resolve to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlantStageKey {
    /// Normalized plant slug
    pub plant: String,
    /// Growth stage
    pub stage: GrowthStage,
}

impl PlantStageKey {
    /// Create a new key.
    pub fn new(plant: impl Into<String>, stage: GrowthStage) -> Self {
        Self {
            plant: plant.into(),
            stage,
        }
    }

    /// Stable string form used as the persistence key.
    pub fn storage_key(&self) -> String {
        format!("{}/{}", self.plant, self.stage)
    }
}

impl fmt::Display for PlantStageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.plant, self.stage)
    }
}

/// One probe reading: measured values for a subset of the parameters.
///
/// Unknown parameters are simply absent. Produced by sensor ingestion and
/// consumed read-only by classification and prompt assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading {
    values: BTreeMap<ParameterKey, f64>,
}

impl Reading {
    /// Create an empty reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Measured value for one parameter, if present.
    pub fn get(&self, parameter: ParameterKey) -> Option<f64> {
        self.values.get(&parameter).copied()
    }

    /// Record a measured value.
    pub fn set(&mut self, parameter: ParameterKey, value: f64) {
        self.values.insert(parameter, value);
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, parameter: ParameterKey, value: f64) -> Self {
        self.set(parameter, value);
        self
    }

    /// Number of measured parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the reading holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over measured values in parameter order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(ParameterKey, f64)> for Reading {
    fn from_iter<I: IntoIterator<Item = (ParameterKey, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Three-way status of a measured value against its target range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientStatus {
    /// Below the target band
    Deficient,
    /// Inside the band, bounds inclusive
    Adequate,
    /// Above the target band
    Excess,
}

impl NutrientStatus {
    /// String form used in summaries and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deficient => "deficient",
            Self::Adequate => "adequate",
            Self::Excess => "excess",
        }
    }
}

/// Classification result for one parameter of one reading.
///
/// Derived per request and never persisted by the core. A parameter with no
/// target range or a non-finite value produces no entry at all; callers
/// treat "no entry" as insufficient data, distinct from the three statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Which parameter was classified
    pub parameter: ParameterKey,
    /// The measured value
    pub value: f64,
    /// The target range it was compared against
    pub range: Range,
    /// The resulting status
    pub status: NutrientStatus,
}

/// Which resolution tier produced a [`RangeRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Compile-time table hit
    Static,
    /// Persisted from an earlier generation
    Cached,
    /// Freshly generated by an inference backend
    Generated,
}

impl Provenance {
    /// String form used in responses and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Cached => "cached",
            Self::Generated => "generated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_wire_names_round_trip() {
        for param in ParameterKey::all() {
            assert_eq!(ParameterKey::from_wire(param.as_str()), Some(param));
        }
        assert_eq!(ParameterKey::from_wire("npk"), None);
    }

    #[test]
    fn test_parameter_serde_uses_wire_names() {
        let json = serde_json::to_string(&ParameterKey::ElectricalConductivity).unwrap();
        assert_eq!(json, "\"ec\"");
        let back: ParameterKey = serde_json::from_str("\"shs\"").unwrap();
        assert_eq!(back, ParameterKey::SoilHealthIndex);
    }

    #[test]
    fn test_range_validity() {
        assert!(Range::new(6.0, 7.5).is_valid());
        assert!(!Range::new(7.5, 6.0).is_valid());
        assert!(!Range::new(6.0, 6.0).is_valid());
        assert!(!Range::new(f64::NAN, 7.5).is_valid());
        assert!(!Range::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = Range::new(55.0, 65.0);
        assert!(range.contains(55.0));
        assert!(range.contains(65.0));
        assert!(!range.contains(54.999));
        assert!(!range.contains(65.001));
    }

    #[test]
    fn test_record_round_trip() {
        let record = RangeRecord::new()
            .with(ParameterKey::Ph, 6.0, 7.5)
            .with(ParameterKey::Moisture, 55.0, 65.0);

        let json = serde_json::to_string(&record).unwrap();
        let back: RangeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.get(ParameterKey::Ph), Some(Range::new(6.0, 7.5)));
        assert_eq!(back.get(ParameterKey::Nitrogen), None);
    }

    #[test]
    fn test_stage_wire_names() {
        assert_eq!(GrowthStage::FruitSetting.as_str(), "fruit-setting");
        assert_eq!(
            serde_json::to_string(&GrowthStage::FruitSetting).unwrap(),
            "\"fruit-setting\""
        );
        assert_eq!("fruit setting".parse::<GrowthStage>().unwrap(), GrowthStage::FruitSetting);
        assert!("ripening".parse::<GrowthStage>().is_err());
    }

    #[test]
    fn test_storage_key() {
        let key = PlantStageKey::new("tomato", GrowthStage::Harvest);
        assert_eq!(key.storage_key(), "tomato/harvest");
    }
}
