//! Compile-time target-range table for known plants.
//!
//! Covers the ten plants the Nasgh pilot ships with, across all four growth
//! stages. Plants of the same cultivation family share a template record;
//! the sharing is a storage convenience, not an identity relationship
//! between plants. The table is never mutated at runtime.

use crate::types::{GrowthStage, ParameterKey, RangeRecord};

/// Template family backing a plant's targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    /// Annual vegetables and berries grown in beds or greenhouses
    Vegetable,
    /// Trees and vines: citrus, olive, grape, date palm
    Orchard,
}

/// Look up the static target record for a plant key at a growth stage.
///
/// Returns `None` for plants outside the shipped set; the resolver then
/// falls through to the cache and generation tiers.
pub fn lookup(plant_key: &str, stage: GrowthStage) -> Option<RangeRecord> {
    let template = match plant_key {
        "tomato" | "cucumber" | "lettuce" | "pepper" | "eggplant" | "strawberry" => {
            Template::Vegetable
        }
        "lemon" | "olive" | "grape" | "date-palm" => Template::Orchard,
        _ => return None,
    };

    Some(build(template, stage))
}

/// Whether a plant key has static coverage at every stage.
pub fn is_known_plant(plant_key: &str) -> bool {
    lookup(plant_key, GrowthStage::Vegetative).is_some()
}

fn build(template: Template, stage: GrowthStage) -> RangeRecord {
    match template {
        Template::Vegetable => vegetable(stage),
        Template::Orchard => orchard(stage),
    }
}

/// Generic vegetable template. Nitrogen leads during vegetative growth,
/// phosphorus during flowering, potassium once fruit is setting.
fn vegetable(stage: GrowthStage) -> RangeRecord {
    let base = RangeRecord::new()
        .with(ParameterKey::Temperature, 18.0, 26.0)
        .with(ParameterKey::Moisture, 55.0, 65.0)
        .with(ParameterKey::ElectricalConductivity, 800.0, 2200.0)
        .with(ParameterKey::Ph, 6.0, 7.5)
        .with(ParameterKey::SoilHealthIndex, 70.0, 90.0)
        .with(ParameterKey::HumicIndex, 6.0, 18.0);

    match stage {
        GrowthStage::Vegetative => base
            .with(ParameterKey::Nitrogen, 120.0, 180.0)
            .with(ParameterKey::Phosphorus, 60.0, 100.0)
            .with(ParameterKey::Potassium, 200.0, 280.0),
        GrowthStage::Flowering => base
            .with(ParameterKey::Nitrogen, 100.0, 150.0)
            .with(ParameterKey::Phosphorus, 80.0, 120.0)
            .with(ParameterKey::Potassium, 220.0, 300.0),
        GrowthStage::FruitSetting => base
            .with(ParameterKey::Nitrogen, 90.0, 140.0)
            .with(ParameterKey::Phosphorus, 70.0, 110.0)
            .with(ParameterKey::Potassium, 250.0, 330.0),
        GrowthStage::Harvest => base
            .with(ParameterKey::Moisture, 50.0, 60.0)
            .with(ParameterKey::Nitrogen, 80.0, 130.0)
            .with(ParameterKey::Phosphorus, 60.0, 100.0)
            .with(ParameterKey::Potassium, 230.0, 310.0),
    }
}

/// Orchard template for trees and vines. Wider temperature tolerance and
/// drier soil than bed vegetables.
fn orchard(stage: GrowthStage) -> RangeRecord {
    let base = RangeRecord::new()
        .with(ParameterKey::Temperature, 16.0, 30.0)
        .with(ParameterKey::Moisture, 40.0, 55.0)
        .with(ParameterKey::ElectricalConductivity, 600.0, 2000.0)
        .with(ParameterKey::Ph, 6.0, 8.0)
        .with(ParameterKey::SoilHealthIndex, 65.0, 90.0)
        .with(ParameterKey::HumicIndex, 5.0, 16.0);

    match stage {
        GrowthStage::Vegetative => base
            .with(ParameterKey::Nitrogen, 110.0, 170.0)
            .with(ParameterKey::Phosphorus, 50.0, 90.0)
            .with(ParameterKey::Potassium, 180.0, 260.0),
        GrowthStage::Flowering => base
            .with(ParameterKey::Nitrogen, 90.0, 140.0)
            .with(ParameterKey::Phosphorus, 70.0, 110.0)
            .with(ParameterKey::Potassium, 200.0, 280.0),
        GrowthStage::FruitSetting => base
            .with(ParameterKey::Nitrogen, 80.0, 130.0)
            .with(ParameterKey::Phosphorus, 60.0, 100.0)
            .with(ParameterKey::Potassium, 230.0, 310.0),
        GrowthStage::Harvest => base
            .with(ParameterKey::Moisture, 35.0, 50.0)
            .with(ParameterKey::Nitrogen, 70.0, 120.0)
            .with(ParameterKey::Phosphorus, 50.0, 90.0)
            .with(ParameterKey::Potassium, 210.0, 290.0),
    }
}
