//! Prompt assembly for the inference backends.
//!
//! Builds the three prompt kinds the advisory core sends out: strict
//! JSON-only range generation, farmer-facing advisory text, and the chat
//! system prompt. The exact wording is deliberately an implementation
//! detail; callers depend only on getting usable text back.

use serde::{Deserialize, Serialize};

use crate::types::{GrowthStage, ParameterKey, Reading, StatusEntry};

/// Response language for farmer-facing text.
///
/// The pilot deployment serves Omani farmers, so Arabic is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceLanguage {
    #[default]
    Arabic,
    English,
}

impl AdviceLanguage {
    fn instruction(&self) -> &'static str {
        match self {
            Self::Arabic => "Write the advisory in simple Modern Standard Arabic.",
            Self::English => "Write the advisory in plain English.",
        }
    }
}

/// Assembles prompts from readings, statuses, and plant context.
pub struct PromptAssembler;

impl PromptAssembler {
    /// Build the strict range-generation prompt.
    ///
    /// Instructs the model to return a single JSON object matching the
    /// target schema with no prose around it; the generator still tolerates
    /// stray commentary when parsing the reply.
    pub fn build_range_prompt(
        plant_display: &str,
        stage: GrowthStage,
        snapshot: Option<&Reading>,
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str("You are an agronomy expert working with the Nasgh soil probe.\n\n");
        prompt.push_str(&format!(
            "Produce the ideal soil target ranges for the plant {plant_display:?} \
             at the {stage} growth stage.\n\n"
        ));

        prompt.push_str("Parameters and units:\n");
        for param in ParameterKey::all() {
            prompt.push_str(&format!("- {}: {}\n", param.as_str(), param.label()));
        }

        if let Some(reading) = snapshot {
            if !reading.is_empty() {
                prompt.push_str("\nLatest probe reading, for context only:\n");
                prompt.push_str(&reading_json(reading));
                prompt.push('\n');
            }
        }

        prompt.push_str("\nReturn ONLY a JSON object, no explanation, no units inside numbers, ");
        prompt.push_str("in exactly this shape:\n\n");
        prompt.push_str("{\n");
        for (i, param) in ParameterKey::all().iter().enumerate() {
            let comma = if i + 1 < ParameterKey::all().len() { "," } else { "" };
            prompt.push_str(&format!(
                "  \"{}\": {{ \"min\": 0, \"max\": 0 }}{comma}\n",
                param.as_str()
            ));
        }
        prompt.push_str("}\n\n");
        prompt.push_str(
            "Replace the zeros with realistic values for this plant and stage. \
             Every max must be strictly greater than its min.\n",
        );

        prompt
    }

    /// Build the advisory prompt from a reading and its status summary.
    ///
    /// The statuses come from the classification table and the model is told
    /// not to contradict them; the table is the source of truth, the model
    /// only words the guidance.
    pub fn build_advice_prompt(
        reading: &Reading,
        statuses: &[StatusEntry],
        plant_name: Option<&str>,
        stage: Option<GrowthStage>,
        language: AdviceLanguage,
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "You are the Nasgh assistant, an expert at interpreting soil probe \
             readings for farmers.\n\n",
        );

        prompt.push_str("Soil reading:\n");
        prompt.push_str(&reading_json(reading));
        prompt.push_str("\n\n");

        prompt.push_str("Per-parameter status against the ideal range:\n");
        if statuses.is_empty() {
            prompt.push_str("(no parameters could be classified)\n");
        }
        for entry in statuses {
            prompt.push_str(&format!(
                "- {}: {} (value {}, ideal {}-{})\n",
                entry.parameter.label(),
                entry.status.as_str(),
                entry.value,
                entry.range.min,
                entry.range.max
            ));
        }

        prompt.push_str(&format!(
            "\nPlant: {}\nGrowth stage: {}\n\n",
            plant_name.unwrap_or("not specified"),
            stage.map(|s| s.as_str()).unwrap_or("not specified")
        ));

        prompt.push_str("Write a cohesive advisory for the farmer covering:\n");
        prompt.push_str("1. Overall soil condition (good, fair, poor).\n");
        prompt.push_str(
            "2. For each classified parameter, whether it is deficient, adequate, \
             or in excess, consistent with the status list above. Never contradict \
             the list.\n",
        );
        prompt.push_str(
            "3. Practical steps: irrigation adjustments, fertilization (organic or \
             mineral, no brand names), and notes on salinity or pH when out of range.\n\n",
        );
        prompt.push_str("Use short, friendly sentences. Mention numbers only when needed. ");
        prompt.push_str(Self::language_line(language));
        prompt.push('\n');

        prompt
    }

    /// Build the system prompt for the follow-up chat assistant.
    pub fn build_chat_system_prompt(
        soil: Option<&Reading>,
        last_advice: Option<&str>,
        language: AdviceLanguage,
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "You are the Nasgh assistant for a soil monitoring and irrigation \
             project. You only discuss agriculture: soil, irrigation, \
             fertilization, and Nasgh probe readings (moisture, temperature, pH, \
             EC, NPK, SHS). For anything else, apologize briefly and decline.\n\n",
        );
        prompt.push_str(
            "Answer like a text message to a farmer: short sentences, warm and \
             practical, no JSON, no markdown lists. ",
        );
        prompt.push_str(Self::language_line(language));
        prompt.push_str("\n\n");

        match soil {
            Some(reading) if !reading.is_empty() => {
                prompt.push_str("Latest soil reading:\n");
                prompt.push_str(&reading_json(reading));
                prompt.push_str("\n\n");
            }
            _ => prompt.push_str("No soil reading is attached.\n\n"),
        }

        if let Some(advice) = last_advice {
            if !advice.trim().is_empty() {
                prompt.push_str("Last advisory shown to the farmer:\n");
                prompt.push_str(advice);
                prompt.push_str("\n\n");
            }
        }

        prompt
    }

    fn language_line(language: AdviceLanguage) -> &'static str {
        language.instruction()
    }
}

fn reading_json(reading: &Reading) -> String {
    serde_json::to_string_pretty(reading).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NutrientStatus, Range};

    #[test]
    fn test_range_prompt_lists_full_schema() {
        let prompt = PromptAssembler::build_range_prompt("Dragonfruit", GrowthStage::Flowering, None);
        for param in ParameterKey::all() {
            assert!(
                prompt.contains(&format!("\"{}\"", param.as_str())),
                "schema block is missing {param}"
            );
        }
        assert!(prompt.contains("Dragonfruit"));
        assert!(prompt.contains("flowering"));
        assert!(prompt.contains("ONLY a JSON object"));
    }

    #[test]
    fn test_range_prompt_includes_snapshot_when_present() {
        let reading = Reading::new().with(ParameterKey::Ph, 6.8);
        let with = PromptAssembler::build_range_prompt("okra", GrowthStage::Harvest, Some(&reading));
        let without = PromptAssembler::build_range_prompt("okra", GrowthStage::Harvest, None);
        assert!(with.contains("probe reading"));
        assert!(!without.contains("probe reading"));
    }

    #[test]
    fn test_advice_prompt_carries_status_table() {
        let reading = Reading::new().with(ParameterKey::Moisture, 40.0);
        let statuses = vec![StatusEntry {
            parameter: ParameterKey::Moisture,
            value: 40.0,
            range: Range::new(55.0, 65.0),
            status: NutrientStatus::Deficient,
        }];

        let prompt = PromptAssembler::build_advice_prompt(
            &reading,
            &statuses,
            Some("tomato"),
            Some(GrowthStage::Vegetative),
            AdviceLanguage::Arabic,
        );
        assert!(prompt.contains("deficient"));
        assert!(prompt.contains("tomato"));
        assert!(prompt.contains("Arabic"));
    }

    #[test]
    fn test_chat_prompt_mentions_missing_reading() {
        let prompt = PromptAssembler::build_chat_system_prompt(None, None, AdviceLanguage::default());
        assert!(prompt.contains("No soil reading"));
    }
}
