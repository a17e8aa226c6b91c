//! Trait occurrence counts and rarity percentages over a finished collection
//!
//! Every trait value a layer could produce is declared up front with zero
//! occurrences, so values that never appeared still show up in the report.

use crate::analysis::metadata::MetadataRecord;
use crate::layers::Layer;
use crate::math::probability::percentage;
use std::collections::HashMap;
use std::fmt;

/// Occurrence statistics of one trait value
#[derive(Debug, Clone, PartialEq)]
pub struct RarityEntry {
    /// Trait value
    pub value: String,
    /// Weight configured for the element
    pub weight: u32,
    /// Editions carrying this value
    pub occurrence: usize,
    /// `occurrence / edition_size * 100`, two decimals
    pub percentage: f64,
}

/// All values of one trait type
#[derive(Debug, Clone, PartialEq)]
pub struct TraitRarity {
    /// Layer display name
    pub trait_type: String,
    /// Values in declaration order
    pub entries: Vec<RarityEntry>,
}

impl TraitRarity {
    /// Entry for a value
    pub fn entry(&self, value: &str) -> Option<&RarityEntry> {
        self.entries.iter().find(|entry| entry.value == value)
    }

    /// Sum of the rounded percentages of every value
    pub fn percentage_total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.percentage).sum()
    }
}

/// Rarity of every declared trait over a collection
#[derive(Debug, Clone, PartialEq)]
pub struct RarityReport {
    /// Number of records analyzed
    pub edition_size: usize,
    /// Trait types in declaration order
    pub traits: Vec<TraitRarity>,
}

impl RarityReport {
    /// Statistics of one trait type
    pub fn trait_type(&self, trait_type: &str) -> Option<&TraitRarity> {
        self.traits.iter().find(|t| t.trait_type == trait_type)
    }

    /// Delimited text with columns type, value, occurrence, percentage
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("trait_type,trait,occurrence,rarity_percent\n");
        for rarity in &self.traits {
            for entry in &rarity.entries {
                csv.push_str(&format!(
                    "{},{},{},{:.2}\n",
                    csv_field(&rarity.trait_type),
                    csv_field(&entry.value),
                    entry.occurrence,
                    entry.percentage
                ));
            }
        }
        csv
    }
}

impl fmt::Display for RarityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rarity in &self.traits {
            writeln!(f, "Trait type: {}", rarity.trait_type)?;
            let width = rarity
                .entries
                .iter()
                .map(|entry| entry.value.chars().count())
                .max()
                .unwrap_or(0);
            for entry in &rarity.entries {
                writeln!(
                    f,
                    "  {:<width$}  {} in {} editions ({:.2} %)",
                    entry.value, entry.occurrence, self.edition_size, entry.percentage
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Count trait occurrences across every record
///
/// `declared_layers` lists the layers of all phases; layers sharing a display
/// name contribute to the same trait type. Attributes that match no declared
/// value are logged and left out.
pub fn analyze(records: &[MetadataRecord], declared_layers: &[Layer]) -> RarityReport {
    let mut traits: Vec<TraitRarity> = Vec::new();
    let mut positions: HashMap<(String, String), (usize, usize)> = HashMap::new();

    for layer in declared_layers {
        let trait_index = traits
            .iter()
            .position(|t| t.trait_type == layer.display_name)
            .unwrap_or_else(|| {
                traits.push(TraitRarity {
                    trait_type: layer.display_name.clone(),
                    entries: Vec::new(),
                });
                traits.len() - 1
            });
        let Some(rarity) = traits.get_mut(trait_index) else {
            continue;
        };

        for element in &layer.elements {
            let value = element.trait_value();
            let key = (layer.display_name.clone(), value.clone());
            if positions.contains_key(&key) {
                continue;
            }
            positions.insert(key, (trait_index, rarity.entries.len()));
            rarity.entries.push(RarityEntry {
                value,
                weight: element.weight,
                occurrence: 0,
                percentage: 0.0,
            });
        }
    }

    for record in records {
        for attribute in &record.attributes {
            let key = (attribute.trait_type.clone(), attribute.value.clone());
            let entry = positions.get(&key).and_then(|&(t, e)| {
                traits
                    .get_mut(t)
                    .and_then(|rarity| rarity.entries.get_mut(e))
            });
            match entry {
                Some(entry) => entry.occurrence += 1,
                None => log::warn!(
                    "Edition {} has undeclared trait '{}' = '{}'",
                    record.edition,
                    attribute.trait_type,
                    attribute.value
                ),
            }
        }
    }

    let edition_size = records.len();
    for entry in traits.iter_mut().flat_map(|t| t.entries.iter_mut()) {
        entry.percentage = percentage(entry.occurrence, edition_size);
    }

    RarityReport {
        edition_size,
        traits,
    }
}
