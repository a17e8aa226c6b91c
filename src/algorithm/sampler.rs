use crate::algorithm::dna::{Dna, DnaEntry};
use crate::io::configuration::EXCLUSION_REROLL_LIMIT;
use crate::io::error::{Exhaustion, GenerationError, Result};
use crate::layers::{Element, Layer};
use crate::math::random::RandomSelector;
use std::collections::BTreeMap;

/// Pairwise table of element file names that may not share a DNA
///
/// Each rule maps a trigger file name to the file name it clashes with. A
/// clash is detected against layers placed earlier in the same draw, in
/// either direction of the rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionTable {
    rules: BTreeMap<String, String>,
}

impl ExclusionTable {
    /// Table from trigger to conflicting file name
    pub const fn new(rules: BTreeMap<String, String>) -> Self {
        Self { rules }
    }

    /// Table from `(trigger, conflicting)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            rules: pairs
                .into_iter()
                .map(|(trigger, conflicting)| (trigger.to_string(), conflicting.to_string()))
                .collect(),
        }
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether placing `filename` after `placed` breaks a rule
    pub fn conflicts(&self, filename: &str, placed: &[DnaEntry]) -> bool {
        let is_placed = |name: &str| placed.iter().any(|entry| entry.filename == name);

        let trigger_hit = self
            .rules
            .get(filename)
            .is_some_and(|conflicting| is_placed(conflicting));
        let target_hit = self
            .rules
            .iter()
            .any(|(trigger, conflicting)| conflicting == filename && is_placed(trigger));

        trigger_hit || target_hit
    }
}

/// Draws one weighted element per layer under the exclusion table
#[derive(Debug, Clone)]
pub struct DnaSampler {
    exclusions: ExclusionTable,
    reroll_limit: usize,
}

impl DnaSampler {
    /// Sampler with the default re-roll bound
    pub const fn new(exclusions: ExclusionTable) -> Self {
        Self {
            exclusions,
            reroll_limit: EXCLUSION_REROLL_LIMIT,
        }
    }

    /// Same sampler with a different re-roll bound
    #[must_use]
    pub const fn with_reroll_limit(mut self, reroll_limit: usize) -> Self {
        self.reroll_limit = reroll_limit;
        self
    }

    /// Exclusion rules in use
    pub const fn exclusions(&self) -> &ExclusionTable {
        &self.exclusions
    }

    /// Draw a candidate DNA for the given layers
    ///
    /// Each layer is sampled independently in proportion to element weight.
    /// A draw that clashes with the exclusion table is re-rolled uniformly
    /// within the same layer.
    ///
    /// # Errors
    ///
    /// Returns `EmptyLayer` for a layer with no positive weight, and
    /// `ConfigurationExhausted` when the re-roll bound is exceeded. The
    /// exhaustion target is left at zero for the caller to fill in.
    pub fn draw(&self, layers: &[Layer], random: &mut RandomSelector) -> Result<Dna> {
        let mut entries = Vec::with_capacity(layers.len());

        for layer in layers {
            let weights: Vec<u32> = layer.elements.iter().map(|e| e.weight).collect();
            let mut chosen = random
                .weighted_index(&weights)
                .and_then(|index| layer.elements.get(index))
                .ok_or_else(|| GenerationError::EmptyLayer {
                    layer: layer.name.clone(),
                })?;

            if self.exclusions.conflicts(&chosen.filename, &entries) {
                log::debug!(
                    "Exclusion clash for '{}' in layer '{}', re-rolling",
                    chosen.filename,
                    layer.name
                );
                chosen = self.reroll(layer, &entries, random)?;
            }

            entries.push(DnaEntry::for_element(layer, chosen));
        }

        Ok(Dna::new(entries))
    }

    fn reroll<'a>(
        &self,
        layer: &'a Layer,
        placed: &[DnaEntry],
        random: &mut RandomSelector,
    ) -> Result<&'a Element> {
        for _ in 0..self.reroll_limit {
            let Some(candidate) = random
                .uniform_index(layer.elements.len())
                .and_then(|index| layer.elements.get(index))
            else {
                break;
            };

            if candidate.weight > 0 && !self.exclusions.conflicts(&candidate.filename, placed) {
                return Ok(candidate);
            }
        }

        Err(GenerationError::ConfigurationExhausted {
            target: 0,
            cause: Exhaustion::UnresolvableExclusion {
                layer: layer.name.clone(),
                attempts: self.reroll_limit,
            },
        })
    }
}
