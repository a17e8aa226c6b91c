use crate::{
    algorithm::render::Renderer,
    algorithm::sampler::{DnaSampler, ExclusionTable},
    algorithm::uniqueness::{Admission, UniquenessTracker},
    analysis::metadata::{MetadataRecord, MetadataTemplate, assemble},
    io::configuration::{GenerationConfig, LayerConfiguration},
    io::error::{ErrorContext, Result, WithContext, invalid_parameter},
    layers::{Layer, LayerCatalog},
    math::random::RandomSelector,
};
use std::collections::VecDeque;

/// Edition numbers handed out in a fixed, optionally shuffled order
#[derive(Debug, Clone)]
pub struct EditionPool {
    numbers: VecDeque<usize>,
}

impl EditionPool {
    /// Pool of `1..=supply`, permuted once when `shuffle` is set
    pub fn new(supply: usize, shuffle: bool, random: &mut RandomSelector) -> Self {
        let mut numbers: Vec<usize> = (1..=supply).collect();
        if shuffle {
            random.shuffle(&mut numbers);
        }
        Self {
            numbers: numbers.into(),
        }
    }

    /// Consume the next edition number
    pub fn take_next(&mut self) -> Option<usize> {
        self.numbers.pop_front()
    }

    /// Next edition number without consuming it
    pub fn peek(&self) -> Option<usize> {
        self.numbers.front().copied()
    }

    /// Numbers not yet handed out
    pub fn remaining(&self) -> usize {
        self.numbers.len()
    }
}

/// Drives phases of sampling, admission, rendering and metadata assembly
///
/// All run state lives here: the uniqueness set, the edition pool, the random
/// source and the records produced so far. Editions are rendered one at a
/// time; a pool number is consumed only once a DNA has been admitted.
pub struct EditionExecutor {
    phases: Vec<LayerConfiguration>,
    catalog: LayerCatalog,
    sampler: DnaSampler,
    tracker: UniquenessTracker,
    pool: EditionPool,
    random: RandomSelector,
    template: MetadataTemplate,
    phase_index: usize,
    active_layers: Option<Vec<Layer>>,
    records: Vec<MetadataRecord>,
}

impl EditionExecutor {
    /// Prepare a run; the edition pool is built (and shuffled) here
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: &GenerationConfig, catalog: LayerCatalog, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut random = RandomSelector::new(seed);
        let pool = EditionPool::new(
            config.total_supply(),
            config.shuffle_layer_configurations,
            &mut random,
        );

        Ok(Self {
            phases: config.layer_configurations.clone(),
            catalog,
            sampler: DnaSampler::new(ExclusionTable::new(config.exclusions.clone())),
            tracker: UniquenessTracker::new(config.unique_dna_tolerance),
            pool,
            random,
            template: MetadataTemplate::from_config(config),
            phase_index: 0,
            active_layers: None,
            records: Vec::new(),
        })
    }

    /// Replace the sampler, e.g. to change the exclusion re-roll bound
    #[must_use]
    pub fn with_sampler(mut self, sampler: DnaSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Total editions once every phase completes
    pub fn total_supply(&self) -> usize {
        self.phases
            .last()
            .map_or(0, |phase| phase.grow_edition_size_to)
    }

    /// Editions produced so far
    pub fn produced(&self) -> usize {
        self.records.len()
    }

    /// Zero-based index of the phase being generated
    pub const fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// Whether every phase has reached its target
    pub fn is_complete(&self) -> bool {
        self.records.len() >= self.total_supply()
    }

    /// Duplicate draws rejected over the whole run
    pub const fn rejected_draws(&self) -> usize {
        self.tracker.total_rejections()
    }

    /// Number of configured phases
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Records produced so far, in creation order
    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    /// Take ownership of the produced records
    pub fn into_records(self) -> Vec<MetadataRecord> {
        self.records
    }

    /// Produce the next edition
    ///
    /// Moves to the next phase when the current target is reached, loading
    /// its layers once. Returns `None` after the final phase.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer cannot be loaded, the uniqueness tolerance
    /// or exclusion re-roll bound is exhausted, rendering fails, or the
    /// renderer reports the wrong number of attributes
    pub fn execute_edition<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
    ) -> Result<Option<&MetadataRecord>> {
        let target = loop {
            let Some(phase) = self.phases.get(self.phase_index) else {
                return Ok(None);
            };
            let target = phase.grow_edition_size_to;

            if self.records.len() >= target {
                self.phase_index += 1;
                self.active_layers = None;
                continue;
            }

            if self.active_layers.is_none() {
                log::info!(
                    "Phase {} of {}: growing to {target} editions",
                    self.phase_index + 1,
                    self.phases.len()
                );
                self.active_layers = Some(self.catalog.setup(&phase.layers_order)?);
            }
            break target;
        };

        let layers = self.active_layers.as_deref().unwrap_or_default();

        let dna = loop {
            let candidate = self
                .sampler
                .draw(layers, &mut self.random)
                .with_target(target)?;

            match self.tracker.admit(&candidate) {
                Admission::Accepted => break candidate,
                Admission::Rejected => {
                    log::debug!("DNA exists: {candidate}");
                    self.tracker.record_rejection(target)?;
                }
            }
        };

        let edition = self.pool.take_next().ok_or_else(|| {
            invalid_parameter(
                "grow_edition_size_to",
                &target,
                &"edition pool exhausted before the phase target",
            )
        })?;

        let selection = dna.resolve(layers)?;
        let output = renderer.render(edition, &selection)?;
        let record = assemble(&dna, edition, output, layers.len(), &self.template).with_context(
            ErrorContext {
                target: Some(target),
                edition: Some(edition),
            },
        )?;

        log::info!("Created edition {edition} with DNA {}", record.dna);
        self.records.push(record);
        Ok(self.records.last())
    }

    /// Run every phase to completion
    ///
    /// # Errors
    ///
    /// Propagates the first error of [`Self::execute_edition`]; no partial
    /// result is returned
    pub fn run<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<&[MetadataRecord]> {
        while self.execute_edition(renderer)?.is_some() {}
        Ok(&self.records)
    }
}
