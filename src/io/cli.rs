//! Command-line interface for generating, analyzing and re-labelling a collection

use crate::algorithm::executor::EditionExecutor;
use crate::algorithm::render::{AttributeRenderer, Renderer};
use crate::analysis::metadata::MetadataTemplate;
use crate::analysis::rarity::analyze;
use crate::io::configuration::{DEFAULT_BUILD_DIR, DEFAULT_LAYERS_DIR, DEFAULT_SEED, GenerationConfig};
use crate::io::error::Result;
use crate::io::image::ImageCompositor;
use crate::io::output::BuildDirectory;
use crate::io::progress::ProgressManager;
use crate::layers::LayerCatalog;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "layergen")]
#[command(
    author,
    version,
    about = "Generate unique editions from weighted image layers"
)]
/// Command-line arguments for the edition generator
pub struct Cli {
    /// Suppress progress output and informational logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Operations on a collection
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate every edition of every phase
    Generate {
        /// Run configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Directory holding one sub-directory per layer
        #[arg(short, long, default_value = DEFAULT_LAYERS_DIR)]
        layers_dir: PathBuf,

        /// Directory receiving images and metadata; recreated on each run
        #[arg(short, long, default_value = DEFAULT_BUILD_DIR)]
        build_dir: PathBuf,

        /// Random seed for reproducible generation
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Skip image compositing and write metadata only
        #[arg(short, long)]
        metadata_only: bool,
    },

    /// Print trait rarity of a finished collection and write `rarity.csv`
    Rarity {
        /// Run configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Directory holding one sub-directory per layer
        #[arg(short, long, default_value = DEFAULT_LAYERS_DIR)]
        layers_dir: PathBuf,

        /// Directory holding the generated metadata
        #[arg(short, long, default_value = DEFAULT_BUILD_DIR)]
        build_dir: PathBuf,
    },

    /// Rewrite name, description and image reference of existing metadata
    UpdateInfo {
        /// Run configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Directory holding the generated metadata
        #[arg(short, long, default_value = DEFAULT_BUILD_DIR)]
        build_dir: PathBuf,
    },
}

/// Runs one parsed command with optional progress display
pub struct CommandRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CommandRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, generation is
    /// exhausted, or the build directory cannot be read or written
    pub fn run(&mut self) -> Result<()> {
        match self.cli.command.clone() {
            Command::Generate {
                config,
                layers_dir,
                build_dir,
                seed,
                metadata_only,
            } => self.generate(&config, layers_dir, build_dir, seed, metadata_only),
            Command::Rarity {
                config,
                layers_dir,
                build_dir,
            } => Self::rarity(&config, layers_dir, build_dir),
            Command::UpdateInfo { config, build_dir } => Self::update_info(&config, build_dir),
        }
    }

    fn generate(
        &mut self,
        config_path: &Path,
        layers_dir: PathBuf,
        build_dir: PathBuf,
        seed: u64,
        metadata_only: bool,
    ) -> Result<()> {
        let start_time = Instant::now();
        let config = GenerationConfig::from_path(config_path)?;
        let build = BuildDirectory::new(build_dir);
        build.setup()?;

        let mut renderer: Box<dyn Renderer> = if metadata_only {
            Box::new(AttributeRenderer::new())
        } else {
            Box::new(ImageCompositor::new(
                build.images_dir(),
                config.format,
                config.background.clone(),
                seed,
            )?)
        };

        let catalog = LayerCatalog::new(layers_dir, config.rarity_delimiter);
        let mut executor = EditionExecutor::new(&config, catalog, seed)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(executor.total_supply());
        }

        match self.generate_editions(&mut executor, renderer.as_mut(), &build) {
            Ok(()) => {
                if let Some(ref pm) = self.progress_manager {
                    pm.finish();
                }
            }
            Err(e) => {
                if let Some(ref pm) = self.progress_manager {
                    pm.abandon();
                }
                return Err(e);
            }
        }

        build.write_metadata_list(executor.records())?;
        log::info!(
            "Generated {} editions in {:.2?} ({} duplicate draws rejected)",
            executor.produced(),
            start_time.elapsed(),
            executor.rejected_draws()
        );
        Ok(())
    }

    fn generate_editions(
        &mut self,
        executor: &mut EditionExecutor,
        renderer: &mut dyn Renderer,
        build: &BuildDirectory,
    ) -> Result<()> {
        let mut labelled_phase = None;
        let mut rejected = executor.rejected_draws();

        while let Some(record) = executor.execute_edition(renderer)? {
            build.write_edition_metadata(record)?;
            let edition = record.edition;

            if let Some(ref mut pm) = self.progress_manager {
                if labelled_phase != Some(executor.phase_index()) {
                    labelled_phase = Some(executor.phase_index());
                    pm.start_phase(executor.phase_index(), executor.phase_count());
                }
                pm.duplicates_rejected(executor.rejected_draws() - rejected);
                pm.edition_created(edition);
            }
            rejected = executor.rejected_draws();
        }
        Ok(())
    }

    // The report table is this command's output
    #[allow(clippy::print_stdout)]
    fn rarity(config_path: &Path, layers_dir: PathBuf, build_dir: PathBuf) -> Result<()> {
        let config = GenerationConfig::from_path(config_path)?;
        let build = BuildDirectory::new(build_dir);
        let records = build.read_metadata_list()?;

        let catalog = LayerCatalog::new(layers_dir, config.rarity_delimiter);
        let layers = catalog.setup_all(&config.layer_configurations)?;
        let report = analyze(&records, &layers);

        println!("{report}");
        build.write_rarity_csv(&report)?;
        log::info!("Wrote {}", build.rarity_csv_path().display());
        Ok(())
    }

    fn update_info(config_path: &Path, build_dir: PathBuf) -> Result<()> {
        let config = GenerationConfig::from_path(config_path)?;
        let build = BuildDirectory::new(build_dir);
        let mut records = build.read_metadata_list()?;

        MetadataTemplate::from_config(&config).update(&mut records);
        for record in &records {
            build.write_edition_metadata(record)?;
        }
        build.write_metadata_list(&records)?;
        log::info!("Updated {} metadata records", records.len());
        Ok(())
    }
}
