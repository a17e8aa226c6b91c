//! Tests for command-line parsing and command dispatch

#[cfg(test)]
mod tests {
    use clap::Parser;
    use layergen::io::cli::{Cli, Command, CommandRunner};
    use layergen::io::configuration::DEFAULT_SEED;
    use std::fs;
    use std::path::{Path, PathBuf};

    const CONFIG: &str = r#"{
        "name_prefix": "Critter",
        "description": "First run",
        "base_uri": "ipfs://first",
        "layer_configurations": [
            { "grow_edition_size_to": 3, "layers_order": [{ "name": "bg" }, { "name": "body" }] }
        ]
    }"#;

    fn write_layer(root: &Path, name: &str, files: &[&str]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).expect("create layer directory");
        for file in files {
            fs::write(dir.join(file), b"").expect("write element");
        }
    }

    fn path_arg(path: &Path) -> &str {
        path.to_str().expect("utf-8 temp path")
    }

    // Tests generate parsing with only the required configuration
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_generate_defaults() {
        let cli = Cli::parse_from(["layergen", "generate", "--config", "config.json"]);

        assert!(!cli.quiet);
        assert!(cli.should_show_progress());
        assert_eq!(
            cli.command,
            Command::Generate {
                config: PathBuf::from("config.json"),
                layers_dir: PathBuf::from("layers"),
                build_dir: PathBuf::from("build"),
                seed: DEFAULT_SEED,
                metadata_only: false,
            }
        );
    }

    // Tests every generate flag and the global quiet flag after the subcommand
    // Verified by removing the global attribute from quiet
    #[test]
    fn test_generate_all_args() {
        let cli = Cli::parse_from([
            "layergen",
            "generate",
            "-c",
            "cfg.json",
            "--layers-dir",
            "art",
            "--build-dir",
            "out",
            "--seed",
            "7",
            "--metadata-only",
            "--quiet",
        ]);

        assert!(cli.quiet);
        assert_eq!(
            cli.command,
            Command::Generate {
                config: PathBuf::from("cfg.json"),
                layers_dir: PathBuf::from("art"),
                build_dir: PathBuf::from("out"),
                seed: 7,
                metadata_only: true,
            }
        );
    }

    // Tests the remaining subcommands
    // Verified by renaming the update-info subcommand
    #[test]
    fn test_other_subcommands() {
        let rarity = Cli::parse_from(["layergen", "-q", "rarity", "--config", "c.json"]);
        assert!(rarity.quiet);
        assert!(matches!(rarity.command, Command::Rarity { .. }));

        let update = Cli::parse_from(["layergen", "update-info", "-c", "c.json", "-b", "dist"]);
        assert_eq!(
            update.command,
            Command::UpdateInfo {
                config: PathBuf::from("c.json"),
                build_dir: PathBuf::from("dist"),
            }
        );
    }

    // Tests the configuration flag is required
    // Verified by giving the flag a default
    #[test]
    fn test_config_required() {
        assert!(Cli::try_parse_from(["layergen", "generate"]).is_err());
        assert!(Cli::try_parse_from(["layergen"]).is_err());
    }

    // Tests generate, rarity and update-info against one build directory
    // Verified by skipping the aggregate metadata write
    #[test]
    fn test_commands_end_to_end() {
        let dir = tempfile::tempdir().expect("temp dir");
        let layers = dir.path().join("layers");
        let build = dir.path().join("build");
        let config = dir.path().join("config.json");
        write_layer(&layers, "bg", &["red#1.png", "blue#1.png"]);
        write_layer(&layers, "body", &["body_tall.png", "body_short.png"]);
        fs::write(&config, CONFIG).expect("write config");

        let generate = Cli::parse_from([
            "layergen",
            "--quiet",
            "generate",
            "--config",
            path_arg(&config),
            "--layers-dir",
            path_arg(&layers),
            "--build-dir",
            path_arg(&build),
            "--metadata-only",
        ]);
        CommandRunner::new(generate).run().expect("generate succeeds");

        let list = fs::read_to_string(build.join("json/_metadata.json")).expect("aggregate");
        let records: serde_json::Value = serde_json::from_str(&list).expect("json");
        assert_eq!(records.as_array().map(Vec::len), Some(3));
        for edition in 1..=3 {
            assert!(build.join(format!("json/{edition}.json")).is_file());
        }

        let rarity = Cli::parse_from([
            "layergen",
            "--quiet",
            "rarity",
            "--config",
            path_arg(&config),
            "--layers-dir",
            path_arg(&layers),
            "--build-dir",
            path_arg(&build),
        ]);
        CommandRunner::new(rarity).run().expect("rarity succeeds");
        let csv = fs::read_to_string(build.join("rarity.csv")).expect("rarity report");
        assert!(csv.starts_with("trait_type,trait,occurrence,rarity_percent"));

        fs::write(
            &config,
            CONFIG
                .replace("First run", "Second run")
                .replace("ipfs://first", "ipfs://second"),
        )
        .expect("rewrite config");
        let update = Cli::parse_from([
            "layergen",
            "--quiet",
            "update-info",
            "--config",
            path_arg(&config),
            "--build-dir",
            path_arg(&build),
        ]);
        CommandRunner::new(update).run().expect("update succeeds");

        let first = fs::read_to_string(build.join("json/1.json")).expect("edition metadata");
        assert!(first.contains("Second run"));
        assert!(first.contains("ipfs://second/1.png"));
    }

    // Tests a missing configuration file is reported
    // Verified by falling back to a default configuration
    #[test]
    fn test_missing_config_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = dir.path().join("absent.json");
        let build = dir.path().join("build");

        let cli = Cli::parse_from([
            "layergen",
            "-q",
            "update-info",
            "-c",
            path_arg(&config),
            "-b",
            path_arg(&build),
        ]);

        assert!(CommandRunner::new(cli).run().is_err());
    }
}
