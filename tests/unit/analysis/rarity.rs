//! Tests for trait occurrence counting and rarity reports

#[cfg(test)]
mod tests {
    use layergen::algorithm::dna::Dna;
    use layergen::analysis::metadata::{
        Attribute, MetadataRecord, MetadataTemplate, RenderOutput, assemble,
    };
    use layergen::analysis::rarity::analyze;
    use layergen::layers::Layer;

    fn record(edition: usize, attributes: Vec<Attribute>) -> MetadataRecord {
        let count = attributes.len();
        let dna = Dna::parse(&format!("{edition}:x.png")).expect("valid DNA");
        assemble(
            &dna,
            edition,
            RenderOutput {
                file_extension: "png".to_string(),
                attributes,
            },
            count,
            &MetadataTemplate::default(),
        )
        .expect("counts match")
    }

    fn declared() -> Vec<Layer> {
        vec![
            Layer::from_filenames(0, "bg", &["red#1.png", "blue#1.png", "green#2.png"], '#'),
            Layer::from_filenames(1, "body", &["body_tall.png", "body_short.png"], '#'),
        ]
    }

    fn records() -> Vec<MetadataRecord> {
        vec![
            record(1, vec![Attribute::new("bg", "Red"), Attribute::new("body", "Tall")]),
            record(2, vec![Attribute::new("bg", "Red"), Attribute::new("body", "Short")]),
            record(3, vec![Attribute::new("bg", "Blue"), Attribute::new("body", "Tall")]),
        ]
    }

    // Tests occurrences and rounded percentages per value
    // Verified by dividing by the number of values instead of editions
    #[test]
    fn test_counts_and_percentages() {
        let report = analyze(&records(), &declared());
        let bg = report.trait_type("bg").expect("declared trait");

        assert_eq!(report.edition_size, 3);
        let red = bg.entry("Red").expect("declared value");
        assert_eq!(red.occurrence, 2);
        assert!((red.percentage - 66.67).abs() < 1e-9);
        assert_eq!(red.weight, 1);
        assert!((bg.entry("Blue").expect("declared value").percentage - 33.33).abs() < 1e-9);
    }

    // Tests values that never appeared are still reported
    // Verified by only declaring observed values
    #[test]
    fn test_unused_values_reported() {
        let report = analyze(&records(), &declared());
        let green = report
            .trait_type("bg")
            .and_then(|bg| bg.entry("Green"))
            .expect("declared value");

        assert_eq!(green.occurrence, 0);
        assert!(green.percentage.abs() < f64::EPSILON);
        assert_eq!(green.weight, 2);
    }

    // Tests each trait type's percentages add up to 100
    // Verified by counting an attribute twice
    #[test]
    fn test_percentages_sum_to_hundred() {
        let report = analyze(&records(), &declared());

        for rarity in &report.traits {
            assert!(
                (rarity.percentage_total() - 100.0).abs() <= 0.05,
                "{} sums to {}",
                rarity.trait_type,
                rarity.percentage_total()
            );
        }
    }

    // Tests layers sharing a display name contribute to one trait type
    // Verified by replacing the earlier layer's values
    #[test]
    fn test_shared_display_names_merge() {
        let first = Layer::from_filenames(0, "bg", &["red.png"], '#');
        let mut second = Layer::from_filenames(0, "bg_special", &["gold.png"], '#');
        second.display_name = "bg".to_string();
        let records = vec![
            record(1, vec![Attribute::new("bg", "Gold")]),
            record(2, vec![Attribute::new("bg", "Red")]),
        ];

        let report = analyze(&records, &[first, second]);

        assert_eq!(report.traits.len(), 1);
        let bg = report.trait_type("bg").expect("declared trait");
        assert_eq!(bg.entries.len(), 2);
        assert_eq!(bg.entry("Gold").map(|e| e.occurrence), Some(1));
    }

    // Tests undeclared attributes are left out
    // Verified by inserting unknown values on the fly
    #[test]
    fn test_undeclared_attributes_ignored() {
        let records = vec![record(1, vec![Attribute::new("hat", "Tophat")])];

        let report = analyze(&records, &declared());

        assert!(report.trait_type("hat").is_none());
        assert_eq!(report.traits.len(), 2);
    }

    // Tests the CSV layout and quoting
    // Verified by omitting the header row
    #[test]
    fn test_csv_output() {
        let layers = vec![Layer::from_filenames(0, "bg", &["red,ish.png", "blue.png"], '#')];
        let records = vec![record(1, vec![Attribute::new("bg", "Red,ish")])];

        let csv = analyze(&records, &layers).to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "trait_type,trait,occurrence,rarity_percent",
                "bg,\"Red,ish\",1,100.00",
                "bg,Blue,0,0.00",
            ]
        );
    }

    // Tests the console table lists every trait type and value
    // Verified by skipping trait headers
    #[test]
    fn test_display_table() {
        let text = analyze(&records(), &declared()).to_string();

        assert!(text.contains("Trait type: bg"));
        assert!(text.contains("Trait type: body"));
        assert!(text.contains("2 in 3 editions (66.67 %)"));
    }

    // Tests each row reads value, occurrence, then percentage
    // Verified by printing the element weight between value and occurrence
    #[test]
    fn test_display_row_order() {
        let text = analyze(&records(), &declared()).to_string();

        assert!(text.lines().any(|line| line == "  Red    2 in 3 editions (66.67 %)"));
        assert!(text.lines().any(|line| line == "  Green  0 in 3 editions (0.00 %)"));
        assert!(!text.contains("weight"));
    }

    // Tests an empty collection yields zero percentages
    // Verified by dividing by zero
    #[test]
    fn test_empty_collection() {
        let report = analyze(&[], &declared());

        assert_eq!(report.edition_size, 0);
        assert!(
            report
                .traits
                .iter()
                .flat_map(|t| &t.entries)
                .all(|e| e.percentage.abs() < f64::EPSILON)
        );
    }
}
