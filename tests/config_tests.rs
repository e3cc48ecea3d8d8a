//! Junction configuration loading and validation tests

use std::path::Path;

use junction_sim::simulation::{
    default_junctions, load_junctions, parse_junctions, validate_junctions, ConfigError,
    JunctionDefinition,
};

#[test]
fn test_default_junctions_are_valid() {
    let junctions = default_junctions();
    assert_eq!(junctions.len(), 3);
    assert!(validate_junctions(&junctions).is_ok());
    assert_eq!(junctions[2].id, "junction-3");
    assert_eq!(junctions[2].approaches.len(), 5);
    assert_eq!(junctions[2].baseline_cycle_seconds, 150);
}

#[test]
fn test_parse_junction_file() {
    let text = r#"
        [[junctions]]
        id = "a"
        name = "Alpha"
        approaches = ["north", "south"]
        baseline_cycle_seconds = 60

        [[junctions]]
        id = "b"
        name = "Bravo"
        approaches = ["east", "west", "service"]
        baselineCycleSeconds = 75
    "#;
    let junctions = parse_junctions(text).unwrap();
    assert_eq!(
        junctions,
        vec![
            JunctionDefinition::new("a", "Alpha", ["north", "south"], 60),
            JunctionDefinition::new("b", "Bravo", ["east", "west", "service"], 75),
        ]
    );
}

#[test]
fn test_parse_rejects_bad_definitions() {
    let too_few = r#"
        [[junctions]]
        id = "a"
        name = "Alpha"
        approaches = ["north"]
        baseline_cycle_seconds = 60
    "#;
    assert!(matches!(
        parse_junctions(too_few),
        Err(ConfigError::TooFewApproaches { count: 1, .. })
    ));

    let repeated = r#"
        [[junctions]]
        id = "a"
        name = "Alpha"
        approaches = ["north", "north"]
        baseline_cycle_seconds = 60
    "#;
    assert!(matches!(
        parse_junctions(repeated),
        Err(ConfigError::DuplicateApproach { .. })
    ));

    assert!(matches!(
        parse_junctions("junctions = []"),
        Err(ConfigError::NoJunctions)
    ));
    assert!(matches!(
        parse_junctions("not toml at all ["),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_validate_rejects_empty_and_duplicate_ids() {
    let blank = JunctionDefinition::new(" ", "Blank", ["north", "south"], 60);
    assert!(matches!(
        validate_junctions(&[blank]),
        Err(ConfigError::EmptyId)
    ));

    let a = JunctionDefinition::new("a", "Alpha", ["north", "south"], 60);
    assert!(matches!(
        validate_junctions(&[a.clone(), a]),
        Err(ConfigError::DuplicateId { .. })
    ));
}

#[test]
fn test_load_missing_file() {
    let result = load_junctions(Path::new("/definitely/not/here/junctions.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}
