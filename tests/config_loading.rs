// tests/config_loading.rs

use std::io::Write;

use tempfile::NamedTempFile;

use livefire::cli::CliArgs;
use livefire::config::{load_and_validate, load_for_cli, ConfigFile};
use livefire::errors::LivefireError;
use livefire::types::InitialClock;
use livefire_test_utils::builders::ConfigFileBuilder;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn args_with_config(path: &str) -> CliArgs {
    CliArgs {
        files: Vec::new(),
        config: Some(path.to_string()),
        debounce_ms: None,
        initial_clock: None,
        log_level: None,
        dry_run: false,
    }
}

#[test]
fn full_file_is_loaded() {
    let file = toml_file(
        r#"
[watch]
files = ["index.html", "css/site.css"]
debounce_ms = 120
event_buffer = 8

[coordinator]
initial_clock = "zero"
wait_queue = 16
max_pending = 64
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.watch().files, vec!["index.html", "css/site.css"]);
    assert_eq!(cfg.stalker_options().debounce.as_millis(), 120);
    assert_eq!(cfg.stalker_options().event_buffer, 8);

    let opts = cfg.coordinator_options();
    assert_eq!(opts.initial_clock, InitialClock::Zero);
    assert_eq!(opts.wait_queue, 16);
    assert_eq!(opts.max_pending, 64);
}

#[test]
fn missing_keys_take_defaults() {
    let file = toml_file("[watch]\nfiles = [\"a.html\"]\n");

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.watch().debounce_ms, 50);
    assert_eq!(cfg.watch().event_buffer, 32);
    assert_eq!(cfg.coordinator().initial_clock, InitialClock::Now);
    assert_eq!(cfg.coordinator().wait_queue, 256);
    assert_eq!(cfg.coordinator().max_pending, 4096);
}

#[test]
fn empty_watch_list_is_a_config_error() {
    let file = toml_file("[coordinator]\nmax_pending = 10\n");

    match load_and_validate(file.path()) {
        Err(LivefireError::ConfigError(msg)) => assert!(msg.contains("nothing to watch")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn zero_capacity_is_a_config_error() {
    let file = toml_file("[watch]\nfiles = [\"a.html\"]\n\n[coordinator]\nwait_queue = 0\n");

    match load_and_validate(file.path()) {
        Err(LivefireError::ConfigError(msg)) => assert!(msg.contains("wait_queue")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn unknown_clock_is_a_toml_error() {
    let file = toml_file("[watch]\nfiles = [\"a.html\"]\n\n[coordinator]\ninitial_clock = \"yesterday\"\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(LivefireError::TomlError(_))
    ));
}

#[test]
fn missing_explicit_config_is_an_io_error() {
    let args = args_with_config("/definitely/not/here/Livefire.toml");

    assert!(matches!(load_for_cli(&args), Err(LivefireError::IoError(_))));
}

#[test]
fn cli_files_and_flags_are_merged_over_the_file() {
    let file = toml_file("[watch]\nfiles = [\"a.html\"]\ndebounce_ms = 200\n");
    let mut args = args_with_config(file.path().to_str().unwrap());
    args.files = vec!["b.css".to_string()];
    args.debounce_ms = Some(0);
    args.initial_clock = Some(InitialClock::Zero);

    let cfg = load_for_cli(&args).unwrap();

    assert_eq!(cfg.watch().files, vec!["a.html", "b.css"]);
    assert_eq!(cfg.watch().debounce_ms, 0);
    assert_eq!(cfg.coordinator().initial_clock, InitialClock::Zero);
}

#[test]
fn built_config_maps_onto_component_options() {
    let cfg = ConfigFileBuilder::new()
        .file("index.html")
        .debounce_ms(0)
        .event_buffer(4)
        .initial_clock(InitialClock::Zero)
        .wait_queue(2)
        .max_pending(3)
        .build();

    let stalker = cfg.stalker_options();
    assert!(stalker.debounce.is_zero());
    assert_eq!(stalker.event_buffer, 4);

    let coordinator = cfg.coordinator_options();
    assert_eq!(coordinator.initial_clock, InitialClock::Zero);
    assert_eq!(coordinator.wait_queue, 2);
    assert_eq!(coordinator.max_pending, 3);
}

#[test]
fn overlong_debounce_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .file("index.html")
        .debounce_ms(60_000)
        .build_raw();

    match ConfigFile::try_from(raw) {
        Err(LivefireError::ConfigError(msg)) => assert!(msg.contains("debounce_ms")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}
