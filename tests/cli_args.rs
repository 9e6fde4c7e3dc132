use clap::Parser;
use paratask::cli::CliArgs;
use paratask::config::default_config_path;

#[test]
fn config_defaults_to_the_standard_file_name() {
    let args = CliArgs::try_parse_from(["paratask"]).unwrap();
    assert_eq!(args.config, default_config_path());
    assert!(!args.dry_run);
    assert!(args.sort.is_none());
}

#[test]
fn config_path_is_taken_verbatim() {
    let args = CliArgs::try_parse_from(["paratask", "--config", "graphs/build.toml", "--dry-run"])
        .unwrap();
    assert_eq!(args.config, std::path::PathBuf::from("graphs/build.toml"));
    assert!(args.dry_run);
}

#[test]
fn sort_cannot_be_combined_with_dry_run() {
    let err = CliArgs::try_parse_from(["paratask", "--sort", "100", "--dry-run"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn sort_accepts_a_worker_override() {
    let args = CliArgs::try_parse_from(["paratask", "--sort", "100", "--workers", "3"]).unwrap();
    assert_eq!(args.sort, Some(100));
    assert_eq!(args.workers, Some(3));
}
