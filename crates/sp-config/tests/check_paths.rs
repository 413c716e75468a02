use sp_config::*;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sp_config_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_in(dir: &std::path::Path) -> Config {
    let install = dir.join("stellapy");
    let runs = dir.join("runs");
    std::fs::create_dir_all(&install).unwrap();
    std::fs::create_dir_all(&runs).unwrap();
    Config {
        version: LATEST_VERSION,
        code: CodeSection {
            stellapy: install,
            stella: dir.join("stella"),
        },
        paths: PathsSection {
            runs,
            gui_figures: dir.join("figures"),
            gui_pickles: dir.join("pickles"),
        },
        gui_settings: GuiSettings {
            theme: Theme::Light,
        },
    }
}

#[test]
fn missing_file_is_replaced_by_defaults() {
    let dir = scratch("missing");
    let path = dir.join("nested").join("config.yaml");

    let check = check_paths_to_code_and_simulations(&path);

    assert!(check.repaired);
    assert_eq!(check.reasons, vec![RepairReason::Missing]);
    assert_eq!(check.config, default_config());
    assert!(path.exists(), "defaults should be written back");
    assert_eq!(load_yaml(&path).unwrap(), default_config());
}

#[test]
fn written_defaults_pass_the_next_check() {
    let dir = scratch("defaults_twice");
    let path = dir.join("config.yaml");
    let mut defaults = config_in(&dir);
    defaults.paths.runs = dir.join("home").join("runs");

    let first = check_paths_against(&path, &defaults);
    assert!(first.repaired);
    assert!(defaults.paths.runs.is_dir());

    let second = check_paths_against(&path, &defaults);
    assert!(!second.repaired);
    assert!(second.reasons.is_empty());
    assert_eq!(second.config, defaults);
}

#[test]
fn stored_defaults_get_their_runs_dir_back() {
    let dir = scratch("defaults_no_runs");
    let path = dir.join("config.yaml");
    let mut defaults = config_in(&dir);
    defaults.paths.runs = dir.join("removed_runs");
    save_yaml(&path, &defaults).unwrap();

    let check = check_paths_against(&path, &defaults);

    assert!(!check.repaired);
    assert!(defaults.paths.runs.is_dir());
}

#[test]
fn valid_config_is_kept() {
    let dir = scratch("valid");
    let path = dir.join("config.yaml");
    let config = config_in(&dir);
    save_yaml(&path, &config).unwrap();

    let check = check_paths_to_code_and_simulations(&path);

    assert!(!check.repaired);
    assert!(check.reasons.is_empty());
    assert_eq!(check.config, config);
}

#[test]
fn missing_runs_dir_falls_back_to_defaults() {
    let dir = scratch("no_runs");
    let path = dir.join("config.yaml");
    let mut config = config_in(&dir);
    config.paths.runs = dir.join("does_not_exist");
    save_yaml(&path, &config).unwrap();

    let check = check_paths_to_code_and_simulations(&path);

    assert!(check.repaired);
    assert!(matches!(
        check.reasons.as_slice(),
        [RepairReason::MissingRunsDir(_)]
    ));
    assert_eq!(check.config.gui_settings.theme, Theme::Dark);
}

#[test]
fn garbage_file_falls_back_to_defaults() {
    let dir = scratch("garbage");
    let path = dir.join("config.yaml");
    std::fs::write(&path, "this: [is not: a config").unwrap();

    let check = check_paths_to_code_and_simulations(&path);

    assert!(check.repaired);
    assert!(matches!(
        check.reasons.as_slice(),
        [RepairReason::Unreadable(_)]
    ));
}

#[test]
fn newer_version_is_rejected_on_load() {
    let dir = scratch("newer");
    let path = dir.join("config.yaml");
    let mut config = config_in(&dir);
    config.version = LATEST_VERSION + 1;
    std::fs::write(&path, serde_yaml_string(&config)).unwrap();

    assert!(load_yaml(&path).is_err());
    assert!(check_paths_to_code_and_simulations(&path).repaired);
}

fn serde_yaml_string(config: &Config) -> String {
    format!(
        "version: {}\ncode:\n  stellapy: {}\n  stella: {}\npaths:\n  runs: {}\n  gui_figures: {}\n  gui_pickles: {}\n",
        config.version,
        config.code.stellapy.display(),
        config.code.stella.display(),
        config.paths.runs.display(),
        config.paths.gui_figures.display(),
        config.paths.gui_pickles.display(),
    )
}
