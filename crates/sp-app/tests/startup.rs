//! Startup sequence: configuration, icon, shared state, cache directory.

use sp_app::{AppError, TabKind, bootstrap, ensure_nonlinear_cache_dir};
use sp_config::{CodeSection, Config, GuiSettings, LATEST_VERSION, PathsSection, save_yaml};
use std::path::{Path, PathBuf};
use std::rc::Rc;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sp_app_startup_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A valid config below `dir`, optionally with the window icon in place.
fn write_config(dir: &Path, with_icon: bool) -> PathBuf {
    let install = dir.join("stellapy");
    let runs = dir.join("runs");
    std::fs::create_dir_all(&runs).unwrap();
    std::fs::create_dir_all(install.join("GUI").join("images")).unwrap();

    let config = Config {
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
        gui_settings: GuiSettings::default(),
    };
    if with_icon {
        std::fs::write(config.icon_path(), b"\x89PNG fake").unwrap();
    }
    let path = dir.join("config.yaml");
    save_yaml(&path, &config).unwrap();
    path
}

#[test]
fn bootstrap_starts_with_empty_shared_research() {
    let dir = scratch("empty");
    let config_path = write_config(&dir, true);

    let shell = bootstrap(&config_path).unwrap();

    assert!(!shell.config_repaired);
    assert_eq!(shell.icon_png, b"\x89PNG fake");
    let research = shell.research.borrow();
    assert!(research.data().is_empty());
    assert!(research.experiments().is_empty());
    assert!(research.input_files().is_empty());
    assert!(research.research_arguments().is_empty());
}

#[test]
fn every_tab_sees_the_same_research() {
    let dir = scratch("shared");
    let shell = bootstrap(&write_config(&dir, true)).unwrap();

    let contexts: Vec<_> = TabKind::ALL.iter().map(|k| shell.tab_context(*k)).collect();
    assert_eq!(contexts.len(), 3);
    for ctx in &contexts {
        assert!(Rc::ptr_eq(&ctx.research, &shell.research));
        assert!(Rc::ptr_eq(&ctx.progress, &shell.progress));
        assert!(Rc::ptr_eq(&ctx.config, &shell.config));
    }

    contexts[0]
        .research
        .borrow_mut()
        .add_input_files(vec![PathBuf::from("/runs/nl/run.in")]);

    assert_eq!(
        contexts[2].research.borrow().input_files(),
        &[PathBuf::from("/runs/nl/run.in")]
    );
    assert!(contexts[1].research.borrow().revision() > 0);
}

#[test]
fn missing_icon_aborts_startup() {
    let dir = scratch("no_icon");
    let config_path = write_config(&dir, false);

    let err = bootstrap(&config_path).err().expect("startup should fail");
    assert!(matches!(err, AppError::IconRead { .. }));
}

#[test]
fn nonlinear_cache_dir_is_created() {
    let dir = scratch("cache_dir");
    let shell = bootstrap(&write_config(&dir, true)).unwrap();
    let expected = dir.join("pickles").join("Nonlinear");
    assert!(!expected.exists());

    let created = ensure_nonlinear_cache_dir(&shell.config.borrow()).unwrap();

    assert_eq!(created, expected);
    assert!(expected.is_dir());
    assert_eq!(
        shell.tab_context(TabKind::Simulations).nonlinear_cache_dir(),
        expected
    );
    // Idempotent.
    ensure_nonlinear_cache_dir(&shell.config.borrow()).unwrap();
}
