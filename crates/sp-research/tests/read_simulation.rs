use sp_research::*;
use std::path::{Path, PathBuf};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sp_research_read_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn simulation_for(dir: &Path) -> Simulation {
    let files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == "in"))
        .collect();
    let mut experiments = group_input_files(&files, &ResearchArguments::default());
    assert_eq!(experiments.len(), 1);
    let mut simulations = experiments.remove(0).simulations;
    assert_eq!(simulations.len(), 1);
    simulations.remove(0)
}

#[test]
fn restarted_run_concatenates_fluxes() {
    let dir = scratch("restart");
    write(&dir, "run.in", "");
    write(&dir, "run_restart1.in", "");
    write(&dir, "run.fluxes", "#t p v q\n0 1 2 3\n1 1 2 3\n2 1 2 3\n");
    write(&dir, "run_restart1.fluxes", "2 9 9 9\n3 4 5 6\n");
    write(&dir, "run_restart1.phi_vs_z", "-1 0 1\n0 2 0\n1 0 1\n");

    let data = read_simulation(&simulation_for(&dir)).unwrap();

    let fluxes = data.fluxes.unwrap();
    assert_eq!(fluxes.time, vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(fluxes.species[0].qflux, vec![3.0, 3.0, 3.0, 6.0]);
    assert!(data.spectrum.is_none());
    assert_eq!(data.mode_structure.unwrap().phi2, vec![1.0, 4.0, 1.0]);
}

#[test]
fn species_count_must_match_between_restarts() {
    let dir = scratch("species");
    write(&dir, "run.in", "");
    write(&dir, "run_restart1.in", "");
    write(&dir, "run.fluxes", "0 1 2 3\n");
    write(&dir, "run_restart1.fluxes", "1 1 1 2 2 3 3\n");

    let err = read_simulation(&simulation_for(&dir)).unwrap_err();
    assert!(matches!(
        err,
        ResearchError::SpeciesMismatch {
            expected: 1,
            found: 2,
            ..
        }
    ));
}

#[test]
fn simulation_without_diagnostics_loads_empty() {
    let dir = scratch("empty");
    write(&dir, "run.in", "");
    let data = read_simulation(&simulation_for(&dir)).unwrap();
    assert!(data.is_empty());
}
