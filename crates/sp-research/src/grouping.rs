//! Turning a flat list of input files into experiments and simulations.

use crate::types::{Experiment, ResearchArguments, Simulation, SimulationId};
use std::path::{Path, PathBuf};

const RESTART_MARKER: &str = "_restart";
const UNGROUPED_EXPERIMENT: &str = "research";

/// Split `run_restart3` into `("run", 3)`; files that are not restarts get 0.
pub fn split_restart(stem: &str) -> (&str, u32) {
    if let Some(idx) = stem.rfind(RESTART_MARKER) {
        let digits = &stem[idx + RESTART_MARKER.len()..];
        if idx > 0
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
            && let Ok(n) = digits.parse::<u32>()
        {
            return (&stem[..idx], n);
        }
    }
    (stem, 0)
}

/// Runs of one simulation: the base stem, the folder the runs live in and
/// `(restart, file)` pairs. Only files in the same folder can be restarts
/// of each other.
struct RunGroup {
    base: String,
    folder: PathBuf,
    name: String,
    runs: Vec<(u32, PathBuf)>,
}

pub fn group_input_files(files: &[PathBuf], args: &ResearchArguments) -> Vec<Experiment> {
    let group_by_folder = args.group_by_folder();
    let merge_restarts = args.merge_restarts();

    // (experiment key, name, simulations)
    let mut groups: Vec<(String, String, Vec<RunGroup>)> = Vec::new();

    for file in files {
        let (key, folder_name) = if group_by_folder {
            experiment_key(file)
        } else {
            (String::new(), UNGROUPED_EXPERIMENT.to_string())
        };

        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let (base, restart) = if merge_restarts {
            let (base, n) = split_restart(&stem);
            (base.to_string(), n)
        } else {
            (stem.clone(), 0)
        };
        let folder = file.parent().map(Path::to_path_buf).unwrap_or_default();

        let group_idx = match groups.iter().position(|(k, _, _)| *k == key) {
            Some(idx) => idx,
            None => {
                let name = unique_name(&folder_name, groups.iter().map(|(_, n, _)| n.as_str()));
                groups.push((key, name, Vec::new()));
                groups.len() - 1
            }
        };

        let simulations = &mut groups[group_idx].2;
        let existing = simulations
            .iter()
            .position(|g| g.base == base && g.folder == folder);
        match existing {
            Some(idx) => simulations[idx].runs.push((restart, file.clone())),
            None => {
                let name = unique_name(&base, simulations.iter().map(|g| g.name.as_str()));
                simulations.push(RunGroup {
                    base,
                    folder,
                    name,
                    runs: vec![(restart, file.clone())],
                });
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, name, simulations)| Experiment {
            id: if key.is_empty() { name.clone() } else { key },
            simulations: simulations
                .into_iter()
                .map(|mut group| {
                    group.runs.sort_by_key(|(restart, _)| *restart);
                    Simulation {
                        id: SimulationId::new(&name, &group.name),
                        name: group.name,
                        input_files: group.runs.into_iter().map(|(_, f)| f).collect(),
                    }
                })
                .collect(),
            name,
        })
        .collect()
}

fn experiment_key(file: &Path) -> (String, String) {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            let name = parent
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| UNGROUPED_EXPERIMENT.to_string());
            (parent.to_string_lossy().to_string(), name)
        }
        _ => (String::new(), UNGROUPED_EXPERIMENT.to_string()),
    }
}

fn unique_name<'a, I>(base: &str, taken: I) -> String
where
    I: Iterator<Item = &'a str> + Clone,
{
    if !taken.clone().any(|t| t == base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{} ({})", base, n);
        if !taken.clone().any(|t| t == candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn restart_suffix() {
        assert_eq!(split_restart("run_restart12"), ("run", 12));
        assert_eq!(split_restart("run"), ("run", 0));
        assert_eq!(split_restart("run_restart"), ("run_restart", 0));
        assert_eq!(split_restart("_restart1"), ("_restart1", 0));
        assert_eq!(split_restart("run_restartx1"), ("run_restartx1", 0));
    }

    #[test]
    fn folders_become_experiments() {
        let files = paths(&[
            "/scan/tprim/tprim1.in",
            "/scan/fprim/fprim1.in",
            "/scan/tprim/tprim2.in",
        ]);
        let experiments = group_input_files(&files, &ResearchArguments::default());

        assert_eq!(experiments.len(), 2);
        assert_eq!(experiments[0].name, "tprim");
        assert_eq!(experiments[0].id, "/scan/tprim");
        assert_eq!(experiments[0].simulations.len(), 2);
        assert_eq!(experiments[1].name, "fprim");
        assert_eq!(
            experiments[0].simulations[1].id,
            SimulationId::new("tprim", "tprim2")
        );
    }

    #[test]
    fn restarts_merge_in_restart_order() {
        let files = paths(&[
            "/runs/nl/run_restart2.in",
            "/runs/nl/run.in",
            "/runs/nl/run_restart1.in",
        ]);
        let experiments = group_input_files(&files, &ResearchArguments::default());

        assert_eq!(experiments.len(), 1);
        let sims = &experiments[0].simulations;
        assert_eq!(sims.len(), 1);
        assert_eq!(sims[0].name, "run");
        assert_eq!(
            sims[0].input_files,
            paths(&[
                "/runs/nl/run.in",
                "/runs/nl/run_restart1.in",
                "/runs/nl/run_restart2.in",
            ])
        );
    }

    #[test]
    fn arguments_disable_grouping() {
        let files = paths(&["/a/run.in", "/b/run_restart1.in"]);
        let mut args = ResearchArguments::default();
        args.set(ResearchArguments::GROUP_BY_FOLDER, false);
        args.set(ResearchArguments::MERGE_RESTARTS, false);

        let experiments = group_input_files(&files, &args);

        assert_eq!(experiments.len(), 1);
        assert_eq!(experiments[0].name, "research");
        assert_eq!(experiments[0].simulations.len(), 2);
    }

    #[test]
    fn same_stem_in_different_folders_stays_apart() {
        let files = paths(&["/scanA/run.in", "/scanB/run.in", "/scanB/run_restart1.in"]);
        let mut args = ResearchArguments::default();
        args.set(ResearchArguments::GROUP_BY_FOLDER, false);

        let experiments = group_input_files(&files, &args);

        assert_eq!(experiments.len(), 1);
        let sims = &experiments[0].simulations;
        assert_eq!(sims.len(), 2);
        assert_eq!(sims[0].id, SimulationId::new("research", "run"));
        assert_eq!(sims[0].input_files, paths(&["/scanA/run.in"]));
        assert_eq!(sims[1].id, SimulationId::new("research", "run (2)"));
        assert_eq!(
            sims[1].input_files,
            paths(&["/scanB/run.in", "/scanB/run_restart1.in"])
        );

        args.set(ResearchArguments::MERGE_RESTARTS, false);
        let experiments = group_input_files(&files[..2], &args);
        assert_eq!(experiments[0].simulations.len(), 2);
    }

    #[test]
    fn same_folder_name_in_different_parents() {
        let files = paths(&["/x/nl/a.in", "/y/nl/a.in"]);
        let experiments = group_input_files(&files, &ResearchArguments::default());
        assert_eq!(experiments[0].name, "nl");
        assert_eq!(experiments[1].name, "nl (2)");
        assert_ne!(
            experiments[0].simulations[0].id,
            experiments[1].simulations[0].id
        );
    }
}
