//! Research container and the nonlinear data it holds.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// The one research container of a window, shared by every tab.
pub type SharedResearch = Rc<RefCell<Research>>;

pub fn shared(research: Research) -> SharedResearch {
    Rc::new(RefCell::new(research))
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimulationId(String);

impl SimulationId {
    pub fn new(experiment: &str, simulation: &str) -> Self {
        Self(format!("{}/{}", experiment, simulation))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One or more (restarted) runs of stella treated as a single case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub id: SimulationId,
    pub name: String,
    /// Base input file first, restarts after it in restart order.
    pub input_files: Vec<PathBuf>,
}

/// Simulations sharing similar input parameters, used for parameter scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub simulations: Vec<Simulation>,
}

/// Run-time parameters steering how input files become experiments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchArguments(BTreeMap<String, serde_json::Value>);

impl ResearchArguments {
    pub const GROUP_BY_FOLDER: &'static str = "group_by_folder";
    pub const MERGE_RESTARTS: &'static str = "merge_restarts";

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn group_by_folder(&self) -> bool {
        self.get_bool(Self::GROUP_BY_FOLDER, true)
    }

    pub fn merge_restarts(&self) -> bool {
        self.get_bool(Self::MERGE_RESTARTS, true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesFluxes {
    pub pflux: Vec<f64>,
    pub vflux: Vec<f64>,
    pub qflux: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxTraces {
    pub time: Vec<f64>,
    pub species: Vec<SpeciesFluxes>,
}

impl FluxTraces {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Append a restarted run, dropping the points that overlap in time.
    /// Species counts must already agree.
    pub fn append_restart(&mut self, other: FluxTraces) {
        let mut last = self.time.last().copied();
        for (i, t) in other.time.iter().copied().enumerate() {
            if let Some(prev) = last
                && t <= prev
            {
                continue;
            }
            self.time.push(t);
            for (mine, theirs) in self.species.iter_mut().zip(&other.species) {
                mine.pflux.push(theirs.pflux[i]);
                mine.vflux.push(theirs.vflux[i]);
                mine.qflux.push(theirs.qflux[i]);
            }
            last = Some(t);
        }
    }
}

/// Time-averaged |phi|^2 on the (kx, ky) grid, indexed `phi2[ikx][iky]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub kx: Vec<f64>,
    pub ky: Vec<f64>,
    pub phi2: Vec<Vec<f64>>,
}

/// Parallel mode structure |phi|^2 along the field line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeStructure {
    pub z: Vec<f64>,
    pub phi2: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationData {
    pub fluxes: Option<FluxTraces>,
    pub spectrum: Option<Spectrum>,
    pub mode_structure: Option<ModeStructure>,
}

impl SimulationData {
    pub fn is_empty(&self) -> bool {
        self.fluxes.is_none() && self.spectrum.is_none() && self.mode_structure.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Research {
    data: BTreeMap<SimulationId, SimulationData>,
    experiments: Vec<Experiment>,
    input_files: Vec<PathBuf>,
    research_arguments: ResearchArguments,
    #[serde(skip)]
    revision: u64,
}

impl Research {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &BTreeMap<SimulationId, SimulationData> {
        &self.data
    }

    pub fn experiments(&self) -> &[Experiment] {
        &self.experiments
    }

    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    pub fn research_arguments(&self) -> &ResearchArguments {
        &self.research_arguments
    }

    pub fn research_arguments_mut(&mut self) -> &mut ResearchArguments {
        self.touch();
        &mut self.research_arguments
    }

    /// Bumped on every mutation so tabs can tell when a sibling changed the state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.experiments.is_empty() && self.input_files.is_empty()
    }

    pub fn add_input_files<I>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut added = 0;
        for file in files {
            if !self.input_files.contains(&file) {
                self.input_files.push(file);
                added += 1;
            }
        }
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Loaded data survives only for simulations whose input files did not
    /// change; a regrouped simulation has to be loaded again.
    pub fn set_experiments(&mut self, experiments: Vec<Experiment>) {
        let previous: BTreeMap<SimulationId, Vec<PathBuf>> = self
            .simulations()
            .map(|s| (s.id.clone(), s.input_files.clone()))
            .collect();
        self.experiments = experiments;
        let live: BTreeMap<&SimulationId, &Vec<PathBuf>> = self
            .experiments
            .iter()
            .flat_map(|e| e.simulations.iter())
            .map(|s| (&s.id, &s.input_files))
            .collect();
        self.data.retain(|id, _| match (previous.get(id), live.get(id)) {
            (Some(old), Some(new)) => old == *new,
            _ => false,
        });
        self.touch();
    }

    pub fn insert_data(&mut self, id: SimulationId, data: SimulationData) {
        self.data.insert(id, data);
        self.touch();
    }

    pub fn data_for(&self, id: &SimulationId) -> Option<&SimulationData> {
        self.data.get(id)
    }

    pub fn simulations(&self) -> impl Iterator<Item = &Simulation> {
        self.experiments.iter().flat_map(|e| e.simulations.iter())
    }

    pub fn find_simulation(&self, id: &SimulationId) -> Option<&Simulation> {
        self.simulations().find(|s| &s.id == id)
    }

    /// Drop a simulation with its input files and data; empty experiments go too.
    pub fn remove_simulation(&mut self, id: &SimulationId) -> bool {
        let Some(simulation) = self.find_simulation(id).cloned() else {
            return false;
        };
        for experiment in &mut self.experiments {
            experiment.simulations.retain(|s| &s.id != id);
        }
        self.experiments.retain(|e| !e.simulations.is_empty());
        self.input_files
            .retain(|f| !simulation.input_files.iter().any(|g| g == f));
        self.data.remove(id);
        self.touch();
        true
    }

    /// Back to the freshly constructed state; arguments are kept.
    pub fn clear(&mut self) {
        self.data.clear();
        self.experiments.clear();
        self.input_files.clear();
        self.touch();
    }

    /// Take over the contents of another container (e.g. a saved research)
    /// without resetting the revision counter.
    pub fn replace_with(&mut self, other: Research) {
        let revision = self.revision;
        *self = other;
        self.revision = revision;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(exp: &str, name: &str, files: &[&str]) -> Simulation {
        Simulation {
            id: SimulationId::new(exp, name),
            name: name.to_string(),
            input_files: files.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn new_research_is_empty() {
        let research = Research::new();
        assert!(research.data().is_empty());
        assert!(research.experiments().is_empty());
        assert!(research.input_files().is_empty());
        assert!(research.research_arguments().is_empty());
        assert!(research.is_empty());
    }

    #[test]
    fn duplicate_input_files_are_skipped() {
        let mut research = Research::new();
        let added = research.add_input_files(vec![
            PathBuf::from("/a/run1.in"),
            PathBuf::from("/a/run2.in"),
            PathBuf::from("/a/run1.in"),
        ]);
        assert_eq!(added, 2);
        let rev = research.revision();
        assert_eq!(research.add_input_files(vec![PathBuf::from("/a/run2.in")]), 0);
        assert_eq!(research.revision(), rev);
    }

    #[test]
    fn remove_simulation_drops_files_data_and_empty_experiment() {
        let mut research = Research::new();
        research.add_input_files(vec![
            PathBuf::from("/a/run1.in"),
            PathBuf::from("/b/run2.in"),
        ]);
        research.set_experiments(vec![
            Experiment {
                id: "/a".to_string(),
                name: "a".to_string(),
                simulations: vec![simulation("a", "run1", &["/a/run1.in"])],
            },
            Experiment {
                id: "/b".to_string(),
                name: "b".to_string(),
                simulations: vec![simulation("b", "run2", &["/b/run2.in"])],
            },
        ]);
        let id = SimulationId::new("a", "run1");
        research.insert_data(id.clone(), SimulationData::default());

        assert!(research.remove_simulation(&id));
        assert!(!research.remove_simulation(&id));
        assert_eq!(research.experiments().len(), 1);
        assert_eq!(research.input_files(), &[PathBuf::from("/b/run2.in")]);
        assert!(research.data_for(&id).is_none());
    }

    #[test]
    fn regrouped_simulation_loses_stale_data() {
        let mut research = Research::new();
        research.set_experiments(vec![Experiment {
            id: "/nl".to_string(),
            name: "nl".to_string(),
            simulations: vec![
                simulation("nl", "run", &["/nl/run.in", "/nl/run_restart1.in"]),
                simulation("nl", "other", &["/nl/other.in"]),
            ],
        }]);
        let run = SimulationId::new("nl", "run");
        let other = SimulationId::new("nl", "other");
        research.insert_data(run.clone(), SimulationData::default());
        research.insert_data(other.clone(), SimulationData::default());

        research.set_experiments(vec![Experiment {
            id: "/nl".to_string(),
            name: "nl".to_string(),
            simulations: vec![
                simulation("nl", "run", &["/nl/run.in"]),
                simulation("nl", "run_restart1", &["/nl/run_restart1.in"]),
                simulation("nl", "other", &["/nl/other.in"]),
            ],
        }]);

        assert!(research.data_for(&run).is_none(), "same id, fewer files");
        assert!(research.data_for(&other).is_some());
    }

    #[test]
    fn flux_restart_overlap_is_dropped() {
        let species = |v: &[f64]| SpeciesFluxes {
            pflux: v.to_vec(),
            vflux: v.to_vec(),
            qflux: v.to_vec(),
        };
        let mut first = FluxTraces {
            time: vec![0.0, 1.0, 2.0],
            species: vec![species(&[1.0, 2.0, 3.0])],
        };
        let restart = FluxTraces {
            time: vec![1.5, 2.0, 3.0, 4.0],
            species: vec![species(&[9.0, 9.0, 4.0, 5.0])],
        };
        first.append_restart(restart);
        assert_eq!(first.time, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(first.species[0].qflux, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn arguments_default_to_grouping() {
        let mut args = ResearchArguments::default();
        assert!(args.group_by_folder());
        assert!(args.merge_restarts());
        args.set(ResearchArguments::MERGE_RESTARTS, false);
        assert!(!args.merge_restarts());
        assert_eq!(args.len(), 1);
    }
}
