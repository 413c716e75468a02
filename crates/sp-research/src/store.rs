//! On-disk caches below the nonlinear pickles directory.
//!
//! ```text
//! <cache root>/
//!   simulations/<sha256>.json     loaded SimulationData, keyed by content hash
//!   <name>.research.json          a saved research (files, experiments, data)
//! ```

use crate::types::{Research, SimulationData};
use crate::{ResearchError, ResearchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const RESEARCH_SUFFIX: &str = ".research.json";

#[derive(Clone)]
pub struct SimulationCache {
    root_dir: PathBuf,
}

impl SimulationCache {
    pub fn new(cache_root: &Path) -> ResearchResult<Self> {
        let root_dir = cache_root.join("simulations");
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json", key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.entry_path(key).exists()
    }

    pub fn load(&self, key: &str) -> ResearchResult<Option<SimulationData>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, key: &str, data: &SimulationData) -> ResearchResult<()> {
        let content = serde_json::to_string(data)?;
        fs::write(self.entry_path(key), content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedResearch {
    pub saved_at: String,
    pub research: Research,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedResearchEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone)]
pub struct ResearchStore {
    root_dir: PathBuf,
}

impl ResearchStore {
    pub fn new(root_dir: PathBuf) -> ResearchResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn path_for(&self, name: &str) -> ResearchResult<PathBuf> {
        let name = name.trim();
        if name.is_empty()
            || name.contains(['/', '\\'])
            || name == "."
            || name == ".."
        {
            return Err(ResearchError::InvalidName(name.to_string()));
        }
        Ok(self.root_dir.join(format!("{}{}", name, RESEARCH_SUFFIX)))
    }

    pub fn save(&self, name: &str, research: &Research) -> ResearchResult<PathBuf> {
        let path = self.path_for(name)?;
        let saved = SavedResearch {
            saved_at: chrono::Utc::now().to_rfc3339(),
            research: research.clone(),
        };
        fs::write(&path, serde_json::to_string_pretty(&saved)?)?;
        tracing::info!(path = %path.display(), "saved research");
        Ok(path)
    }

    pub fn load(&self, path: &Path) -> ResearchResult<SavedResearch> {
        if !path.exists() {
            return Err(ResearchError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn list(&self) -> ResearchResult<Vec<SavedResearchEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if let Some(name) = file_name.strip_suffix(RESEARCH_SUFFIX)
                && path.is_file()
            {
                entries.push(SavedResearchEntry {
                    name: name.to_string(),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub fn delete(&self, name: &str) -> ResearchResult<()> {
        let path = self.path_for(name)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
