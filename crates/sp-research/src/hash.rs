//! Content-based hashing for simulation cache keys.

use crate::readers::{DIAGNOSTIC_EXTENSIONS, diagnostic_path};
use crate::types::Simulation;
use crate::{ResearchError, ResearchResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Bump when the layout of cached `SimulationData` changes.
const CACHE_FORMAT_VERSION: &str = "sp-cache-1";

/// Hash over the input files and every diagnostic file present next to them.
pub fn compute_simulation_key(simulation: &Simulation) -> ResearchResult<String> {
    let mut hasher = Sha256::new();
    hasher.update(CACHE_FORMAT_VERSION.as_bytes());

    for input_file in &simulation.input_files {
        hasher.update(input_file.to_string_lossy().as_bytes());
        hash_file(&mut hasher, input_file)?;
        for extension in DIAGNOSTIC_EXTENSIONS {
            let path = diagnostic_path(input_file, extension);
            if path.exists() {
                hasher.update(extension.as_bytes());
                hash_file(&mut hasher, &path)?;
            }
        }
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

fn hash_file(hasher: &mut Sha256, path: &Path) -> ResearchResult<()> {
    let bytes = std::fs::read(path).map_err(|source| ResearchError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(&bytes);
    Ok(())
}
