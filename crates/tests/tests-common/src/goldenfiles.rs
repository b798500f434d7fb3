//! Reading golden test inputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

/// The directory of one golden test, relative to the crate under test.
pub fn goldenfile_dir(testname: &str) -> PathBuf {
    PathBuf::from("tests/goldenfiles").join(testname)
}

/// Read and deserialize a JSON file of a golden test.
pub fn read_json<T: DeserializeOwned>(directory: &Path, file: &str) -> anyhow::Result<T> {
    let path = directory.join(file);
    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("could not read {}: {err}", path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}
