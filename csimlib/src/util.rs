use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;
use crate::config::CacheConfig;

/// Directory holding the fixture traces
pub fn traces_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("traces")
}

/// Directory holding the expected totals, one JSON file per trace and configuration
pub fn expected_outputs_path() -> PathBuf {
    traces_path().join("expected")
}

/// A fixture: a trace, the configuration to replay it with, and the file with the expected totals
#[derive(Debug)]
pub struct TestCase {
    pub name: String,
    pub config: CacheConfig,
    pub trace: PathBuf,
    pub output: PathBuf,
}

/// Finds every fixture, in name order
///
/// Expected outputs are named `<trace>-s<s>-E<E>-b<b>.json`, and the trace is
/// `<trace>.trace` in the traces directory
pub fn get_cases() -> Result<Vec<TestCase>, Box<dyn Error>> {
    let output_pattern = Regex::new(r"^(?P<trace>[0-9a-zA-Z_]+)-s(?P<s>[0-9]+)-E(?P<E>[0-9]+)-b(?P<b>[0-9]+)\.json$")?;
    let mut file_names = Vec::new();
    for entry in fs::read_dir(expected_outputs_path())? {
        let file_name = entry?
            .file_name()
            .into_string()
            .map_err(|e| format!("Can't convert OS string ({e:?}) to standard string"))?;
        if output_pattern.is_match(&file_name) {
            file_names.push(file_name);
        }
    }
    file_names.sort();
    let mut out = Vec::with_capacity(file_names.len());
    for file_name in file_names {
        let tokens = output_pattern.captures(&file_name).ok_or("Couldn't parse the file name")?;
        let config = CacheConfig::new(tokens["s"].parse()?, tokens["E"].parse()?, tokens["b"].parse()?)?;
        out.push(TestCase {
            name: file_name.trim_end_matches(".json").to_string(),
            config,
            trace: traces_path().join(format!("{}.trace", &tokens["trace"])),
            output: expected_outputs_path().join(&file_name),
        })
    }
    Ok(out)
}
