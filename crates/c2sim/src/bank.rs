//! Tree bank loading.
//!
//! A bank is either one YAML file mapping tree names to program text, or a
//! directory holding one program per `*.bt` file (the file stem names the tree).
//! Trees are added in name order so bank indices are stable across runs.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use c2sim_bt::{compile_str, TreeBank};

pub const TREE_EXTENSION: &str = "bt";

pub fn load_bank(path: &Path) -> Result<TreeBank> {
    let programs = if path.is_dir() {
        read_dir(path)?
    } else {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree bank from {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse tree bank from {}", path.display()))?
    };
    let bank = build(programs).with_context(|| format!("In tree bank {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        trees = ?bank.names().collect::<Vec<_>>(),
        "loaded tree bank"
    );
    Ok(bank)
}

/// Bank from a YAML mapping of tree names to program text.
pub fn bank_from_yaml(text: &str) -> Result<TreeBank> {
    let programs: BTreeMap<String, String> =
        serde_yaml::from_str(text).context("Failed to parse tree bank")?;
    build(programs)
}

fn read_dir(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut programs = BTreeMap::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str());
        let (Some(stem), true) = (stem, path.extension().is_some_and(|e| e == TREE_EXTENSION))
        else {
            tracing::warn!(path = %path.display(), "skipping non-tree file in bank");
            continue;
        };
        let program = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read tree from {}", path.display()))?;
        programs.insert(stem.to_string(), program);
    }
    Ok(programs)
}

fn build(programs: BTreeMap<String, String>) -> Result<TreeBank> {
    let mut bank = TreeBank::new();
    for (name, program) in programs {
        let graph = compile_str(&program).with_context(|| format!("Failed to build tree `{name}`"))?;
        bank.push(name, graph);
    }
    Ok(bank)
}
