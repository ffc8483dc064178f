//! JSON exports of a constructed model's layout and of sweep outcomes.
//!
//! The layout file is what equation-construction code outside this crate
//! reads: every namespace's symbols with 1-based inclusive ranges (the
//! convention those consumers index with), the grid scalars and the steady
//! state.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::{ModelConfig, Namespace};
use crate::error::AppError;
use crate::grid::GridSettings;
use crate::model::{DrawOutcome, HankModel, SweepSummary};
use crate::registry::Layout;
use crate::steady::SsKey;

#[derive(Debug, Clone, Serialize)]
pub struct LayoutFile {
    pub tool: String,
    pub config: ModelConfig,
    pub grid: GridSettings,
    pub n_predetermined_variables: usize,
    pub n_model_states: usize,
    pub steady_state: Vec<SteadyStateEntry>,
    pub namespaces: Vec<NamespaceFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SteadyStateEntry {
    pub key: SsKey,
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamespaceFile {
    pub namespace: Namespace,
    pub dim: usize,
    pub entries: Vec<RangeEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeEntry {
    pub symbol: String,
    pub first: usize,
    pub last: usize,
}

impl LayoutFile {
    pub fn from_model(model: &HankModel) -> Self {
        let namespaces = Namespace::ALL
            .iter()
            .map(|&ns| {
                let mut entries = range_entries(model.registry.layout(ns));
                let mut dim = model.registry.layout(ns).dim();
                if ns == Namespace::EndogenousStates {
                    entries.extend(range_entries(model.registry.augmented()));
                    dim = model.registry.state_dim();
                }
                NamespaceFile {
                    namespace: ns,
                    dim,
                    entries,
                }
            })
            .collect();

        Self {
            tool: "hank".to_string(),
            config: model.config.clone(),
            grid: model.grid_settings(),
            n_predetermined_variables: model.n_predetermined_variables(),
            n_model_states: model.n_model_states(),
            steady_state: model
                .steady_state
                .iter()
                .map(|(key, value)| SteadyStateEntry {
                    key,
                    name: key.name(),
                    value,
                })
                .collect(),
            namespaces,
        }
    }
}

fn range_entries(layout: &Layout) -> Vec<RangeEntry> {
    layout
        .iter()
        .map(|(symbol, range)| RangeEntry {
            symbol: symbol.to_string(),
            first: range.first_one_based(),
            last: range.last_one_based(),
        })
        .collect()
}

pub fn write_layout_json(path: &Path, model: &HankModel) -> Result<(), AppError> {
    write_json(path, &LayoutFile::from_model(model), "layout")
}

#[derive(Debug, Clone, Serialize)]
struct SweepFile<'a> {
    tool: &'static str,
    seed: u64,
    summary: &'a SweepSummary,
    outcomes: &'a [DrawOutcome],
}

pub fn write_sweep_json(
    path: &Path,
    seed: u64,
    summary: &SweepSummary,
    outcomes: &[DrawOutcome],
) -> Result<(), AppError> {
    let file = SweepFile {
        tool: "hank",
        seed,
        summary,
        outcomes,
    };
    write_json(path, &file, "sweep")
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create {what} JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::io(format!("Failed to write {what} JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Construction, construct, hank_parameters};

    fn small_model() -> HankModel {
        let config = ModelConfig {
            nx: 10,
            ..ModelConfig::default()
        };
        match construct(&config, &hank_parameters().unwrap()).unwrap() {
            Construction::Built(m) => *m,
            Construction::Rejected(r) => panic!("{}", r.reason),
        }
    }

    #[test]
    fn layout_file_uses_one_based_ranges_and_includes_augmented_states() {
        let model = small_model();
        let file = LayoutFile::from_model(&model);
        let endo = &file.namespaces[0];
        assert_eq!(endo.namespace, Namespace::EndogenousStates);

        let mu = &endo.entries[0];
        assert_eq!((mu.symbol.as_str(), mu.first, mu.last), ("mu_t", 1, 18));

        let last = endo.entries.last().unwrap();
        assert_eq!(last.symbol, "z_t1");
        assert_eq!(last.last, endo.dim);
    }

    #[test]
    fn layout_json_is_written() {
        let model = small_model();
        let path = std::env::temp_dir().join(format!("hank-core-layout-{}.json", std::process::id()));
        write_layout_json(&path, &model).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["n_model_states"], model.n_model_states());
        assert_eq!(value["namespaces"].as_array().unwrap().len(), 5);
        std::fs::remove_file(path).ok();
    }
}
