use std::collections::BTreeMap;

use fxhash::FxHashSet;

use super::error::AggregatorError;
use super::load_table::LoadTable;
use super::mapping::MappingTable;
use super::module_id::{LinkSlot, ModuleID};

/// The accumulated load on a single lpGBT
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkLoad {
    pub link_id: i32,
    pub cell_load: f64,
    pub word_load: f64,
    pub layer: i32,
    pub n_modules: usize,
}

/// Per-lpGBT loads, ordered by ascending link ID
#[derive(Debug, Clone, Default)]
pub struct LinkLoads {
    pub links: Vec<LinkLoad>,
}

impl LinkLoads {
    pub fn cell_loads(&self) -> Vec<f64> {
        self.links.iter().map(|l| l.cell_load).collect()
    }

    pub fn word_loads(&self) -> Vec<f64> {
        self.links.iter().map(|l| l.word_load).collect()
    }

    pub fn layers_f64(&self) -> Vec<f64> {
        self.links.iter().map(|l| l.layer as f64).collect()
    }
}

/// Per-module normalized word loads, parallel to the modules they came from (in mapping order)
#[derive(Debug, Clone, Default)]
pub struct ModuleLoads {
    pub modules: Vec<ModuleID>,
    pub loads: Vec<f64>,
    pub layers: Vec<i32>,
}

impl ModuleLoads {
    pub fn layers_f64(&self) -> Vec<f64> {
        self.layers.iter().map(|l| *l as f64).collect()
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }
}

/// Collects modules missing from the load table, each reported once, in the order they were found
#[derive(Debug, Default)]
struct MissingModules {
    seen: FxHashSet<ModuleID>,
    modules: Vec<ModuleID>,
}

impl MissingModules {
    fn push(&mut self, module: ModuleID) {
        if self.seen.insert(module) {
            log::error!(
                "Module ({}) is in the mapping but not in the load table; skipping it",
                module
            );
            self.modules.push(module);
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, AggregatorError> {
        if self.modules.is_empty() {
            Ok(value)
        } else {
            Err(AggregatorError::MissingJoinKeys(self.modules))
        }
    }
}

/// Aggregator joins the mapping against the load table.
///
/// Per-link mode sums the TC and word counts of every module read out by an lpGBT, weighted
/// by the fraction of the module's e-links on that lpGBT. Per-module mode normalizes the word
/// count of each module by its number of e-links.
#[derive(Debug)]
pub struct Aggregator<'a> {
    mapping: &'a MappingTable,
    loads: &'a LoadTable,
    ignored_density: i32,
}

impl<'a> Aggregator<'a> {
    /// Create a new Aggregator.
    ///
    /// Modules with a density flag equal to `ignored_density` are left out of the per-link loads.
    pub fn new(mapping: &'a MappingTable, loads: &'a LoadTable, ignored_density: i32) -> Self {
        Aggregator {
            mapping,
            loads,
            ignored_density,
        }
    }

    /// Compute the load on every lpGBT with ID in `1..=max_link_id`.
    ///
    /// All first-slot assignments are accumulated before the second-slot ones, and the layer
    /// reported for a link is that of the last module added to it. Modules without a positive
    /// e-link total never contribute, and links which no module uses are left out. Fails after
    /// the full pass if any contributing module had no load entry.
    pub fn link_loads(&self, max_link_id: i32) -> Result<LinkLoads, AggregatorError> {
        let mut accumulators: BTreeMap<i32, LinkLoad> = BTreeMap::new();
        let mut missing = MissingModules::default();

        for slot in LinkSlot::ALL {
            for row in self.mapping.rows() {
                if row.density == self.ignored_density || !row.has_valid_elinks() {
                    continue;
                }
                let link_id = match row.link_id(slot) {
                    Some(id) if (1..=max_link_id).contains(&id) => id,
                    _ => continue,
                };
                let load = match self.loads.get(&row.module) {
                    Some(load) => load,
                    None => {
                        missing.push(row.module);
                        continue;
                    }
                };

                let frac = row.link_frac(slot);
                let acc = accumulators.entry(link_id).or_insert_with(|| LinkLoad {
                    link_id,
                    ..Default::default()
                });
                acc.cell_load += frac * load.cell_count;
                acc.word_load += frac * load.word_count;
                acc.layer = row.module.layer;
                acc.n_modules += 1;
            }
        }

        missing.into_result(LinkLoads {
            links: accumulators.into_values().collect(),
        })
    }

    /// Compute the average number of words per module divided by 2 x the number of e-links.
    ///
    /// Modules without a positive e-link total are skipped. If `skip_ignored_density` is set,
    /// modules with the ignored density flag are skipped as well. Fails after the full pass if
    /// any module had no load entry.
    pub fn module_loads(&self, skip_ignored_density: bool) -> Result<ModuleLoads, AggregatorError> {
        let mut result = ModuleLoads::default();
        let mut missing = MissingModules::default();

        for row in self.mapping.rows() {
            if !row.has_valid_elinks() {
                log::debug!(
                    "Module ({}) has {} e-links; skipping it",
                    row.module,
                    row.total_elinks
                );
                continue;
            }
            if skip_ignored_density && row.density == self.ignored_density {
                continue;
            }
            let load = match self.loads.get(&row.module) {
                Some(load) => load,
                None => {
                    missing.push(row.module);
                    continue;
                }
            };

            if load.cell_count == 0.0 {
                log::warn!("Module ({}) has zero trigger cells", row.module);
            }

            result.modules.push(row.module);
            result
                .loads
                .push(load.word_count / (2.0 * row.total_elinks as f64));
            result.layers.push(row.module.layer);
        }

        missing.into_result(result)
    }
}
