use std::fmt::Display;

use fxhash::FxHashSet;

use super::load_table::LoadTable;
use super::mapping::MappingTable;
use super::module_id::ModuleID;

/// Number of modules listed per category when not running verbose
const SHORT_LIST_LENGTH: usize = 10;

const ONLY_IN_LOAD_TABLE_TITLE: &str = "Modules with trigger cells missing from the mapping";
const ONLY_IN_MAPPING_TITLE: &str = "Mapped modules missing from the load table";

/// The modules which appear in only one of the two tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsistencyReport {
    /// Modules with a positive TC count in the load table but no entry in the mapping
    pub only_in_load_table: Vec<ModuleID>,
    /// Modules in the mapping with no entry in the load table
    pub only_in_mapping: Vec<ModuleID>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.only_in_load_table.is_empty() && self.only_in_mapping.is_empty()
    }

    /// Write the report to the log. Unless verbose, only the first few modules of each list are shown
    pub fn log(&self, verbose: bool) {
        if self.is_consistent() {
            log::info!("Mapping and load table contain the same modules.");
            return;
        }
        log_modules(ONLY_IN_LOAD_TABLE_TITLE, &self.only_in_load_table, verbose);
        log_modules(ONLY_IN_MAPPING_TITLE, &self.only_in_mapping, verbose);
    }
}

fn log_modules(title: &str, modules: &[ModuleID], verbose: bool) {
    if modules.is_empty() {
        return;
    }
    log::warn!("{title}: {}", modules.len());
    log::warn!("layer u v");
    let shown = if verbose {
        modules.len()
    } else {
        modules.len().min(SHORT_LIST_LENGTH)
    };
    for module in &modules[..shown] {
        log::warn!("{module}");
    }
    if shown < modules.len() {
        log::warn!(
            "... and {} more (enable verbose to list all)",
            modules.len() - shown
        );
    }
}

/// Full listing of both categories, one module per line
impl Display for ConsistencyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (title, modules) in [
            (ONLY_IN_LOAD_TABLE_TITLE, &self.only_in_load_table),
            (ONLY_IN_MAPPING_TITLE, &self.only_in_mapping),
        ] {
            writeln!(f, "{title}: {}", modules.len())?;
            writeln!(f, "layer u v")?;
            for module in modules {
                writeln!(f, "{module}")?;
            }
        }
        Ok(())
    }
}

/// Find the modules present in one table but not the other.
///
/// Both key sets are de-duplicated, and modules only in the load table are only reported if
/// they actually produce trigger cells. Lists keep the order of the table they come from.
pub fn check_for_missing_modules(mapping: &MappingTable, loads: &LoadTable) -> ConsistencyReport {
    let mapped: FxHashSet<ModuleID> = mapping.rows().iter().map(|row| row.module).collect();
    let mut report = ConsistencyReport::default();

    let mut seen: FxHashSet<ModuleID> = FxHashSet::default();
    for row in loads.rows() {
        if row.cell_count > 0.0 && !mapped.contains(&row.module) && seen.insert(row.module) {
            report.only_in_load_table.push(row.module);
        }
    }

    seen.clear();
    for row in mapping.rows() {
        if !loads.contains(&row.module) && seen.insert(row.module) {
            report.only_in_mapping.push(row.module);
        }
    }

    report
}
