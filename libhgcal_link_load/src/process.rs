use super::aggregator::{Aggregator, LinkLoads, ModuleLoads};
use super::config::{Config, Plot2DConfig, PlotConfig};
use super::consistency::{check_for_missing_modules, ConsistencyReport};
use super::error::{ConfigError, ProcessorError};
use super::load_table::LoadTable;
use super::mapping::MappingTable;
use super::plot::{plot_histogram, plot_histogram_2d};

/// Everything computed in one pass over the input tables
#[derive(Debug, Clone, Default)]
pub struct AnalysisResults {
    pub consistency: Option<ConsistencyReport>,
    pub module_loads: Option<ModuleLoads>,
    pub link_loads: Option<LinkLoads>,
}

/// Log the spread of a set of loads
fn log_summary(name: &str, values: &[f64]) {
    if values.is_empty() {
        log::warn!("No {name} were computed");
        return;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    log::info!(
        "{} {name} -- min: {min:.4} max: {max:.4} mean: {mean:.4}",
        values.len()
    );
}

fn draw_1d(config: &Config, plot: &PlotConfig, values: &[f64]) -> Result<(), ProcessorError> {
    plot_histogram(
        values,
        &config.get_plot_path(&plot.file_name),
        plot.bin_width,
        &plot.x_title,
    )?;
    Ok(())
}

fn draw_2d(
    config: &Config,
    plot: &Plot2DConfig,
    xs: &[f64],
    ys: &[f64],
) -> Result<(), ProcessorError> {
    plot_histogram_2d(
        xs,
        ys,
        &config.get_plot_path(&plot.file_name),
        (plot.bin_width_x, plot.bin_width_y),
        &plot.x_title,
        &plot.y_title,
    )?;
    Ok(())
}

/// Load the tables and compute the loads requested by the config. Nothing is written to disk.
pub fn analyze(config: &Config) -> Result<AnalysisResults, ProcessorError> {
    if config.mode.do_links() && !config.is_max_link_id_valid() {
        return Err(ConfigError::InvalidMaxLinkId(config.max_link_id).into());
    }

    log::info!(
        "Loading FE mapping from {}...",
        config.mapping_path.to_string_lossy()
    );
    let mapping = MappingTable::new(&config.mapping_path)?;
    log::info!("Loaded {} mapping rows.", mapping.len());

    log::info!(
        "Loading trigger cell loads from {}...",
        config.load_table_path.to_string_lossy()
    );
    let loads = LoadTable::new(&config.load_table_path)?;
    log::info!("Loaded {} module loads.", loads.len());

    let mut results = AnalysisResults::default();

    if config.check_missing_modules {
        log::info!("Checking for modules missing from either table...");
        let report = check_for_missing_modules(&mapping, &loads);
        report.log(config.verbose);
        log::debug!("Full consistency report:\n{report}");
        results.consistency = Some(report);
    }

    let aggregator = Aggregator::new(&mapping, &loads, config.ignored_density);

    if config.mode.do_modules() {
        log::info!("Computing module loads...");
        let module_loads = aggregator.module_loads(config.module_skip_ignored_density)?;
        log_summary("module word loads", &module_loads.loads);
        results.module_loads = Some(module_loads);
    }

    if config.mode.do_links() {
        log::info!(
            "Computing lpGBT loads for IDs 1 to {}...",
            config.max_link_id
        );
        let link_loads = aggregator.link_loads(config.max_link_id)?;
        log_summary("lpGBT TC loads", &link_loads.cell_loads());
        log_summary("lpGBT word loads", &link_loads.word_loads());
        results.link_loads = Some(link_loads);
    }

    Ok(results)
}

/// Write the histograms for whatever loads were computed
pub fn plot_results(config: &Config, results: &AnalysisResults) -> Result<(), ProcessorError> {
    std::fs::create_dir_all(&config.output_path)?;

    if let Some(modules) = &results.module_loads {
        let plots = &config.module_plots;
        draw_1d(config, &plots.words, &modules.loads)?;
        draw_2d(
            config,
            &plots.words_vs_layer,
            &modules.loads,
            &modules.layers_f64(),
        )?;
    }

    if let Some(links) = &results.link_loads {
        let plots = &config.link_plots;
        let cells = links.cell_loads();
        let words = links.word_loads();
        let layers = links.layers_f64();
        draw_1d(config, &plots.tcs, &cells)?;
        draw_1d(config, &plots.words, &words)?;
        draw_2d(config, &plots.tcs_vs_layer, &cells, &layers)?;
        draw_2d(config, &plots.words_vs_layer, &words, &layers)?;
    }

    Ok(())
}

/// The main entry point of the load analysis.
///
/// Loads the mapping and the load table, runs the optional consistency check, computes the
/// module and/or lpGBT loads, and writes the histograms to the output directory.
pub fn process(config: &Config) -> Result<AnalysisResults, ProcessorError> {
    let results = analyze(config)?;
    log::info!(
        "Writing histograms to {}...",
        config.output_path.to_string_lossy()
    );
    plot_results(config, &results)?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisMode;
    use crate::error::{AggregatorError, HistogramError, MappingTableError};
    use crate::module_id::ModuleID;
    use std::path::Path;

    const MAPPING: &str = "\
5 1 1 1 1 2 3 2 -1 0 10 2 11 2
5 1 2 1 1 1 3 2 -1 0 11 4 -1 0
6 0 0 0 0 0 -1 0 -1 0 -1 0 -1 0
40 3 3 2 1 1 9 2 -1 0 12 2 -1 0
";
    const LOADS: &str = "\
1,1,5,100,50
1,2,5,20,8
0,0,6,0,0
3,3,40,12,4
9,9,7,3,1
";

    fn write_inputs(dir: &Path, mapping: &str, loads: &str) -> Config {
        let mapping_path = dir.join("mapping.txt");
        let load_path = dir.join("tcs.csv");
        std::fs::write(&mapping_path, mapping).unwrap();
        std::fs::write(&load_path, loads).unwrap();
        Config {
            mapping_path,
            load_table_path: load_path,
            output_path: dir.join("plots"),
            ..Default::default()
        }
    }

    #[test]
    fn test_analyze_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_inputs(dir.path(), MAPPING, LOADS);
        config.mode = AnalysisMode::Both;
        config.check_missing_modules = true;

        let results = analyze(&config).unwrap();

        let modules = results.module_loads.unwrap();
        assert_eq!(
            modules.modules,
            vec![
                ModuleID::new(5, 1, 1),
                ModuleID::new(5, 1, 2),
                ModuleID::new(40, 3, 3)
            ]
        );
        assert_eq!(modules.loads, vec![6.25, 1.0, 1.0]);
        assert_eq!(modules.layers, vec![5, 5, 40]);

        let links = results.link_loads.unwrap();
        let ids: Vec<i32> = links.links.iter().map(|l| l.link_id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(links.links[0].cell_load, 50.0);
        assert_eq!(links.links[0].word_load, 25.0);
        assert_eq!(links.links[1].cell_load, 70.0);
        assert_eq!(links.links[1].word_load, 33.0);
        assert_eq!(links.links[1].n_modules, 2);

        let report = results.consistency.unwrap();
        assert_eq!(report.only_in_load_table, vec![ModuleID::new(7, 9, 9)]);
        assert!(report.only_in_mapping.is_empty());
    }

    #[test]
    fn test_process_writes_all_plots() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_inputs(dir.path(), MAPPING, LOADS);
        config.mode = AnalysisMode::Both;
        assert!(!config.output_path.exists());

        let results = process(&config).unwrap();
        assert!(results.module_loads.is_some());
        assert!(results.link_loads.is_some());

        let plots = [
            &config.module_plots.words.file_name,
            &config.module_plots.words_vs_layer.file_name,
            &config.link_plots.tcs.file_name,
            &config.link_plots.words.file_name,
            &config.link_plots.tcs_vs_layer.file_name,
            &config.link_plots.words_vs_layer.file_name,
        ];
        for name in plots {
            assert!(config.get_plot_path(name).exists(), "{name} was not written");
        }
    }

    #[test]
    fn test_process_rejects_huge_binning() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_inputs(dir.path(), MAPPING, LOADS);
        config.module_plots.words.bin_width = 1.0e-9;
        assert!(matches!(
            process(&config),
            Err(ProcessorError::HistogramError(
                HistogramError::TooManyBins { .. }
            ))
        ));
    }

    #[test]
    fn test_analyze_module_mode_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), MAPPING, LOADS);
        let results = analyze(&config).unwrap();
        assert!(results.module_loads.is_some());
        assert!(results.link_loads.is_none());
        assert!(results.consistency.is_none());
    }

    #[test]
    fn test_missing_load_entry_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), MAPPING, "1,1,5,100,50\n");
        match analyze(&config) {
            Err(ProcessorError::AggregatorError(AggregatorError::MissingJoinKeys(modules))) => {
                assert_eq!(
                    modules,
                    vec![ModuleID::new(5, 1, 2), ModuleID::new(40, 3, 3)]
                );
            }
            other => panic!("Expected missing modules, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_mapping_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), "5 1 1 1 1 2\n", LOADS);
        assert!(matches!(
            analyze(&config),
            Err(ProcessorError::MappingError(
                MappingTableError::BadFileFormat { line: 1, .. }
            ))
        ));
    }

    #[test]
    fn test_invalid_max_link_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_inputs(dir.path(), MAPPING, LOADS);
        config.mode = AnalysisMode::Link;
        config.max_link_id = 0;
        assert!(matches!(
            analyze(&config),
            Err(ProcessorError::ConfigError(ConfigError::InvalidMaxLinkId(0)))
        ));
    }
}
