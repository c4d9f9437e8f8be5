use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::module_id::SCINTILLATOR_DENSITY;

/// Highest lpGBT ID in the FE mapping address space
const DEFAULT_MAX_LINK_ID: i32 = 1599;

const MODULE_WORDS_TITLE: &str = "Average number of words on a single module / 2 x N(e-links)";
const LINK_TCS_TITLE: &str = "Number of TCs on a single lpGBT";
const LINK_WORDS_TITLE: &str = "Number of words on a single lpGBT";
const LAYER_TITLE: &str = "Layer";

/// Which loads to compute (and plot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnalysisMode {
    #[default]
    Module,
    Link,
    Both,
}

impl AnalysisMode {
    pub fn do_modules(&self) -> bool {
        matches!(self, Self::Module | Self::Both)
    }

    pub fn do_links(&self) -> bool {
        matches!(self, Self::Link | Self::Both)
    }
}

/// A 1D histogram: output file name, x axis title, and bin width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub file_name: String,
    pub x_title: String,
    pub bin_width: f64,
}

impl PlotConfig {
    fn new(file_name: &str, x_title: &str, bin_width: f64) -> Self {
        Self {
            file_name: String::from(file_name),
            x_title: String::from(x_title),
            bin_width,
        }
    }
}

/// A 2D histogram of a load against layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot2DConfig {
    pub file_name: String,
    pub x_title: String,
    pub y_title: String,
    pub bin_width_x: f64,
    pub bin_width_y: f64,
}

impl Plot2DConfig {
    fn new(file_name: &str, x_title: &str, bin_width_x: f64, bin_width_y: f64) -> Self {
        Self {
            file_name: String::from(file_name),
            x_title: String::from(x_title),
            y_title: String::from(LAYER_TITLE),
            bin_width_x,
            bin_width_y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulePlots {
    pub words: PlotConfig,
    pub words_vs_layer: Plot2DConfig,
}

impl Default for ModulePlots {
    fn default() -> Self {
        Self {
            words: PlotConfig::new("module_loads_words.png", MODULE_WORDS_TITLE, 0.01),
            words_vs_layer: Plot2DConfig::new(
                "module_words_vs_layer.png",
                MODULE_WORDS_TITLE,
                0.05,
                1.0,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPlots {
    pub tcs: PlotConfig,
    pub words: PlotConfig,
    pub tcs_vs_layer: Plot2DConfig,
    pub words_vs_layer: Plot2DConfig,
}

impl Default for LinkPlots {
    fn default() -> Self {
        Self {
            tcs: PlotConfig::new("loads_tcs.png", LINK_TCS_TITLE, 0.1),
            words: PlotConfig::new("loads_words.png", LINK_WORDS_TITLE, 0.1),
            tcs_vs_layer: Plot2DConfig::new("tcs_vs_layer.png", LINK_TCS_TITLE, 1.0, 1.0),
            words_vs_layer: Plot2DConfig::new("words_vs_layer.png", LINK_WORDS_TITLE, 1.0, 1.0),
        }
    }
}

/// Structure representing the application configuration. Contains pathing and analysis options
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub mapping_path: PathBuf,
    pub load_table_path: PathBuf,
    pub output_path: PathBuf,
    pub mode: AnalysisMode,
    pub max_link_id: i32,
    pub ignored_density: i32,
    pub module_skip_ignored_density: bool,
    pub check_missing_modules: bool,
    pub verbose: bool,
    pub module_plots: ModulePlots,
    pub link_plots: LinkPlots,
}

impl Default for Config {
    /// Generate a new Config object pointing at the standard data file names
    fn default() -> Self {
        Self {
            mapping_path: PathBuf::from("data/FeMappingV3.txt"),
            load_table_path: PathBuf::from("data/average_tcs_20200226.csv"),
            output_path: PathBuf::from("."),
            mode: AnalysisMode::Module,
            max_link_id: DEFAULT_MAX_LINK_ID,
            ignored_density: SCINTILLATOR_DENSITY,
            module_skip_ignored_density: false,
            check_missing_modules: false,
            verbose: false,
            module_plots: ModulePlots::default(),
            link_plots: LinkPlots::default(),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Get the path to an output plot
    pub fn get_plot_path(&self, file_name: &str) -> PathBuf {
        self.output_path.join(file_name)
    }

    pub fn is_max_link_id_valid(&self) -> bool {
        self.max_link_id >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let mut config = Config::default();
        config.mode = AnalysisMode::Both;
        config.module_plots.words.bin_width = 0.02;
        config.write_config_file(&path).unwrap();
        let loaded = Config::read_config_file(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_template_writes_current_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.yml");
        Config::default().write_config_file(&path).unwrap();
        let yaml = std::fs::read_to_string(&path).unwrap();
        assert!(yaml
            .lines()
            .any(|line| line == "output_path: ." || line == "output_path: '.'"));
        assert!(yaml.lines().any(|line| line == "max_link_id: 1599"));
    }

    #[test]
    fn test_missing_config() {
        assert!(matches!(
            Config::read_config_file(Path::new("/no/such/config.yml")),
            Err(ConfigError::BadFilePath(_))
        ));
    }

    #[test]
    fn test_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "mapping_path: [not, a, path\n").unwrap();
        assert!(matches!(
            Config::read_config_file(&path),
            Err(ConfigError::ParsingError(_))
        ));
    }

    #[test]
    fn test_modes() {
        assert!(AnalysisMode::Module.do_modules() && !AnalysisMode::Module.do_links());
        assert!(!AnalysisMode::Link.do_modules() && AnalysisMode::Link.do_links());
        assert!(AnalysisMode::Both.do_modules() && AnalysisMode::Both.do_links());
        assert_eq!(Config::default().get_plot_path("a.png"), PathBuf::from("./a.png"));
    }
}
