//! # hgcal_link_load
//!
//! hgcal_link_load estimates the data load on the HGCAL trigger readout, written in Rust.
//! It takes the front-end (FE) mapping, which assigns every detector module to the lpGBT
//! links carrying its trigger data, and a table of the average number of trigger cells (TCs)
//! and words each module produces per event. The two are joined on the module address
//! (layer, u, v) and the resulting loads are histogrammed.
//!
//! Two loads can be computed:
//!
//! - Module load: the average number of words of a module divided by 2 x its number of
//! trigger e-links.
//! - lpGBT load: the sum of the TCs and words of every module read out by an lpGBT. A module
//! split over two lpGBTs contributes to each in proportion to the e-links it has on it.
//! Scintillator modules (density flag 2) are left out.
//!
//! ## Building & Install
//!
//! To build and install the CLI use `cargo install --path ./hgcal_link_load_cli` from the
//! top level repository. See the `hgcal_link_load_cli` documentation for its use.
//!
//! ## Configuration
//!
//! The analysis is controlled by a YAML file. A template can be generated with the CLI
//! (`hgcal_link_load_cli -p config.yml new`) and looks like:
//!
//! ```yml
//! mapping_path: data/FeMappingV3.txt
//! load_table_path: data/average_tcs_20200226.csv
//! output_path: .
//! mode: Module
//! max_link_id: 1599
//! ignored_density: 2
//! module_skip_ignored_density: false
//! check_missing_modules: false
//! verbose: false
//! module_plots:
//!   words:
//!     file_name: module_loads_words.png
//!     x_title: Average number of words on a single module / 2 x N(e-links)
//!     bin_width: 0.01
//!   words_vs_layer:
//!     ...
//! link_plots:
//!   ...
//! ```
//!
//! `mode` is one of `Module`, `Link`, or `Both`. lpGBTs are looked for with IDs from 1 to
//! `max_link_id` (inclusive). With `check_missing_modules` set, modules found in only one of
//! the two tables are listed in the log (all of them if `verbose` is set).
//!
//! ### Input Formats
//!
//! The FE mapping is whitespace delimited with no header:
//!
//! ```text
//! layer u v density nDAQ nTPG DAQId1 nDAQeLinks1 DAQId2 nDAQeLinks2 TPGId1 nTPGeLinks1 TPGId2 nTPGeLinks2
//! ```
//!
//! The load table is a CSV file with no header:
//!
//! ```csv
//! u,v,layer,nTCs,nWords
//! ```
//!
//! ## Output
//!
//! One PNG per configured histogram is written to `output_path`: a 1D histogram of each load,
//! and a 2D histogram of each load against layer.
pub mod aggregator;
pub mod config;
pub mod consistency;
pub mod error;
pub mod histogram;
pub mod load_table;
pub mod mapping;
pub mod module_id;
pub mod plot;
pub mod process;
