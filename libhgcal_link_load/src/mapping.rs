// The FE mapping file assigns every module to the lpGBTs which carry its data off
// detector. Each module has a DAQ path and a trigger (TPG) path, and on each path the
// module can be split over up to two lpGBTs. For load studies we only care about the TPG
// path: how many e-links the module uses in total and what fraction of those e-links
// sits on each of the two lpGBTs.
//
// Unused lpGBT slots still carry numbers in the file (typically -1 or 0), so the slot
// columns are only trusted when the link count says the slot is populated.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::MappingTableError;
use super::module_id::{LinkSlot, ModuleID};

const ENTRIES_PER_LINE: usize = 14; //layer, u, v, density, nDAQ, nTPG, 4 DAQ columns, 4 TPG columns
const COMMENT_TOKEN: &str = "#";

/// One row of the FE mapping: a module and the lpGBT links serving it.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRow {
    pub module: ModuleID,
    pub density: i32,
    pub link_count_daq: i32,
    pub link_count_tpg: i32,
    pub daq_id1: i32,
    pub daq_elinks1: i32,
    pub daq_id2: i32,
    pub daq_elinks2: i32,
    link_id1: i32,
    pub elink_count1: i32,
    link_id2: i32,
    pub elink_count2: i32,
    pub total_elinks: i32,
    pub link_frac1: f64,
    pub link_frac2: f64,
}

impl MappingRow {
    /// Create a row from the raw TPG columns, deriving the e-link total and link fractions.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        module: ModuleID,
        density: i32,
        link_count_daq: i32,
        link_count_tpg: i32,
        daq: [i32; 4],
        link_id1: i32,
        elink_count1: i32,
        link_id2: i32,
        elink_count2: i32,
    ) -> Self {
        let total_elinks = total_elinks(link_count_tpg, elink_count1, elink_count2);
        let (link_frac1, link_frac2) =
            link_fractions(link_count_tpg, elink_count1, elink_count2, total_elinks);
        MappingRow {
            module,
            density,
            link_count_daq,
            link_count_tpg,
            daq_id1: daq[0],
            daq_elinks1: daq[1],
            daq_id2: daq[2],
            daq_elinks2: daq[3],
            link_id1,
            elink_count1,
            link_id2,
            elink_count2,
            total_elinks,
            link_frac1,
            link_frac2,
        }
    }

    /// Get the TPG lpGBT in a given slot.
    ///
    /// Returns None if the module does not use that slot.
    pub fn link_id(&self, slot: LinkSlot) -> Option<i32> {
        match slot {
            LinkSlot::First if self.link_count_tpg >= 1 => Some(self.link_id1),
            LinkSlot::Second if self.link_count_tpg >= 2 => Some(self.link_id2),
            _ => None,
        }
    }

    /// Fraction of this module's e-links which sit on the lpGBT in a given slot
    pub fn link_frac(&self, slot: LinkSlot) -> f64 {
        match slot {
            LinkSlot::First => self.link_frac1,
            LinkSlot::Second => self.link_frac2,
        }
    }

    /// True if the module has a usable (positive) e-link total
    pub fn has_valid_elinks(&self) -> bool {
        self.total_elinks > 0
    }
}

/// Total number of TPG e-links for a module. Only the first lpGBT counts unless two are used.
pub fn total_elinks(link_count_tpg: i32, elink_count1: i32, elink_count2: i32) -> i32 {
    if link_count_tpg == 2 {
        elink_count1 + elink_count2
    } else {
        elink_count1
    }
}

/// Share of the e-link total on the first and second lpGBT.
///
/// A slot that is not in use gets 0, as does every slot when the total is not positive.
pub fn link_fractions(
    link_count_tpg: i32,
    elink_count1: i32,
    elink_count2: i32,
    total_elinks: i32,
) -> (f64, f64) {
    if total_elinks <= 0 {
        return (0.0, 0.0);
    }
    let total = total_elinks as f64;
    let frac1 = if link_count_tpg > 0 {
        elink_count1 as f64 / total
    } else {
        0.0
    };
    let frac2 = if link_count_tpg > 1 {
        elink_count2 as f64 / total
    } else {
        0.0
    };
    (frac1, frac2)
}

/// MappingTable holds every row of the FE mapping file in file order.
///
/// The file is whitespace delimited with no header, 14 columns per row:
/// `layer u v density nDAQ nTPG DAQId1 nDAQeLinks1 DAQId2 nDAQeLinks2 TPGId1 nTPGeLinks1 TPGId2 nTPGeLinks2`
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    rows: Vec<MappingRow>,
}

impl MappingTable {
    /// Read the mapping table from a file
    pub fn new(path: &Path) -> Result<Self, MappingTableError> {
        if !path.exists() {
            return Err(MappingTableError::BadFilePath(path.to_path_buf()));
        }
        let mut contents = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
        Self::parse(&contents, path)
    }

    /// Parse the contents of a mapping file. The path is only used for error reporting.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, MappingTableError> {
        let mut table = MappingTable::default();
        for (idx, line) in contents.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_TOKEN) {
                continue;
            }

            let entries: Vec<&str> = trimmed.split_whitespace().collect();
            if entries.len() != ENTRIES_PER_LINE {
                return Err(MappingTableError::BadFileFormat {
                    path: path.to_path_buf(),
                    line: line_number,
                    found: entries.len(),
                    expected: ENTRIES_PER_LINE,
                });
            }

            let mut values = [0i32; ENTRIES_PER_LINE];
            for (value, entry) in values.iter_mut().zip(entries.iter()) {
                *value = entry
                    .parse()
                    .map_err(|source| MappingTableError::ParsingError {
                        path: path.to_path_buf(),
                        line: line_number,
                        source,
                    })?;
            }

            table.rows.push(MappingRow::new(
                ModuleID::new(values[0], values[1], values[2]),
                values[3],
                values[4],
                values[5],
                [values[6], values[7], values[8], values[9]],
                values[10],
                values[11],
                values[12],
                values[13],
            ));
        }

        Ok(table)
    }

    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<MappingRow> for MappingTable {
    fn from_iter<T: IntoIterator<Item = MappingRow>>(iter: T) -> Self {
        MappingTable {
            rows: iter.into_iter().collect(),
        }
    }
}
