use std::fs::File;
use std::io::Read;
use std::path::Path;

use fxhash::FxHashMap;

use super::error::LoadTableError;
use super::module_id::ModuleID;

const ENTRIES_PER_LINE: usize = 5; //u, v, layer, nTCs, nWords

/// The average number of trigger cells and words a module sends per event.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRow {
    pub module: ModuleID,
    pub cell_count: f64,
    pub word_count: f64,
}

/// LoadTable contains the average trigger cell (TC) and word counts per module, as
/// produced externally by the trigger primitive generator emulation.
///
/// The file is comma delimited with no header: `u,v,layer,nTCs,nWords`. Rows are kept in
/// file order, and an index from ModuleID to row is built once at load time so that the
/// join against the mapping is a hash lookup.
#[derive(Debug, Clone, Default)]
pub struct LoadTable {
    rows: Vec<LoadRow>,
    index: FxHashMap<ModuleID, usize>,
}

impl LoadTable {
    /// Read the load table from a file
    pub fn new(path: &Path) -> Result<Self, LoadTableError> {
        if !path.exists() {
            return Err(LoadTableError::BadFilePath(path.to_path_buf()));
        }
        let mut contents = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
        Self::parse(&contents, path)
    }

    /// Parse the contents of a load table. The path is only used for error reporting.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, LoadTableError> {
        let mut rows = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            let line_number = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let entries: Vec<&str> = line.split_terminator(',').map(str::trim).collect();
            if entries.len() != ENTRIES_PER_LINE {
                return Err(LoadTableError::BadFileFormat {
                    path: path.to_path_buf(),
                    line: line_number,
                    found: entries.len(),
                    expected: ENTRIES_PER_LINE,
                });
            }

            let int_err = |source| LoadTableError::ParsingIntError {
                path: path.to_path_buf(),
                line: line_number,
                source,
            };
            let float_err = |source| LoadTableError::ParsingFloatError {
                path: path.to_path_buf(),
                line: line_number,
                source,
            };
            let u: i32 = entries[0].parse().map_err(int_err)?;
            let v: i32 = entries[1].parse().map_err(int_err)?;
            let layer: i32 = entries[2].parse().map_err(int_err)?;
            let cell_count: f64 = entries[3].parse().map_err(float_err)?;
            let word_count: f64 = entries[4].parse().map_err(float_err)?;

            rows.push(LoadRow {
                module: ModuleID::new(layer, u, v),
                cell_count,
                word_count,
            });
        }

        Ok(rows.into_iter().collect())
    }

    /// Get the load of a given module.
    ///
    /// If returns None the module does not exist in the table
    pub fn get(&self, module: &ModuleID) -> Option<&LoadRow> {
        self.index.get(module).map(|idx| &self.rows[*idx])
    }

    pub fn contains(&self, module: &ModuleID) -> bool {
        self.index.contains_key(module)
    }

    pub fn rows(&self) -> &[LoadRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<LoadRow> for LoadTable {
    /// Build the table and its index. If a module appears more than once the first row wins.
    fn from_iter<T: IntoIterator<Item = LoadRow>>(iter: T) -> Self {
        let mut table = LoadTable::default();
        for row in iter {
            let idx = table.rows.len();
            if table.index.contains_key(&row.module) {
                log::warn!(
                    "Module ({}) appears more than once in the load table; keeping the first entry",
                    row.module
                );
            } else {
                table.index.insert(row.module, idx);
            }
            table.rows.push(row);
        }
        table
    }
}

//Unit tests
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<LoadTable, LoadTableError> {
        LoadTable::parse(contents, Path::new("test_tcs.csv"))
    }

    #[test]
    fn test_column_order() {
        let table = parse("1,2,5,100,50\n3,4,6,12.5,7.25\n").unwrap();
        assert_eq!(table.len(), 2);
        let row = table.get(&ModuleID::new(5, 1, 2)).unwrap();
        assert_eq!(row.cell_count, 100.0);
        assert_eq!(row.word_count, 50.0);
        let row = table.get(&ModuleID::new(6, 3, 4)).unwrap();
        assert_eq!(row.cell_count, 12.5);
        assert_eq!(row.word_count, 7.25);
        assert!(table.get(&ModuleID::new(1, 2, 5)).is_none());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let table = parse("0,0,1,5,1\n0,0,1,9,2\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&ModuleID::new(1, 0, 0)).unwrap().cell_count, 5.0);
    }

    #[test]
    fn test_bad_column_count() {
        match parse("0,0,1,5,1\n0,0,1,5\n") {
            Err(LoadTableError::BadFileFormat { line, found, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 4);
            }
            other => panic!("Expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            parse("a,0,1,5,1"),
            Err(LoadTableError::ParsingIntError { line: 1, .. })
        ));
        assert!(matches!(
            parse("0,0,1,five,1"),
            Err(LoadTableError::ParsingFloatError { line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            LoadTable::new(Path::new("/this/path/does/not/exist.csv")),
            Err(LoadTableError::BadFilePath(_))
        ));
    }
}
