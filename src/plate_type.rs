use crate::error::PlateError;
use crate::unit::Quantity;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // One row letter followed by a 1-based column number, e.g. "B3".
    static ref WELL_LABEL: Regex = Regex::new(r"^([A-Za-z])([0-9]+)$").unwrap();
}

/// A reference to one well, either as a flat robot index or as a
/// human-readable row/column label.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum WellRef {
    Index(usize),
    Label(String),
}

impl From<usize> for WellRef {
    fn from(index: usize) -> Self {
        WellRef::Index(index)
    }
}

impl From<&str> for WellRef {
    fn from(label: &str) -> Self {
        WellRef::Label(label.to_string())
    }
}

impl From<String> for WellRef {
    fn from(label: String) -> Self {
        WellRef::Label(label)
    }
}

/// Immutable descriptor of a container's physical layout: how many wells,
/// how they are arranged, how much each one holds, and what the labware
/// can do.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlateType {
    pub name: String,
    pub shortname: String,
    pub well_count: usize,
    pub col_count: usize,
    pub well_volume: Option<Quantity>,
    pub dead_volume: Option<Quantity>,
    pub well_depth_mm: Option<f64>,
    pub well_coating: Option<String>,
    pub sterile: bool,
    pub is_tube: bool,
    pub capabilities: Vec<String>,
}

impl PlateType {
    pub fn row_count(&self) -> usize {
        self.well_count / self.col_count
    }

    /// Check the geometry invariants: positive counts, and columns that
    /// evenly divide the well count.
    pub fn validate(&self) -> Result<(), PlateError> {
        if self.well_count == 0 || self.col_count == 0 {
            return Err(PlateError::Range(format!(
                "plate '{}' must have positive well and column counts",
                self.shortname
            )));
        }
        if self.well_count % self.col_count != 0 {
            return Err(PlateError::Range(format!(
                "plate '{}': {} columns do not evenly divide {} wells",
                self.shortname, self.col_count, self.well_count
            )));
        }
        Ok(())
    }

    /// Resolve a well reference to its flat robot index.
    ///
    /// Labels are one row letter (A = first row, case insensitive)
    /// followed by a 1-based column number. Fails with a Range error for
    /// rows, columns or indices beyond the geometry.
    pub fn robotize(&self, wellref: &WellRef) -> Result<usize, PlateError> {
        match wellref {
            WellRef::Index(index) => {
                if *index >= self.well_count {
                    return Err(PlateError::Range(format!(
                        "well index {index} beyond the last well {}",
                        self.well_count - 1
                    )));
                }
                Ok(*index)
            }
            WellRef::Label(label) => {
                let captures = WELL_LABEL.captures(label).ok_or_else(|| {
                    PlateError::Range(format!("'{label}' is not a well label like B3"))
                })?;
                let letter = captures[1].chars().next().unwrap_or_default();
                let row = letter.to_ascii_uppercase() as usize - 'A' as usize;
                let col_number: usize = captures[2]
                    .parse()
                    .map_err(|_| PlateError::Range(format!("column number in '{label}' is out of range")))?;
                if col_number == 0 || col_number > self.col_count {
                    return Err(PlateError::Range(format!(
                        "column {col_number} outside 1..={} on '{label}'",
                        self.col_count
                    )));
                }
                if row >= self.row_count() {
                    return Err(PlateError::Range(format!(
                        "row '{letter}' beyond the last row of a {}-row plate",
                        self.row_count()
                    )));
                }
                Ok(row * self.col_count + (col_number - 1))
            }
        }
    }

    /// Render a flat index as its canonical human label (uppercase row
    /// letter, minimal-digit column number).
    pub fn humanize(&self, index: usize) -> Result<String, PlateError> {
        if index >= self.well_count {
            return Err(PlateError::Range(format!(
                "well index {index} beyond the last well {}",
                self.well_count - 1
            )));
        }
        let row = index / self.col_count;
        let col = index % self.col_count;
        if row >= 26 {
            return Err(PlateError::Range(format!(
                "row {row} is not addressable by a single letter"
            )));
        }
        let letter = (b'A' + row as u8) as char;
        Ok(format!("{letter}{}", col + 1))
    }

    /// Resolve a well reference to its zero-based (row, column) pair.
    pub fn decompose(&self, wellref: &WellRef) -> Result<(usize, usize), PlateError> {
        let index = self.robotize(wellref)?;
        Ok((index / self.col_count, index % self.col_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_plate() -> PlateType {
        PlateType {
            name: "dummy 15-well plate".to_string(),
            shortname: "dummy".to_string(),
            well_count: 15,
            col_count: 5,
            well_volume: Some(Quantity::new(200.0, "microliter")),
            dead_volume: Some(Quantity::new(15.0, "microliter")),
            ..PlateType::default()
        }
    }

    #[test]
    fn test_validate() {
        assert!(dummy_plate().validate().is_ok());
        let mut bad = dummy_plate();
        bad.col_count = 4;
        assert!(matches!(bad.validate(), Err(PlateError::Range(_))));
        bad.col_count = 0;
        assert!(matches!(bad.validate(), Err(PlateError::Range(_))));
    }

    #[test]
    fn test_robotize() {
        let plate = dummy_plate();
        assert_eq!(plate.robotize(&"A1".into()).unwrap(), 0);
        assert_eq!(plate.robotize(&"B3".into()).unwrap(), 7);
        assert_eq!(plate.robotize(&"b3".into()).unwrap(), 7);
        assert_eq!(plate.robotize(&WellRef::Index(7)).unwrap(), 7);
    }

    #[test]
    fn test_robotize_out_of_range() {
        let plate = dummy_plate();
        assert!(matches!(plate.robotize(&"A10".into()), Err(PlateError::Range(_))));
        assert!(matches!(plate.robotize(&"J1".into()), Err(PlateError::Range(_))));
        assert!(matches!(plate.robotize(&"A0".into()), Err(PlateError::Range(_))));
        assert!(matches!(plate.robotize(&"11".into()), Err(PlateError::Range(_))));
        assert!(matches!(plate.robotize(&WellRef::Index(15)), Err(PlateError::Range(_))));
    }

    #[test]
    fn test_humanize() {
        let plate = dummy_plate();
        assert_eq!(plate.humanize(0).unwrap(), "A1");
        assert_eq!(plate.humanize(7).unwrap(), "B3");
        assert_eq!(plate.humanize(14).unwrap(), "C5");
        assert!(matches!(plate.humanize(20), Err(PlateError::Range(_))));
    }

    #[test]
    fn test_roundtrip_all_indices() {
        let plate = dummy_plate();
        for i in 0..plate.well_count {
            let label = plate.humanize(i).unwrap();
            assert_eq!(plate.robotize(&label.into()).unwrap(), i);
        }
    }

    #[test]
    fn test_decompose() {
        let plate = dummy_plate();
        assert_eq!(plate.decompose(&"C4".into()).unwrap(), (2, 3));
        assert_eq!(plate.decompose(&WellRef::Index(7)).unwrap(), (1, 2));
    }
}
