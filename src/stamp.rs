//! Helpers for 96-tip stamp transfers over SBS-format plates: quadrant
//! addressing on 384-well plates and origin validation for full, row and
//! column stamps.

use crate::error::PlateError;
use crate::plate_type::{PlateType, WellRef};

/// The shape of a stamp transfer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StampShape {
    /// All 96 tips at once.
    Full,
    /// One or more whole rows.
    Row,
    /// One or more whole columns.
    Column,
}

impl StampShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

/// Map a 384-well quadrant origin (A1, A2, B1 or B2, or the matching
/// index 0, 1, 24 or 25) to its quadrant number 0..=3.
pub fn quadrant_to_num(quad: &WellRef) -> Result<usize, PlateError> {
    let quad = match quad {
        WellRef::Label(label) => match label.to_ascii_uppercase().as_str() {
            "A1" => 0,
            "A2" => 1,
            "B1" => 24,
            "B2" => 25,
            _ => {
                return Err(PlateError::Range(format!(
                    "'{label}' is not a quadrant origin (A1, A2, B1 or B2)"
                )));
            }
        },
        WellRef::Index(index) => *index,
    };
    match quad {
        0 => Ok(0),
        1 => Ok(1),
        24 => Ok(2),
        25 => Ok(3),
        other => Err(PlateError::Range(format!(
            "{other} is not a quadrant number or origin index"
        ))),
    }
}

/// The origin well index of a quadrant number 0..=3.
pub fn quadrant_num_to_index(quad: usize) -> Result<usize, PlateError> {
    match quad {
        0 => Ok(0),
        1 => Ok(1),
        2 => Ok(24),
        3 => Ok(25),
        other => Err(PlateError::Range(format!("{other} is not a quadrant number"))),
    }
}

/// The origin well label of a quadrant number 0..=3.
pub fn quadrant_num_to_label(quad: usize) -> Result<&'static str, PlateError> {
    match quad {
        0 => Ok("A1"),
        1 => Ok("A2"),
        2 => Ok("B1"),
        3 => Ok("B2"),
        other => Err(PlateError::Range(format!("{other} is not a quadrant number"))),
    }
}

/// Validate an origin well for a 96-tip stamp of the given shape on a
/// 96- or 384-well SBS plate.
pub fn check_stamp_origin(
    plate: &PlateType,
    origin: impl Into<WellRef>,
    shape: StampShape,
) -> Result<(), PlateError> {
    plate.validate()?;
    let origin = plate.robotize(&origin.into())?;
    let cols = plate.col_count;
    match plate.well_count {
        96 => match shape {
            StampShape::Full => {
                if origin != 0 {
                    return Err(PlateError::Range(
                        "a full 96-well stamp must originate at well 0".to_string(),
                    ));
                }
            }
            StampShape::Row => {
                if origin % cols != 0 {
                    return Err(PlateError::Range(
                        "a row stamp must originate in the left column".to_string(),
                    ));
                }
            }
            StampShape::Column => {
                if origin >= cols {
                    return Err(PlateError::Range(
                        "a column stamp must originate in the top row".to_string(),
                    ));
                }
            }
        },
        384 => match shape {
            StampShape::Full => {
                quadrant_to_num(&WellRef::Index(origin)).map_err(|_| {
                    PlateError::Range(
                        "a full 384-well stamp must originate at well 0, 1, 24 or 25".to_string(),
                    )
                })?;
            }
            StampShape::Row => {
                if origin % cols > 1 {
                    return Err(PlateError::Range(
                        "a row stamp must originate in the two left columns".to_string(),
                    ));
                }
            }
            StampShape::Column => {
                if origin >= cols * 2 {
                    return Err(PlateError::Range(
                        "a column stamp must originate in the two top rows".to_string(),
                    ));
                }
            }
        },
        other => {
            return Err(PlateError::Range(format!(
                "stamp origins are only defined for 96- and 384-well plates, not {other} wells"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate_96() -> PlateType {
        PlateType {
            shortname: "96-flat".to_string(),
            well_count: 96,
            col_count: 12,
            ..PlateType::default()
        }
    }

    fn plate_384() -> PlateType {
        PlateType {
            shortname: "384-flat".to_string(),
            well_count: 384,
            col_count: 24,
            ..PlateType::default()
        }
    }

    #[test]
    fn test_quadrant_to_num() {
        assert_eq!(quadrant_to_num(&"A1".into()).unwrap(), 0);
        assert_eq!(quadrant_to_num(&"a2".into()).unwrap(), 1);
        assert_eq!(quadrant_to_num(&WellRef::Index(24)).unwrap(), 2);
        assert_eq!(quadrant_to_num(&WellRef::Index(25)).unwrap(), 3);
        assert!(matches!(quadrant_to_num(&"C1".into()), Err(PlateError::Range(_))));
        assert!(matches!(quadrant_to_num(&WellRef::Index(2)), Err(PlateError::Range(_))));
    }

    #[test]
    fn test_quadrant_num_inverse() {
        for quad in 0..4 {
            let index = quadrant_num_to_index(quad).unwrap();
            assert_eq!(quadrant_to_num(&WellRef::Index(index)).unwrap(), quad);
            let label = quadrant_num_to_label(quad).unwrap();
            assert_eq!(quadrant_to_num(&label.into()).unwrap(), quad);
        }
        assert!(quadrant_num_to_index(4).is_err());
        assert!(quadrant_num_to_label(4).is_err());
    }

    #[test]
    fn test_stamp_origin_96() {
        let plate = plate_96();
        assert!(check_stamp_origin(&plate, 0usize, StampShape::Full).is_ok());
        assert!(check_stamp_origin(&plate, "B1", StampShape::Full).is_err());

        // row stamps start in the left column
        assert!(check_stamp_origin(&plate, "C1", StampShape::Row).is_ok());
        assert!(check_stamp_origin(&plate, "C2", StampShape::Row).is_err());

        // column stamps start in the top row
        assert!(check_stamp_origin(&plate, "A7", StampShape::Column).is_ok());
        assert!(check_stamp_origin(&plate, "B7", StampShape::Column).is_err());
    }

    #[test]
    fn test_stamp_origin_384() {
        let plate = plate_384();
        for origin in ["A1", "A2", "B1", "B2"] {
            assert!(check_stamp_origin(&plate, origin, StampShape::Full).is_ok());
        }
        assert!(check_stamp_origin(&plate, "A3", StampShape::Full).is_err());

        assert!(check_stamp_origin(&plate, "D2", StampShape::Row).is_ok());
        assert!(check_stamp_origin(&plate, "D3", StampShape::Row).is_err());

        assert!(check_stamp_origin(&plate, "B24", StampShape::Column).is_ok());
        assert!(check_stamp_origin(&plate, "C1", StampShape::Column).is_err());
    }

    #[test]
    fn test_stamp_origin_unsupported_plate() {
        let plate = PlateType {
            shortname: "dummy".to_string(),
            well_count: 15,
            col_count: 5,
            ..PlateType::default()
        };
        assert!(matches!(
            check_stamp_origin(&plate, 0usize, StampShape::Full),
            Err(PlateError::Range(_))
        ));
    }

    #[test]
    fn test_stamp_origin_invalid_geometry() {
        // a descriptor violating the geometry invariants is rejected
        // up front rather than dividing by its column count
        let plate = PlateType {
            shortname: "broken".to_string(),
            well_count: 96,
            col_count: 0,
            ..PlateType::default()
        };
        assert!(matches!(
            check_stamp_origin(&plate, 0usize, StampShape::Row),
            Err(PlateError::Range(_))
        ));
    }
}
