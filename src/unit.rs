use crate::error::PlateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The recognized volume units, a fixed linear scale in powers of 1000.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum VolumeUnit {
    Nanoliter,
    Microliter,
    Milliliter,
    Liter,
}

impl VolumeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nanoliter => "nanoliter",
            Self::Microliter => "microliter",
            Self::Milliliter => "milliliter",
            Self::Liter => "liter",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "nanoliter" => Some(Self::Nanoliter),
            "microliter" => Some(Self::Microliter),
            "milliliter" => Some(Self::Milliliter),
            "liter" => Some(Self::Liter),
            _ => None,
        }
    }

    // Power of 1000 above the nanoliter.
    fn exponent(self) -> i32 {
        match self {
            Self::Nanoliter => 0,
            Self::Microliter => 1,
            Self::Milliliter => 2,
            Self::Liter => 3,
        }
    }
}

/// A unit-tagged numeric value, e.g. `20:microliter`.
///
/// Volume units convert into each other; any other unit string (say,
/// `nanogram/microliter` on a concentration property) is carried opaquely
/// and never converted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }

    /// The volume unit this quantity carries, if it carries one.
    pub fn volume_unit(&self) -> Option<VolumeUnit> {
        VolumeUnit::parse(&self.unit)
    }

    /// Re-express this quantity in another volume unit.
    ///
    /// Fails with a Format error when the quantity does not carry a
    /// recognized volume unit.
    pub fn convert_to(&self, unit: VolumeUnit) -> Result<Quantity, PlateError> {
        let from = self.volume_unit().ok_or_else(|| {
            PlateError::Format(format!("'{}' is not a convertible volume unit", self.unit))
        })?;
        Ok(Quantity::new(
            rescale(self.value, from.exponent() - unit.exponent()),
            unit.as_str(),
        ))
    }

    /// Normalize to microliters, the base unit for stored well volumes.
    pub fn to_microliters(&self) -> Result<Quantity, PlateError> {
        self.convert_to(VolumeUnit::Microliter)
    }
}

// A single correctly-rounded multiplication or division by an exact power
// of 1000, so that e.g. 0.1 milliliter converts to exactly 100 microliters
// and 200 nanoliters to exactly 0.2 microliters.
fn rescale(value: f64, exponent_delta: i32) -> f64 {
    if exponent_delta >= 0 {
        value * 1000f64.powi(exponent_delta)
    } else {
        value / 1000f64.powi(-exponent_delta)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        if self.unit == other.unit {
            return self.value == other.value;
        }
        match (self.volume_unit(), other.volume_unit()) {
            // Normalize to the smaller unit; scaling up stays exact.
            (Some(a), Some(b)) => {
                let delta = a.exponent() - b.exponent();
                if delta >= 0 {
                    rescale(self.value, delta) == other.value
                } else {
                    self.value == rescale(other.value, -delta)
                }
            }
            // Incompatible units are unequal, never an error.
            _ => false,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.value, self.unit)
    }
}

impl FromStr for Quantity {
    type Err = PlateError;

    /// Parse the textual form `<number>:<unit>`, e.g. `20:microliter`
    /// or `.1:milliliter`. The unit token must be one of the recognized
    /// volume units.
    fn from_str(text: &str) -> Result<Self, PlateError> {
        let (value, unit) = text
            .split_once(':')
            .ok_or_else(|| PlateError::Format(format!("'{text}' is not of the form value:unit")))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| PlateError::Format(format!("'{value}' is not a number")))?;
        let unit = VolumeUnit::parse(unit)
            .ok_or_else(|| PlateError::Format(format!("unrecognized unit '{unit}'")))?;
        Ok(Quantity::new(value, unit.as_str()))
    }
}

impl TryFrom<&str> for Quantity {
    type Error = PlateError;

    fn try_from(text: &str) -> Result<Self, PlateError> {
        text.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let q: Quantity = "20:microliter".parse().unwrap();
        assert_eq!(q.value, 20.0);
        assert_eq!(q.unit, "microliter");
        assert_eq!(q.to_string(), "20:microliter");
    }

    #[test]
    fn test_parse_fraction() {
        let q: Quantity = ".1:milliliter".parse().unwrap();
        assert_eq!(q.value, 0.1);
        assert_eq!(q.unit, "milliliter");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "20 microliter".parse::<Quantity>(),
            Err(PlateError::Format(_))
        ));
        assert!(matches!(
            "twenty:microliter".parse::<Quantity>(),
            Err(PlateError::Format(_))
        ));
        assert!(matches!(
            "20:hogshead".parse::<Quantity>(),
            Err(PlateError::Format(_))
        ));
    }

    #[test]
    fn test_conversion_equality() {
        let nl: Quantity = "200:nanoliter".parse().unwrap();
        assert_eq!(nl, Quantity::new(0.2, "microliter"));
        let ml: Quantity = ".1:milliliter".parse().unwrap();
        assert_eq!(ml, Quantity::new(100.0, "microliter"));
        assert_eq!(Quantity::new(1.0, "liter"), Quantity::new(1000.0, "milliliter"));
    }

    #[test]
    fn test_incompatible_units_unequal() {
        let conc = Quantity::new(40.0, "nanogram/microliter");
        assert_ne!(conc, Quantity::new(40.0, "microliter"));
        // identical opaque units compare by value
        assert_eq!(conc, Quantity::new(40.0, "nanogram/microliter"));
        assert_ne!(conc, Quantity::new(41.0, "nanogram/microliter"));
    }

    #[test]
    fn test_to_microliters() {
        let q = Quantity::new(2.0, "milliliter").to_microliters().unwrap();
        assert_eq!(q.value, 2000.0);
        assert_eq!(q.unit, "microliter");
        assert!(Quantity::new(1.0, "mol").to_microliters().is_err());
    }
}
