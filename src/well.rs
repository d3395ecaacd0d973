use crate::error::PlateError;
use crate::plate_type::PlateType;
use crate::unit::Quantity;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Index;
use std::rc::Rc;

/// One addressable well on a container.
///
/// A Well is created by its Container, once per index, and every lookup of
/// that index returns a handle to the same instance. Its index is its
/// identity and never changes; volume, properties and name are mutable
/// through any handle.
#[derive(Debug)]
pub struct Well {
    index: usize,
    plate_type: Rc<PlateType>,
    pub volume: Option<Quantity>,
    pub properties: HashMap<String, String>,
    pub name: Option<String>,
}

impl Well {
    pub(crate) fn new(index: usize, plate_type: Rc<PlateType>) -> Self {
        Self {
            index,
            plate_type,
            volume: None,
            properties: HashMap::new(),
            name: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The canonical human label of this well, e.g. "B3".
    pub fn humanize(&self) -> Result<String, PlateError> {
        self.plate_type.humanize(self.index)
    }

    /// Set this well's volume from either a `"<number>:<unit>"` string or
    /// a Quantity. The volume is stored normalized to microliters and
    /// replaces any previous value.
    ///
    /// Fails with a Range error, leaving the volume unchanged, when the
    /// requested volume exceeds the plate's per-well capacity.
    pub fn set_volume<V>(&mut self, vol: V) -> Result<(), PlateError>
    where
        V: TryInto<Quantity>,
        PlateError: From<V::Error>,
    {
        let vol: Quantity = vol.try_into()?;
        let vol = vol.to_microliters()?;
        if let Some(max) = &self.plate_type.well_volume {
            let max = max.to_microliters()?;
            if vol.value > max.value {
                return Err(PlateError::Range(format!(
                    "{vol} exceeds the well capacity of {max}"
                )));
            }
        }
        self.volume = Some(vol);
        Ok(())
    }

    /// Replace the entire property map. The argument must be a JSON
    /// object with string values; anything else fails with a Type error
    /// and leaves the properties unchanged.
    pub fn set_properties(&mut self, properties: &Value) -> Result<(), PlateError> {
        self.properties = property_map(properties)?;
        Ok(())
    }

    /// Merge a JSON object of string values into the property map,
    /// overwriting keys that already exist. Same validation as
    /// [`set_properties`](Self::set_properties).
    pub fn add_properties(&mut self, properties: &Value) -> Result<(), PlateError> {
        self.properties.extend(property_map(properties)?);
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }
}

fn property_map(properties: &Value) -> Result<HashMap<String, String>, PlateError> {
    let object = properties
        .as_object()
        .ok_or_else(|| PlateError::Type("properties must be a string-keyed mapping".to_string()))?;
    object
        .iter()
        .map(|(key, value)| match value.as_str() {
            Some(value) => Ok((key.clone(), value.to_string())),
            None => Err(PlateError::Type(format!(
                "property '{key}' must have a string value"
            ))),
        })
        .collect()
}

/// A shared handle on one well of a container.
pub type WellHandle = Rc<RefCell<Well>>;

/// An ordered, non-owning collection of well handles.
///
/// Mutations fan out to every member in order; a failure on one member
/// aborts the call, with members already processed keeping their new
/// state.
#[derive(Clone, Debug, Default)]
pub struct WellGroup {
    wells: Vec<WellHandle>,
}

impl WellGroup {
    pub fn new(wells: Vec<WellHandle>) -> Self {
        Self { wells }
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<WellHandle> {
        self.wells.get(position).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WellHandle> {
        self.wells.iter()
    }

    /// The member well indices in group order.
    pub fn indices(&self) -> Vec<usize> {
        self.wells.iter().map(|w| w.borrow().index()).collect()
    }

    pub fn push(&mut self, well: WellHandle) {
        self.wells.push(well);
    }

    /// Set every member's volume. Text is parsed once up front, so a
    /// malformed quantity mutates no member at all.
    pub fn set_volume<V>(&self, vol: V) -> Result<(), PlateError>
    where
        V: TryInto<Quantity>,
        PlateError: From<V::Error>,
    {
        let vol: Quantity = vol.try_into()?;
        for well in &self.wells {
            well.borrow_mut().set_volume::<Quantity>(vol.clone())?;
        }
        Ok(())
    }

    pub fn set_properties(&self, properties: &Value) -> Result<(), PlateError> {
        for well in &self.wells {
            well.borrow_mut().set_properties(properties)?;
        }
        Ok(())
    }

    pub fn add_properties(&self, properties: &Value) -> Result<(), PlateError> {
        for well in &self.wells {
            well.borrow_mut().add_properties(properties)?;
        }
        Ok(())
    }

    pub fn set_name(&self, name: &str) {
        for well in &self.wells {
            well.borrow_mut().set_name(name);
        }
    }
}

impl Index<usize> for WellGroup {
    type Output = WellHandle;

    fn index(&self, position: usize) -> &WellHandle {
        &self.wells[position]
    }
}

impl<'a> IntoIterator for &'a WellGroup {
    type Item = &'a WellHandle;
    type IntoIter = std::slice::Iter<'a, WellHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.wells.iter()
    }
}
