use crate::error::PlateError;
use crate::plate_type::{PlateType, WellRef};
use crate::well::{Well, WellGroup, WellHandle};
use std::cell::RefCell;
use std::rc::Rc;

/// A plate or tube rack: the owner of one [`Well`] per position.
///
/// All wells are materialized when the container is built, and every
/// lookup of the same index returns a handle on the same well, so any
/// number of references to "well 7" alias the same mutable state for the
/// container's lifetime.
pub struct Container {
    pub id: Option<String>,
    plate_type: Rc<PlateType>,
    wells: Vec<WellHandle>,
}

impl Container {
    /// Build a container over a plate geometry, checking the geometry
    /// invariants first.
    pub fn new(id: Option<&str>, plate_type: PlateType) -> Result<Self, PlateError> {
        plate_type.validate()?;
        let plate_type = Rc::new(plate_type);
        let wells = (0..plate_type.well_count)
            .map(|index| Rc::new(RefCell::new(Well::new(index, Rc::clone(&plate_type)))))
            .collect();
        Ok(Self {
            id: id.map(str::to_string),
            plate_type,
            wells,
        })
    }

    pub fn plate_type(&self) -> &PlateType {
        &self.plate_type
    }

    pub fn well_count(&self) -> usize {
        self.plate_type.well_count
    }

    /// Resolve a well reference (index or label) to its flat index.
    pub fn robotize(&self, wellref: impl Into<WellRef>) -> Result<usize, PlateError> {
        self.plate_type.robotize(&wellref.into())
    }

    /// Render a well index as its human label.
    ///
    /// Only integer indices are accepted here; a label is rejected with a
    /// Type error rather than silently passed through.
    pub fn humanize(&self, wellref: impl Into<WellRef>) -> Result<String, PlateError> {
        match wellref.into() {
            WellRef::Index(index) => self.plate_type.humanize(index),
            WellRef::Label(label) => Err(PlateError::Type(format!(
                "humanize takes a well index, not the label '{label}'"
            ))),
        }
    }

    /// Resolve a well reference to its zero-based (row, column) pair.
    pub fn decompose(&self, wellref: impl Into<WellRef>) -> Result<(usize, usize), PlateError> {
        self.plate_type.decompose(&wellref.into())
    }

    /// The persistent well at the given index or label.
    pub fn well(&self, wellref: impl Into<WellRef>) -> Result<WellHandle, PlateError> {
        let index = self.robotize(wellref)?;
        Ok(Rc::clone(&self.wells[index]))
    }

    /// The wells at the given references, as a group in caller order.
    pub fn wells<I, W>(&self, wellrefs: I) -> Result<WellGroup, PlateError>
    where
        I: IntoIterator<Item = W>,
        W: Into<WellRef>,
    {
        let mut group = WellGroup::default();
        for wellref in wellrefs {
            group.push(self.well(wellref)?);
        }
        Ok(group)
    }

    /// All wells, in row-major order, or in column-major order (column by
    /// column, top to bottom) if `columnwise`.
    pub fn all_wells(&self, columnwise: bool) -> WellGroup {
        WellGroup::new(
            (0..self.well_count())
                .map(|k| Rc::clone(&self.wells[self.order_index(k, columnwise)]))
                .collect(),
        )
    }

    /// A window of `count` wells starting at `start` in the chosen
    /// traversal order, wrapping circularly past the last well. `count`
    /// must be positive; a count beyond the well count repeats wells.
    pub fn wells_from(
        &self,
        start: impl Into<WellRef>,
        count: usize,
        columnwise: bool,
    ) -> Result<WellGroup, PlateError> {
        if count == 0 {
            return Err(PlateError::Range(
                "well window must cover at least one well".to_string(),
            ));
        }
        let start = self.robotize(start)?;
        let offset = self.order_position(start, columnwise);
        let n = self.well_count();
        Ok(WellGroup::new(
            (0..count)
                .map(|k| Rc::clone(&self.wells[self.order_index((offset + k) % n, columnwise)]))
                .collect(),
        ))
    }

    /// The wells not on the outer edge of the plate, in the chosen
    /// traversal order. Empty when the plate has no interior.
    pub fn inner_wells(&self, columnwise: bool) -> WellGroup {
        let rows = self.plate_type.row_count();
        let cols = self.plate_type.col_count;
        let mut group = WellGroup::default();
        if rows < 3 || cols < 3 {
            return group;
        }
        if columnwise {
            for col in 1..cols - 1 {
                for row in 1..rows - 1 {
                    group.push(Rc::clone(&self.wells[row * cols + col]));
                }
            }
        } else {
            for row in 1..rows - 1 {
                for col in 1..cols - 1 {
                    group.push(Rc::clone(&self.wells[row * cols + col]));
                }
            }
        }
        group
    }

    /// One quadrant of a 384-well plate as its 96 interleaved wells, in
    /// row-major order. The quadrant is addressed by number 0..=3 or by
    /// its origin well (A1, A2, B1 or B2).
    pub fn quadrant(&self, quad: impl Into<WellRef>) -> Result<WellGroup, PlateError> {
        let rows = self.plate_type.row_count();
        let cols = self.plate_type.col_count;
        if self.well_count() != 384 || rows != 16 || cols != 24 {
            return Err(PlateError::Range(format!(
                "quadrants are defined on 16x24 384-well plates, not {} wells",
                self.well_count()
            )));
        }
        let quad = crate::stamp::quadrant_to_num(&quad.into())?;
        let (row_offset, col_offset) = (quad / 2, quad % 2);
        let mut group = WellGroup::default();
        for row in 0..rows / 2 {
            for col in 0..cols / 2 {
                let index = (2 * row + row_offset) * cols + 2 * col + col_offset;
                group.push(Rc::clone(&self.wells[index]));
            }
        }
        Ok(group)
    }

    // The well index occupying slot k of the chosen traversal order.
    fn order_index(&self, k: usize, columnwise: bool) -> usize {
        if columnwise {
            let rows = self.plate_type.row_count();
            let (row, col) = (k % rows, k / rows);
            row * self.plate_type.col_count + col
        } else {
            k
        }
    }

    // The slot a well index occupies in the chosen traversal order.
    fn order_position(&self, index: usize, columnwise: bool) -> usize {
        if columnwise {
            let cols = self.plate_type.col_count;
            let (row, col) = (index / cols, index % cols);
            row + col * self.plate_type.row_count()
        } else {
            index
        }
    }
}
