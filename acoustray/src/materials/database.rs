//! Acoustic materials database.
//!
//! The database is an ordered table of [`MaterialRecord`]s. A record's `id` is the
//! key surfaces refer to and never changes with the record's position in the table.
//! New ids come from a running counter so a deleted id is never handed out again.

use crate::error::{AcoustRayError, Result};
use crate::math::{NUM_BANDS, Spectrum};
use std::ops::Deref;

/// One row of the materials database.
///
/// # Example
///
/// ```
/// use acoustray::materials::MaterialRecord;
///
/// let plaster = MaterialRecord::new(4, [0.12, 0.10, 0.08, 0.06, 0.05, 0.04, 0.04, 0.03], "plaster");
/// assert!(plaster.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    /// Material reference id used by surfaces
    id: u32,

    /// Fraction of sound energy absorbed per octave band (0.0 - 1.0)
    pub alpha: Spectrum,

    /// Longer material description
    pub description: String,
}

impl MaterialRecord {
    pub fn new(id: u32, alpha: Spectrum, description: impl Into<String>) -> Self {
        Self {
            id,
            alpha,
            description: description.into(),
        }
    }

    /// Material reference id used by surfaces
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Validates that all absorption coefficients are within [0.0, 1.0]
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        for &val in &self.alpha {
            if !(0.0..=1.0).contains(&val) {
                return Err("Absorption values must be between 0.0 and 1.0");
            }
        }
        Ok(())
    }
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self {
            id: 0,
            alpha: [0.0; NUM_BANDS],
            description: "--".to_string(),
        }
    }
}

/// Editing handle for one row of a [`MaterialDatabase`].
///
/// Reads go through to the record; only the description and spectrum can be
/// changed, so the row keeps the id the table gave it.
#[derive(Debug)]
pub struct MaterialEntry<'a> {
    record: &'a mut MaterialRecord,
}

impl MaterialEntry<'_> {
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.record.description = description.into();
        self
    }

    pub fn set_alpha(&mut self, alpha: Spectrum) -> &mut Self {
        self.record.alpha = alpha;
        self
    }

    /// Mutable access to the description text, for in-place editors.
    pub fn description_mut(&mut self) -> &mut String {
        &mut self.record.description
    }
}

impl Deref for MaterialEntry<'_> {
    type Target = MaterialRecord;

    fn deref(&self) -> &MaterialRecord {
        self.record
    }
}

/// Direction of a row move in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Ordered, user-editable table of materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialDatabase {
    records: Vec<MaterialRecord>,
    selected: Option<usize>,
    max_index: Option<u32>,
}

impl MaterialDatabase {
    /// Creates a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a database from existing records, keeping their ids.
    ///
    /// The id counter is reset to the largest id present and the first row is
    /// selected.
    ///
    /// # Errors
    ///
    /// Returns an error if two records share an id or a record is invalid.
    pub fn from_records(records: Vec<MaterialRecord>) -> Result<Self> {
        let mut db = Self::new();
        db.replace_all(records)?;
        Ok(db)
    }

    /// Appends a fresh record with the next unused id and selects it.
    ///
    /// # Errors
    ///
    /// Returns an error once the id counter has reached `u32::MAX`.
    pub fn add(&mut self) -> Result<MaterialEntry<'_>> {
        let id = match self.max_index {
            None => 0,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                AcoustRayError::InvalidInput(format!("no material id left after {}", max))
            })?,
        };
        self.max_index = Some(id);
        self.records.push(MaterialRecord {
            id,
            ..Default::default()
        });
        let index = self.records.len() - 1;
        self.selected = Some(index);
        log::debug!("Added material {} at row {}", id, index);
        Ok(MaterialEntry {
            record: &mut self.records[index],
        })
    }

    /// Appends a record keeping its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken or the record is invalid.
    pub fn push(&mut self, record: MaterialRecord) -> Result<()> {
        record
            .validate()
            .map_err(|reason| AcoustRayError::InvalidInput(format!("material {}: {}", record.id, reason)))?;
        if self.get_by_id(record.id).is_some() {
            return Err(AcoustRayError::InvalidInput(format!(
                "material id {} already exists",
                record.id
            )));
        }
        self.max_index = Some(self.max_index.map_or(record.id, |max| max.max(record.id)));
        self.records.push(record);
        Ok(())
    }

    /// Removes the selected row and moves the selection to the row above it.
    pub fn remove_selected(&mut self) -> Option<MaterialRecord> {
        let index = self.selected.filter(|&i| i < self.records.len())?;
        let removed = self.records.remove(index);
        self.selected = if self.records.is_empty() {
            None
        } else {
            Some(index.saturating_sub(1).min(self.records.len() - 1))
        };
        log::debug!("Removed material {} from row {}", removed.id, index);
        Some(removed)
    }

    /// Swaps the selected row with its neighbour and keeps it selected.
    ///
    /// Returns false when there is nothing to move or the row is already at the
    /// edge of the table.
    pub fn move_selected(&mut self, direction: MoveDirection) -> bool {
        let Some(index) = self.selected.filter(|&i| i < self.records.len()) else {
            return false;
        };
        let neighbor = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&n| n < self.records.len()),
        };
        let Some(neighbor) = neighbor else {
            log::warn!("Material at row {} cannot move {:?}", index, direction);
            return false;
        };
        self.records.swap(index, neighbor);
        self.selected = Some(neighbor);
        true
    }

    /// Wipes the table and loads `records`, resetting the id counter.
    pub fn replace_all(&mut self, records: Vec<MaterialRecord>) -> Result<()> {
        let mut fresh = Self::new();
        for record in records {
            fresh.push(record)?;
        }
        fresh.selected = if fresh.records.is_empty() { None } else { Some(0) };
        *self = fresh;
        Ok(())
    }

    pub fn select(&mut self, index: usize) {
        if index < self.records.len() {
            self.selected = Some(index);
        }
    }

    /// Row index of the selected record
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record_mut(&mut self) -> Option<MaterialEntry<'_>> {
        let record = self.selected.and_then(|i| self.records.get_mut(i))?;
        Some(MaterialEntry { record })
    }

    /// Largest id ever handed out or loaded
    pub fn max_index(&self) -> Option<u32> {
        self.max_index
    }

    /// Retrieves a record by its row position
    pub fn get(&self, index: usize) -> Option<&MaterialRecord> {
        self.records.get(index)
    }

    /// Retrieves a record by id. Linear scan; tables are human sized.
    pub fn get_by_id(&self, id: u32) -> Option<&MaterialRecord> {
        self.records.iter().find(|m| m.id == id)
    }

    pub fn records(&self) -> &[MaterialRecord] {
        &self.records
    }

    /// Editing handle for the row at `index`
    pub fn entry_mut(&mut self, index: usize) -> Option<MaterialEntry<'_>> {
        let record = self.records.get_mut(index)?;
        Some(MaterialEntry { record })
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialRecord> {
        self.records.iter()
    }

    /// Returns the number of materials in the table
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table contains no materials
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
