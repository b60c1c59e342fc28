//! The binding store: authoritative in-memory bindings with change tracking.
//!
//! # Two-phase rebinding (for beginners)
//!
//! Rebinding a key is not a single call.  The menu first *opens a capture* on
//! one row ([`BindingStore::begin_capture`]), then waits, frame after frame,
//! until the player presses something.  Only then does it *commit* the new
//! source ([`BindingStore::commit_capture`]) or *cancel* the capture.  The
//! [`CaptureHandle`] returned by `begin_capture` ties the second phase to the
//! first, and only one capture may be open at a time.
//!
//! # Dirty tracking
//!
//! Every committed or cleared row is added to a dirty set.  When the menu
//! closes, [`BindingStore::flush_changes`] saves through the
//! [`BindingPersistence`] collaborator only if that set is non-empty, so
//! opening and closing the menu without touching anything never writes a file.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, info};

use super::binding::{Binding, BindingError, BindingGroup, InputSource};

/// Error reported by a [`BindingPersistence`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to save key bindings: {0}")]
pub struct PersistError(pub String);

/// Saves the full binding set somewhere durable.
///
/// The store never decides the on-disk format; it only decides *when* to save.
#[cfg_attr(test, mockall::automock)]
pub trait BindingPersistence {
    /// Persists every group, in order.
    fn save_bindings(&mut self, groups: &[BindingGroup]) -> Result<(), PersistError>;
}

/// Identifies the open capture started by [`BindingStore::begin_capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHandle {
    group: usize,
    row: usize,
    serial: u64,
}

impl CaptureHandle {
    /// Group index of the row being captured.
    pub fn group(&self) -> usize {
        self.group
    }

    /// Row index within the group.
    pub fn row(&self) -> usize {
        self.row
    }
}

/// Result of [`BindingStore::flush_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing changed; no I/O was performed.
    Clean,
    /// The bindings were saved; `rows` rows had changed.
    Saved { rows: usize },
}

/// Ordered binding groups plus the set of rows changed since the last flush.
#[derive(Debug, Clone)]
pub struct BindingStore {
    groups: Vec<BindingGroup>,
    dirty: BTreeSet<(usize, usize)>,
    capture: Option<CaptureHandle>,
    next_serial: u64,
}

impl BindingStore {
    /// Creates a store from the host's current bindings.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::DuplicateAction`] if any group repeats an action.
    pub fn new(groups: Vec<BindingGroup>) -> Result<Self, BindingError> {
        for (index, group) in groups.iter().enumerate() {
            group.validate(index)?;
        }
        Ok(Self {
            groups,
            dirty: BTreeSet::new(),
            capture: None,
            next_serial: 0,
        })
    }

    /// All groups, in order.
    pub fn groups(&self) -> &[BindingGroup] {
        &self.groups
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The binding at `(group, row)`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::InvalidIndex`] when either index is out of range.
    pub fn binding(&self, group: usize, row: usize) -> Result<&Binding, BindingError> {
        self.groups
            .get(group)
            .and_then(|g| g.bindings().get(row))
            .ok_or(BindingError::InvalidIndex { group, row })
    }

    /// The first `group_count` groups, each cut to its first `rows_per_group` rows.
    ///
    /// Used by the menu, which only has room for a few rows per device.  Rows
    /// beyond the limit stay in the store untouched.
    ///
    /// # Errors
    ///
    /// - [`BindingError::InvalidIndex`] if `group_count` exceeds the group count.
    /// - [`BindingError::RowsExceedGroup`] if a selected group is too short.
    pub fn snapshot(
        &self,
        group_count: usize,
        rows_per_group: usize,
    ) -> Result<Vec<BindingGroup>, BindingError> {
        if group_count > self.groups.len() {
            return Err(BindingError::InvalidIndex {
                group: self.groups.len(),
                row: 0,
            });
        }
        self.groups[..group_count]
            .iter()
            .enumerate()
            .map(|(index, group)| {
                if rows_per_group > group.len() {
                    Err(BindingError::RowsExceedGroup {
                        group: index,
                        requested: rows_per_group,
                        available: group.len(),
                    })
                } else {
                    Ok(group.truncated(rows_per_group))
                }
            })
            .collect()
    }

    /// Opens a capture on `(group, row)`.
    ///
    /// # Errors
    ///
    /// - [`BindingError::CaptureAlreadyActive`] if a capture is already open.
    /// - [`BindingError::InvalidIndex`] if the row does not exist.
    pub fn begin_capture(&mut self, group: usize, row: usize) -> Result<CaptureHandle, BindingError> {
        if self.capture.is_some() {
            return Err(BindingError::CaptureAlreadyActive);
        }
        self.check_index(group, row)?;

        let handle = CaptureHandle {
            group,
            row,
            serial: self.next_serial,
        };
        self.next_serial = self.next_serial.wrapping_add(1);
        self.capture = Some(handle);
        debug!(group, row, "key capture started");
        Ok(handle)
    }

    /// Binds `source` to the captured row and closes the capture.
    ///
    /// The previous source is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::StaleCapture`] if `handle` is not the open capture.
    pub fn commit_capture(
        &mut self,
        handle: CaptureHandle,
        source: InputSource,
    ) -> Result<(), BindingError> {
        self.take_capture(handle)?;
        self.assign(handle.group, handle.row, source)?;
        debug!(
            group = handle.group,
            row = handle.row,
            source = %source.display_name(),
            "key capture committed"
        );
        Ok(())
    }

    /// Closes the capture without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::StaleCapture`] if `handle` is not the open capture.
    pub fn cancel_capture(&mut self, handle: CaptureHandle) -> Result<(), BindingError> {
        self.take_capture(handle)?;
        debug!(group = handle.group, row = handle.row, "key capture cancelled");
        Ok(())
    }

    /// Unbinds `(group, row)`.
    ///
    /// Always marks the row dirty, even when it was already unbound.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::InvalidIndex`] if the row does not exist.
    pub fn clear(&mut self, group: usize, row: usize) -> Result<(), BindingError> {
        self.assign(group, row, InputSource::None)
    }

    /// The capture currently open, if any.
    pub fn active_capture(&self) -> Option<CaptureHandle> {
        self.capture
    }

    /// Returns `true` if any row changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Changed rows as `(group, row)` pairs in ascending order.
    pub fn dirty_rows(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.dirty.iter().copied()
    }

    /// Forgets every pending change and closes any open capture.
    ///
    /// The bindings themselves are left as they are; callers replace the store
    /// with a fresh snapshot afterwards.
    pub fn discard_changes(&mut self) {
        if self.is_dirty() {
            info!(rows = self.dirty.len(), "discarding unsaved binding changes");
        }
        self.dirty.clear();
        self.capture = None;
    }

    /// Saves through `persistence` if anything changed.
    ///
    /// A clean store returns [`FlushOutcome::Clean`] without calling the
    /// collaborator.  On failure the dirty set is kept so a later flush can retry.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::Persist`] if the collaborator fails.
    pub fn flush_changes<P>(&mut self, persistence: &mut P) -> Result<FlushOutcome, BindingError>
    where
        P: BindingPersistence + ?Sized,
    {
        if self.dirty.is_empty() {
            debug!("no binding changes; skipping save");
            return Ok(FlushOutcome::Clean);
        }

        persistence.save_bindings(&self.groups)?;
        let rows = self.dirty.len();
        self.dirty.clear();
        info!(rows, "key bindings saved");
        Ok(FlushOutcome::Saved { rows })
    }

    /// Consumes the store and returns its groups.
    pub fn into_groups(self) -> Vec<BindingGroup> {
        self.groups
    }

    fn check_index(&self, group: usize, row: usize) -> Result<(), BindingError> {
        self.binding(group, row).map(|_| ())
    }

    fn take_capture(&mut self, handle: CaptureHandle) -> Result<(), BindingError> {
        match self.capture {
            Some(open) if open == handle => {
                self.capture = None;
                Ok(())
            }
            _ => Err(BindingError::StaleCapture),
        }
    }

    fn assign(&mut self, group: usize, row: usize, source: InputSource) -> Result<(), BindingError> {
        let binding = self
            .groups
            .get_mut(group)
            .and_then(|g| g.row_mut(row))
            .ok_or(BindingError::InvalidIndex { group, row })?;
        binding.rebind(source);
        self.dirty.insert((group, row));
        Ok(())
    }
}
