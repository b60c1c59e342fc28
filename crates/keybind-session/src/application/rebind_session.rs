//! RebindSession: one visit to the key binding menu.
//!
//! The session owns a [`BindingStore`] built from the host's current bindings
//! and a [`GridCursor`] over the menu grid: one column per action, and below
//! each action one binding slot per device, for as many devices as the screen
//! has rows.  The host calls [`RebindSession::update`] once per frame with the
//! menu command the player gave (if any) and plays the returned [`Feedback`]
//! sound.
//!
//! # Stages
//!
//! ```text
//!              Confirm                 raw event
//!  Browsing ───────────▶ Capturing ─────────────▶ Browsing
//!     │
//!     │ Cancel
//!     ▼
//!   Closed
//! ```
//!
//! A device hot-plug in any stage throws away unsaved changes and starts over
//! from a fresh snapshot.  Changes reach the persistence collaborator only in
//! [`RebindSession::finish`], and only if something changed.

use keybind_core::{
    BindingError, BindingPersistence, BindingStore, CaptureHandle, FlushOutcome, GridCursor,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infrastructure::host_input::HostInput;
use crate::infrastructure::storage::config::MenuConfig;

/// Error type for the rebinding session.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error("the key binding menu is already closed")]
    Closed,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The player moves the cursor over the grid.
    Browsing,
    /// Waiting for the player to press the input to bind.
    Capturing(CaptureHandle),
    /// The player left the menu.
    Closed,
}

/// Abstract menu input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Up,
    Down,
    Left,
    Right,
    Delete,
    Confirm,
    Cancel,
}

/// Sound cue the host should play for a handled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Cursor,
    Ok,
    Cancel,
    Buzzer,
    /// The devices changed and the menu was rebuilt.
    Reset,
}

// ── Grid layout ───────────────────────────────────────────────────────────────

/// Maps menu boxes to store rows.
///
/// Columns follow the action order of the first device.  Slot `n` of a
/// column is that action's binding on device `n`.
#[derive(Debug, Clone)]
struct MenuLayout {
    actions: Vec<String>,
    slots: usize,
    /// Store `(group, row)` of each box, indexed like [`GridCursor::index`].
    cells: Vec<(usize, usize)>,
}

impl MenuLayout {
    fn build(store: &BindingStore, rows: usize) -> Result<Self, BindingError> {
        let slots = rows.min(store.group_count());
        let actions: Vec<String> = store
            .groups()
            .first()
            .map(|g| g.bindings().iter().map(|b| b.action.clone()).collect())
            .unwrap_or_default();

        // Every visible device needs a row for every action.
        store.snapshot(slots, actions.len())?;

        let devices = &store.groups()[..slots];
        let mut cells = Vec::with_capacity(actions.len() * slots);
        for action in &actions {
            for (group, device) in devices.iter().enumerate() {
                let row = device
                    .position(action)
                    .ok_or_else(|| BindingError::MissingAction {
                        group,
                        action: action.clone(),
                    })?;
                cells.push((group, row));
            }
        }
        Ok(Self {
            actions,
            slots,
            cells,
        })
    }

    fn cursor(&self) -> GridCursor {
        GridCursor::new(self.actions.len(), self.slots)
    }

    fn column(&self, column: usize) -> &[(usize, usize)] {
        &self.cells[column * self.slots..(column + 1) * self.slots]
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Drives the key binding menu for one visit.
pub struct RebindSession<H: HostInput, P: BindingPersistence> {
    host: H,
    persistence: P,
    config: MenuConfig,
    store: BindingStore,
    layout: MenuLayout,
    cursor: GridCursor,
    stage: Stage,
}

impl<H: HostInput, P: BindingPersistence> RebindSession<H, P> {
    /// Opens the menu on the host's current bindings.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Binding`] if the snapshot has duplicate actions,
    /// or a visible device lacks a binding for one of the first device's actions.
    pub fn new(host: H, persistence: P, config: MenuConfig) -> Result<Self, SessionError> {
        let (store, layout) = Self::load(&host, config.rows_per_group())?;
        let cursor = layout.cursor();
        debug!(
            actions = layout.actions.len(),
            slots = layout.slots,
            "key binding menu opened"
        );
        Ok(Self {
            host,
            persistence,
            config,
            store,
            layout,
            cursor,
            stage: Stage::Browsing,
        })
    }

    /// Handles one frame.
    ///
    /// Returns the feedback to play, or `None` if nothing happened.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Closed`] once the menu was closed or finished.
    /// - [`SessionError::Binding`] if the store rejects an operation, or the
    ///   snapshot taken after a hot-plug is invalid.  The menu is closed in
    ///   the latter case.
    pub fn update(&mut self, command: Option<MenuCommand>) -> Result<Option<Feedback>, SessionError> {
        if self.stage == Stage::Closed {
            return Err(SessionError::Closed);
        }
        if self.host.devices_changed() {
            self.reset()?;
            return Ok(Some(Feedback::Reset));
        }
        match self.stage {
            Stage::Browsing => self.update_browsing(command),
            Stage::Capturing(handle) => self.update_capturing(handle),
            Stage::Closed => Err(SessionError::Closed),
        }
    }

    /// Closes the menu and saves the bindings if any changed.
    ///
    /// An open capture is cancelled first.  Calling `finish` again saves
    /// nothing more.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Binding`] wrapping the persistence failure; the
    /// changes stay pending, so a later `finish` retries.
    pub fn finish(&mut self) -> Result<FlushOutcome, SessionError> {
        if let Stage::Capturing(handle) = self.stage {
            self.host.exit_raw_capture_mode();
            if self.store.active_capture() == Some(handle) {
                self.store.cancel_capture(handle)?;
            }
        }
        self.stage = Stage::Closed;
        Ok(self.store.flush_changes(&mut self.persistence)?)
    }

    /// Display names of the grid, one inner `Vec` per action column with one
    /// entry per device slot.
    ///
    /// The box being captured is shown empty.
    pub fn labels(&self) -> Vec<Vec<String>> {
        let capturing = match self.stage {
            Stage::Capturing(handle) => Some((handle.group(), handle.row())),
            _ => None,
        };
        (0..self.layout.actions.len())
            .map(|column| {
                self.layout
                    .column(column)
                    .iter()
                    .map(|&(group, row)| {
                        if capturing == Some((group, row)) {
                            return String::new();
                        }
                        self.store
                            .binding(group, row)
                            .map(|b| b.display_name.clone())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    /// Action names in column order.
    pub fn action_labels(&self) -> Vec<&str> {
        self.layout.actions.iter().map(String::as_str).collect()
    }

    /// Labels of the devices shown, in slot order.
    pub fn device_labels(&self) -> Vec<&str> {
        self.store.groups()[..self.layout.slots]
            .iter()
            .map(|g| g.label.as_str())
            .collect()
    }

    /// Help line for the current stage.
    pub fn prompt(&self) -> &str {
        match self.stage {
            Stage::Capturing(_) => &self.config.enter_prompt,
            _ => &self.config.choose_prompt,
        }
    }

    /// Title line: the connected gamepad's name, or the keyboard label when
    /// only the keyboard is present, followed by the heading text.
    pub fn heading(&self) -> String {
        let device = self
            .store
            .groups()
            .iter()
            .map(|g| g.label.as_str())
            .find(|label| *label != self.config.keyboard_label)
            .unwrap_or(self.config.keyboard_label.as_str());
        format!("{device} - {}", self.config.heading)
    }

    pub fn cursor(&self) -> GridCursor {
        self.cursor
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Binding slots shown under each action: the configured row count,
    /// capped at the number of devices.
    pub fn slot_rows(&self) -> usize {
        self.layout.slots
    }

    /// The store behind the menu, for inspection.
    pub fn store(&self) -> &BindingStore {
        &self.store
    }

    // ── Stage handlers ────────────────────────────────────────────────────────

    fn update_browsing(&mut self, command: Option<MenuCommand>) -> Result<Option<Feedback>, SessionError> {
        let Some(command) = command else {
            return Ok(None);
        };
        let feedback = match command {
            MenuCommand::Up => self.move_cursor(0, -1),
            MenuCommand::Down => self.move_cursor(0, 1),
            MenuCommand::Left => self.move_cursor(-1, 0),
            MenuCommand::Right => self.move_cursor(1, 0),
            MenuCommand::Delete => {
                if let Some((group, row)) = self.selected() {
                    self.store.clear(group, row)?;
                }
                Feedback::Buzzer
            }
            MenuCommand::Confirm => {
                let Some((group, row)) = self.selected() else {
                    return Ok(Some(Feedback::Buzzer));
                };
                let handle = self.store.begin_capture(group, row)?;
                self.host.enter_raw_capture_mode();
                self.stage = Stage::Capturing(handle);
                Feedback::Ok
            }
            MenuCommand::Cancel => {
                self.stage = Stage::Closed;
                debug!("key binding menu closed");
                Feedback::Cancel
            }
        };
        Ok(Some(feedback))
    }

    fn update_capturing(&mut self, handle: CaptureHandle) -> Result<Option<Feedback>, SessionError> {
        let Some(source) = self.host.poll_raw_input_event() else {
            return Ok(None);
        };

        let (result, feedback) = if self.config.cancel_sources.contains(&source) {
            (self.store.cancel_capture(handle), Feedback::Cancel)
        } else {
            (self.store.commit_capture(handle, source), Feedback::Ok)
        };
        self.host.exit_raw_capture_mode();
        self.stage = Stage::Browsing;
        result?;
        Ok(Some(feedback))
    }

    fn selected(&self) -> Option<(usize, usize)> {
        if self.cursor.is_empty() {
            return None;
        }
        self.layout.cells.get(self.cursor.index()).copied()
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) -> Feedback {
        self.cursor.move_by(dx, dy);
        Feedback::Cursor
    }

    fn reset(&mut self) -> Result<(), SessionError> {
        if matches!(self.stage, Stage::Capturing(_)) {
            self.host.exit_raw_capture_mode();
        }
        self.store.discard_changes();
        // Stays closed if the new devices cannot be laid out.
        self.stage = Stage::Closed;

        let (store, layout) = Self::load(&self.host, self.config.rows_per_group()).map_err(|e| {
            warn!(error = %e, "input devices changed; key binding menu cannot be rebuilt");
            e
        })?;
        self.cursor = layout.cursor();
        self.store = store;
        self.layout = layout;
        self.stage = Stage::Browsing;
        info!(groups = self.store.group_count(), "input devices changed; key binding menu reset");
        Ok(())
    }

    fn load(host: &H, rows: usize) -> Result<(BindingStore, MenuLayout), BindingError> {
        let store = BindingStore::new(host.current_bindings_snapshot())?;
        let layout = MenuLayout::build(&store, rows)?;
        Ok((store, layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::host_input::mock::MockHostInput;
    use keybind_core::domain::binding::mouse;
    use keybind_core::domain::defaults::{default_gamepad_group, default_keyboard_group, ACTIONS};
    use keybind_core::{Binding, BindingGroup, InputSource, PersistError, Scancode};
    use mockall::mock;
    use std::collections::BTreeSet;

    mock! {
        pub Persistence {}
        impl BindingPersistence for Persistence {
            fn save_bindings(&mut self, groups: &[BindingGroup]) -> Result<(), PersistError>;
        }
    }

    fn no_saves() -> MockPersistence {
        let mut persistence = MockPersistence::new();
        persistence.expect_save_bindings().times(0);
        persistence
    }

    fn two_rows() -> MenuConfig {
        MenuConfig {
            visible_rows: Some(2),
            ..MenuConfig::default()
        }
    }

    fn session_with(
        host: &MockHostInput,
        persistence: MockPersistence,
    ) -> RebindSession<MockHostInput, MockPersistence> {
        RebindSession::new(host.clone(), persistence, two_rows()).expect("session opens")
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_session_starts_browsing_at_origin() {
        let host = MockHostInput::with_default_devices();
        let session = session_with(&host, no_saves());

        assert_eq!(session.stage(), Stage::Browsing);
        assert_eq!(session.cursor().index(), 0);
        assert_eq!(session.prompt(), "Please select a key to edit");
        assert_eq!(session.action_labels(), ACTIONS);
        let labels = session.labels();
        assert_eq!(labels.len(), 14);
        assert_eq!(labels[0], vec!["Up", "Axis 1-"]);
        assert_eq!(labels[1], vec!["Down", "Axis 1+"]);
    }

    #[test]
    fn test_slots_follow_screen_width_when_not_fixed() {
        let host = MockHostInput::new(vec![
            default_keyboard_group(),
            default_gamepad_group("Gamepad 1"),
            default_gamepad_group("Gamepad 2"),
        ]);
        let config = MenuConfig {
            screen_width: 800,
            ..MenuConfig::default()
        };

        let session = RebindSession::new(host, no_saves(), config).unwrap();

        assert_eq!(session.slot_rows(), 3);
        assert_eq!(session.labels()[0].len(), 3);
        assert_eq!(session.device_labels(), vec!["Keyboard", "Gamepad 1", "Gamepad 2"]);
    }

    #[test]
    fn test_slots_are_capped_at_device_count() {
        let host = MockHostInput::with_default_devices();
        let config = MenuConfig {
            screen_width: 1024,
            ..MenuConfig::default()
        };

        let session = RebindSession::new(host, no_saves(), config).unwrap();

        assert_eq!(session.slot_rows(), 2);
        assert_eq!(session.cursor().len(), 28);
    }

    #[test]
    fn test_new_rejects_device_without_bindings() {
        let host = MockHostInput::new(vec![default_keyboard_group(), BindingGroup::new("Gamepad 1")]);

        let result = RebindSession::new(host, no_saves(), two_rows());

        assert!(matches!(
            result,
            Err(SessionError::Binding(BindingError::RowsExceedGroup { group: 1, .. }))
        ));
    }

    #[test]
    fn test_new_rejects_device_missing_an_action() {
        // Arrange: same row count as the keyboard, but "Z" renamed
        let bindings = ACTIONS
            .iter()
            .map(|a| Binding::new(if *a == "Z" { "Start" } else { *a }, InputSource::None))
            .collect();
        let pad = BindingGroup::with_bindings("Gamepad 1", bindings).unwrap();
        let host = MockHostInput::new(vec![default_keyboard_group(), pad]);

        // Act
        let result = RebindSession::new(host, no_saves(), two_rows());

        // Assert
        assert!(matches!(
            result,
            Err(SessionError::Binding(BindingError::MissingAction { group: 1, ref action }))
                if action == "Z"
        ));
    }

    #[test]
    fn test_pads_may_list_actions_in_another_order() {
        let mut bindings: Vec<Binding> = default_gamepad_group("Pad").bindings().to_vec();
        bindings.reverse();
        let pad = BindingGroup::with_bindings("Pad", bindings).unwrap();
        let host = MockHostInput::new(vec![default_keyboard_group(), pad]);

        let session = RebindSession::new(host, no_saves(), two_rows()).unwrap();

        assert_eq!(session.labels()[0], vec!["Up", "Axis 1-"]);
        assert_eq!(session.labels()[13], vec!["D", "JS 5"]);
    }

    #[test]
    fn test_heading_prefers_gamepad_name() {
        let host = MockHostInput::with_default_devices();
        assert_eq!(session_with(&host, no_saves()).heading(), "Gamepad 1 - Key Bindings");

        let keyboard_only = MockHostInput::new(vec![default_keyboard_group()]);
        let session = session_with(&keyboard_only, no_saves());
        assert_eq!(session.heading(), "Keyboard - Key Bindings");
        assert_eq!(session.slot_rows(), 1);
    }

    // ── Browsing ──────────────────────────────────────────────────────────────

    #[test]
    fn test_arrows_move_cursor_cyclically() {
        // Arrange
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());

        // Act
        let feedback = session.update(Some(MenuCommand::Up)).unwrap();

        // Assert: slot 0 wraps to the last device slot.
        assert_eq!(feedback, Some(Feedback::Cursor));
        assert_eq!((session.cursor().column(), session.cursor().row()), (0, 1));

        // Column 0 wraps to the last action.
        session.update(Some(MenuCommand::Left)).unwrap();
        assert_eq!((session.cursor().column(), session.cursor().row()), (13, 1));
        assert_eq!(session.cursor().index(), 27);
    }

    #[test]
    fn test_cursor_reaches_every_action_on_every_device() {
        // Arrange
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());
        let mut reached = BTreeSet::new();

        // Act: one full lap right on each slot
        for _ in 0..session.slot_rows() {
            for _ in 0..ACTIONS.len() {
                let (column, row) = (session.cursor().column(), session.cursor().row());
                reached.insert((
                    session.action_labels()[column].to_string(),
                    session.device_labels()[row].to_string(),
                ));
                session.update(Some(MenuCommand::Right)).unwrap();
            }
            session.update(Some(MenuCommand::Down)).unwrap();
        }

        // Assert
        assert_eq!(reached.len(), ACTIONS.len() * 2);
        let actions: BTreeSet<_> = reached.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(actions, ACTIONS.iter().copied().collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_confirm_on_last_action_captures_that_action() {
        let host = MockHostInput::with_default_devices();
        let mut persistence = MockPersistence::new();
        persistence
            .expect_save_bindings()
            .withf(|groups| groups[1].get("Z").unwrap().display_name == "JS 11")
            .times(1)
            .returning(|_| Ok(()));
        let mut session = session_with(&host, persistence);

        session.update(Some(MenuCommand::Left)).unwrap();
        session.update(Some(MenuCommand::Down)).unwrap();
        session.update(Some(MenuCommand::Confirm)).unwrap();
        host.inject_event(InputSource::GamepadButton { id: 11 });
        session.update(None).unwrap();

        assert_eq!(session.labels()[13], vec!["D", "JS 11"]);
        assert_eq!(session.finish().unwrap(), FlushOutcome::Saved { rows: 1 });
    }

    #[test]
    fn test_no_command_does_nothing() {
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());
        assert_eq!(session.update(None).unwrap(), None);
    }

    #[test]
    fn test_delete_clears_selected_slot_with_buzzer() {
        // Arrange
        let host = MockHostInput::with_default_devices();
        let mut persistence = MockPersistence::new();
        persistence
            .expect_save_bindings()
            .withf(|groups| groups[1].bindings()[0].source.is_none())
            .times(1)
            .returning(|_| Ok(()));
        let mut session = session_with(&host, persistence);

        // Act: "Up" on the gamepad
        session.update(Some(MenuCommand::Down)).unwrap();
        let feedback = session.update(Some(MenuCommand::Delete)).unwrap();
        let outcome = session.finish().unwrap();

        // Assert
        assert_eq!(feedback, Some(Feedback::Buzzer));
        assert_eq!(session.labels()[0], vec!["Up", ""]);
        assert_eq!(outcome, FlushOutcome::Saved { rows: 1 });
    }

    #[test]
    fn test_confirm_and_delete_on_empty_grid_only_buzz() {
        let host = MockHostInput::new(Vec::new());
        let mut session = session_with(&host, no_saves());

        assert_eq!(session.update(Some(MenuCommand::Confirm)).unwrap(), Some(Feedback::Buzzer));
        assert_eq!(session.update(Some(MenuCommand::Delete)).unwrap(), Some(Feedback::Buzzer));
        assert_eq!(session.stage(), Stage::Browsing);
        assert!(session.labels().is_empty());
    }

    #[test]
    fn test_cancel_closes_menu() {
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());

        assert_eq!(session.update(Some(MenuCommand::Cancel)).unwrap(), Some(Feedback::Cancel));
        assert_eq!(session.stage(), Stage::Closed);
        assert_eq!(session.update(None), Err(SessionError::Closed));
    }

    // ── Capturing ─────────────────────────────────────────────────────────────

    #[test]
    fn test_confirm_enters_raw_capture_mode() {
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());

        let feedback = session.update(Some(MenuCommand::Confirm)).unwrap();

        assert_eq!(feedback, Some(Feedback::Ok));
        assert!(matches!(session.stage(), Stage::Capturing(_)));
        assert!(host.is_capturing());
        assert_eq!(session.prompt(), "Please enter a key now");
        assert_eq!(session.labels()[0][0], "", "captured box is blanked");
    }

    #[test]
    fn test_capture_waits_for_raw_event_and_ignores_commands() {
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());
        session.update(Some(MenuCommand::Confirm)).unwrap();

        let feedback = session.update(Some(MenuCommand::Down)).unwrap();

        assert_eq!(feedback, None);
        assert!(matches!(session.stage(), Stage::Capturing(_)));
        assert_eq!(session.cursor().row(), 0);
    }

    #[test]
    fn test_raw_event_commits_capture() {
        // Arrange
        let host = MockHostInput::with_default_devices();
        let mut persistence = MockPersistence::new();
        persistence
            .expect_save_bindings()
            .withf(|groups| groups[0].bindings()[0].display_name == "Keypad 8")
            .times(1)
            .returning(|_| Ok(()));
        let mut session = session_with(&host, persistence);
        session.update(Some(MenuCommand::Confirm)).unwrap();

        // Act
        host.inject_event(InputSource::KeyboardKey {
            code: Scancode::Kp8.as_u16(),
        });
        let feedback = session.update(None).unwrap();

        // Assert
        assert_eq!(feedback, Some(Feedback::Ok));
        assert_eq!(session.stage(), Stage::Browsing);
        assert!(!host.is_capturing());
        assert_eq!(session.labels()[0][0], "Keypad 8");
        assert_eq!(session.finish().unwrap(), FlushOutcome::Saved { rows: 1 });
    }

    #[test]
    fn test_mouse_click_cancels_capture_without_change() {
        // Arrange
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());
        session.update(Some(MenuCommand::Confirm)).unwrap();

        // Act
        host.inject_event(InputSource::MouseButton { id: mouse::RIGHT });
        let feedback = session.update(None).unwrap();

        // Assert
        assert_eq!(feedback, Some(Feedback::Cancel));
        assert_eq!(session.stage(), Stage::Browsing);
        assert_eq!(session.labels()[0][0], "Up");
        assert_eq!(host.exit_count(), 1);
        assert_eq!(session.finish().unwrap(), FlushOutcome::Clean);
    }

    #[test]
    fn test_middle_click_is_bound_not_cancelled() {
        let host = MockHostInput::with_default_devices();
        let mut persistence = MockPersistence::new();
        persistence.expect_save_bindings().times(1).returning(|_| Ok(()));
        let mut session = session_with(&host, persistence);
        session.update(Some(MenuCommand::Confirm)).unwrap();

        host.inject_event(InputSource::MouseButton { id: mouse::MIDDLE });
        session.update(None).unwrap();

        assert_eq!(session.labels()[0][0], "Mouse Middle");
        session.finish().unwrap();
    }

    // ── Hot-plug ──────────────────────────────────────────────────────────────

    #[test]
    fn test_device_change_discards_changes_and_resets() {
        // Arrange
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());
        session.update(Some(MenuCommand::Right)).unwrap();
        session.update(Some(MenuCommand::Delete)).unwrap();
        session.update(Some(MenuCommand::Confirm)).unwrap();
        host.set_snapshot(vec![default_keyboard_group()]);
        host.signal_devices_changed();

        // Act
        let feedback = session.update(None).unwrap();

        // Assert
        assert_eq!(feedback, Some(Feedback::Reset));
        assert_eq!(session.stage(), Stage::Browsing);
        assert_eq!(session.cursor().index(), 0);
        assert_eq!(session.device_labels(), vec!["Keyboard"]);
        assert_eq!(session.slot_rows(), 1);
        assert!(!session.store().is_dirty());
        assert!(!host.is_capturing());
        assert_eq!(host.snapshot_count(), 2);
        assert_eq!(session.finish().unwrap(), FlushOutcome::Clean);
    }

    #[test]
    fn test_failed_rebuild_after_device_change_closes_menu() {
        // Arrange: capture open, then a pad without bindings is plugged in
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());
        session.update(Some(MenuCommand::Delete)).unwrap();
        session.update(Some(MenuCommand::Confirm)).unwrap();
        host.set_snapshot(vec![default_keyboard_group(), BindingGroup::new("Gamepad 2")]);
        host.signal_devices_changed();

        // Act
        let result = session.update(None);

        // Assert
        assert!(matches!(
            result,
            Err(SessionError::Binding(BindingError::RowsExceedGroup { group: 1, .. }))
        ));
        assert_eq!(session.stage(), Stage::Closed);
        assert!(!host.is_capturing());
        assert_eq!(session.update(None), Err(SessionError::Closed));
        assert_eq!(session.finish().unwrap(), FlushOutcome::Clean);
    }

    // ── finish ────────────────────────────────────────────────────────────────

    #[test]
    fn test_finish_without_changes_never_saves() {
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());
        session.update(Some(MenuCommand::Down)).unwrap();

        assert_eq!(session.finish().unwrap(), FlushOutcome::Clean);
    }

    #[test]
    fn test_finish_cancels_open_capture() {
        let host = MockHostInput::with_default_devices();
        let mut session = session_with(&host, no_saves());
        session.update(Some(MenuCommand::Confirm)).unwrap();

        session.finish().unwrap();

        assert!(!host.is_capturing());
        assert_eq!(session.stage(), Stage::Closed);
        assert_eq!(session.store().active_capture(), None);
    }

    #[test]
    fn test_finish_saves_at_most_once() {
        let host = MockHostInput::with_default_devices();
        let mut persistence = MockPersistence::new();
        persistence.expect_save_bindings().times(1).returning(|_| Ok(()));
        let mut session = session_with(&host, persistence);
        session.update(Some(MenuCommand::Delete)).unwrap();

        assert_eq!(session.finish().unwrap(), FlushOutcome::Saved { rows: 1 });
        assert_eq!(session.finish().unwrap(), FlushOutcome::Clean);
    }

    #[test]
    fn test_finish_failure_keeps_changes_pending() {
        let host = MockHostInput::with_default_devices();
        let mut persistence = MockPersistence::new();
        persistence
            .expect_save_bindings()
            .times(1)
            .returning(|_| Err(PersistError("read-only".to_string())));
        let mut session = session_with(&host, persistence);
        session.update(Some(MenuCommand::Delete)).unwrap();

        let err = session.finish().unwrap_err();

        assert_eq!(
            err,
            SessionError::Binding(BindingError::Persist(PersistError("read-only".to_string())))
        );
        assert!(session.store().is_dirty());
    }
}
