//! keybind-session library entry point.
//!
//! Runs the key binding menu on top of `keybind-core`:
//!
//! - **`application`** – [`RebindSession`], the per-frame menu state machine.
//! - **`infrastructure`** – the [`HostInput`] engine adapter trait and its mock,
//!   TOML storage for the menu config and saved bindings, and log setup.
//!
//! # Typical host loop
//!
//! ```no_run
//! use keybind_session::infrastructure::host_input::mock::MockHostInput;
//! use keybind_session::infrastructure::logging::init_logging;
//! use keybind_session::infrastructure::storage::bindings::TomlBindingPersistence;
//! use keybind_session::infrastructure::storage::config::{load_menu_config, menu_config_path};
//! use keybind_session::{MenuCommand, RebindSession, Stage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_menu_config(&menu_config_path()?)?;
//! init_logging(&config.log_level);
//!
//! let host = MockHostInput::with_default_devices();
//! let persistence = TomlBindingPersistence::in_config_dir()?;
//! let mut session = RebindSession::new(host, persistence, config)?;
//!
//! while session.stage() != Stage::Closed {
//!     // One engine frame: read the player's menu command, draw `labels()`.
//!     session.update(Some(MenuCommand::Cancel))?;
//! }
//! session.finish()?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod infrastructure;

pub use application::rebind_session::{Feedback, MenuCommand, RebindSession, SessionError, Stage};
pub use infrastructure::host_input::HostInput;
