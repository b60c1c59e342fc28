//! Binding domain: input sources, the binding store, and menu navigation.
//!
//! This module contains pure logic with no engine, device, or file-system
//! dependencies.  Persistence is reached only through the
//! [`store::BindingPersistence`] trait, so everything here can be unit-tested
//! in isolation.

/// Input sources, bindings, and device groups.
pub mod binding;
/// Stock actions and default device bindings.
pub mod defaults;
/// Cyclic grid navigation.
pub mod navigation;
/// The binding store and its capture protocol.
pub mod store;
