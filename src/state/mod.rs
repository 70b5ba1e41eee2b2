/// State management module
///
/// This module handles all session state, including:
/// - Shared data structures (data.rs)
/// - The classification session state machine (session.rs)
/// - The static species metadata table (species.rs)

pub mod data;
pub mod session;
pub mod species;
