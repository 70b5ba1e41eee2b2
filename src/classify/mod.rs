/// Classification module
///
/// - `client.rs` - HTTP client for the remote classification provider
/// - `interpret.rs` - Maps provider replies to display-ready results

pub mod client;
pub mod interpret;

pub use client::ProviderClient;
pub use interpret::{display_label, DisplayResult};
