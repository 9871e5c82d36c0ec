//! Server Module
//!
//! Server initialization and application state.
//!
//! # Architecture
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - database loading
//! - **`init`** - wiring stores, services and the router together
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Database loading and migrations
//! └── init.rs   - Server initialization and app creation
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use lostfound_chat::backend::server::create_app;
//! use lostfound_chat::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::{build_state, create_app, seeded_directory};
pub use state::AppState;
