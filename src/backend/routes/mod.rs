//! Route Configuration Module
//!
//! - **`router`** - main router creation, `/health` and tracing
//! - **`chat_routes`** - chat HTTP endpoints and the realtime hub
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports and documentation
//! ├── router.rs      - Main router creation
//! └── chat_routes.rs - Chat endpoints
//! ```

/// Main router creation
pub mod router;

/// Chat routes
pub mod chat_routes;

pub use router::create_router;
