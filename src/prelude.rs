//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to load, navigate and edit a playbook.
//!
//! ```rust,no_run
//! use trilhas::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let raw: Vec<ApiNode> = serde_json::from_str(&std::fs::read_to_string("playbook.json")?)?;
//! let tree = normalize(raw);
//!
//! let mut nav = Navigator::new();
//! nav.select_by_id(&tree, 42);
//! println!("{}", TreeFormatter::render(&nav.visible(&tree), &nav));
//! # Ok(())
//! # }
//! ```

// Canonical model and normalizer
pub use crate::model::{
    Attachment, AttachmentKind, DecisionNode, GoTo, NodeId, Product, ProductId, ProductKind,
    ProductRef, Submenu, find, flatten, normalize, resolve_go_to,
};

// Wire shapes
pub use crate::api::ApiNode;

// Gateway
pub use crate::config::GatewayConfig;
pub use crate::gateway::{
    DecisionPatch, FileUpload, Gateway, HttpGateway, NewDecision, ProductInput, ProductLink,
    SubmenuFields,
};

// View state and editing
pub use crate::feedback::Feedback;
pub use crate::navigation::{NavigationEvent, Navigator};
pub use crate::render::TreeFormatter;
pub use crate::reorder::{
    DragOutcome, ReorderController, ReorderOutcome, RollbackPolicy, SiblingGroup,
};
pub use crate::search::{expansions_for, filter};
pub use crate::store::{ProductCatalog, TrilhaStore};

// Error types
pub use crate::error::{ConfigError, GatewayError, ReorderError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
