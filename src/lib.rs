//! # Trilhas - Sales Playbook Client Core
//!
//! **Trilhas** is the client-side core of a sales playbook: a hierarchical tree of
//! steps ("trilhas") that a sales rep walks through, each step carrying documents,
//! submenus and recommended products. It talks to the playbook backend over
//! REST/JSON and multipart, and holds everything a front end needs around the tree.
//!
//! ## Core Workflow
//!
//! 1.  **Configure**: Resolve a [`config::GatewayConfig`] once at startup (usually from `API_BASE_URL`).
//! 2.  **Load**: Build an [`gateway::HttpGateway`] and load the tree into a [`store::TrilhaStore`]. The raw payload is normalized into canonical [`model::DecisionNode`]s.
//! 3.  **Navigate**: Drive a [`navigation::Navigator`] with clicks, searches and jumps; render with [`render::TreeFormatter`].
//! 4.  **Edit**: Create, update and delete steps through the store (it reloads after each change) and reorder siblings with the optimistic [`reorder::ReorderController`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trilhas::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = GatewayConfig::new("http://localhost:8000/api")?;
//!     let gateway = HttpGateway::builder(config).build()?;
//!
//!     let mut store = TrilhaStore::new();
//!     tokio_test::block_on(store.reload(&gateway))?;
//!
//!     let mut nav = Navigator::new();
//!     let visible = nav.set_search_term(store.tree(), "qualificação");
//!     println!("{}", TreeFormatter::render(&visible, &nav));
//!
//!     // Move the first root step to the end of the list.
//!     let last = store.tree().len().saturating_sub(1);
//!     let mut reorder = ReorderController::new(RollbackPolicy::KeepOptimistic);
//!     let dropped = DragOutcome::Dropped { group: SiblingGroup::Root, from: 0, to: last };
//!     match tokio_test::block_on(reorder.run(&mut store, &gateway, dropped))? {
//!         ReorderOutcome::Failed(err) => eprintln!("{}", err.user_message()),
//!         _ => println!("saved"),
//!     }
//!     // The store reloaded; re-expand the search matches in the new tree.
//!     println!("{}", TreeFormatter::render(&nav.refresh(store.tree()), &nav));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod feedback;
pub mod gateway;
pub mod model;
pub mod navigation;
pub mod prelude;
pub mod render;
pub mod reorder;
pub mod search;
pub mod store;
