//! # treewalker
//!
//! Asynchronous depth-first tree walker.
//!
//! A [`Walker`] visits every descendant of a root node, calling an *enter*
//! hook before a node's children and a *leave* hook after them. Hooks return
//! a [`Signal`] that steers the traversal:
//!
//! - [`Signal::Continue`] - keep going
//! - [`Signal::Abort`] - stop the whole walk, which resolves to
//!   [`WalkOutcome::Aborted`]
//! - [`Signal::SkipChildren`] - (enter only) do not descend, go straight to leave
//! - [`Signal::SkipSiblings`] - finish this node, then drop its remaining siblings
//!
//! The tree itself is opaque: nodes are only ever handed to the hooks, and
//! children come from a children hook or the [`Children`] trait. Mutable
//! traversal state lives in a caller-owned context passed as `&mut C` to
//! every hook.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::{Value, json};
//! use treewalker::{FutureExt, Signal, Walker};
//!
//! #[derive(Debug)]
//! struct Failed;
//!
//! let tree = json!({
//!     "children": [
//!         { "id": "a", "children": [{ "id": "a1" }, { "id": "a2" }] },
//!         { "id": "b" }
//!     ]
//! });
//!
//! let walker = Walker::<&Value, String, Failed>::builder()
//!     .on_enter(|node, trace| {
//!         async move {
//!             trace.push('+');
//!             trace.push_str(node["id"].as_str().unwrap_or("?"));
//!             Ok(Signal::Continue)
//!         }
//!         .boxed_local()
//!     })
//!     .on_leave_sync(|node, trace| {
//!         trace.push('-');
//!         trace.push_str(node["id"].as_str().unwrap_or("?"));
//!         Ok(Signal::Continue)
//!     })
//!     .build();
//!
//! let mut trace = String::new();
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! runtime.block_on(walker.walk(&&tree, &mut trace)).unwrap();
//!
//! assert_eq!(trace, "+a+a1-a1+a2-a2-a+b-b");
//! ```

mod children;
mod config;
mod error;
mod signal;
pub mod walker;

pub use children::Children;
pub use config::WalkConfig;
pub use error::SignalError;
pub use signal::{Signal, WalkOutcome};
pub use walker::{HookFuture, Walker, WalkerBuilder};

// Re-exported for writing asynchronous hooks.
pub use futures_util::future::{FutureExt, LocalBoxFuture};
