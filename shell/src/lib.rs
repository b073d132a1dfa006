//! Application shell for the site: theme switching, debug toggle, self-heal
//! and tips, built on a structured-result substrate.
//!
//! The crate enforces a strict separation:
//!
//! - **[`core`]**: Outcome values, validators and namespaced loggers. Pure
//!   apart from the logger's echo sink, fully testable in isolation.
//! - **[`io`]**: Side-effecting helpers (configuration on disk).
//!
//! Feature modules ([`theme`], [`debug_toggle`], [`self_heal`],
//! [`suggestions`]) work against the capability traits in [`dom`]; [`app`]
//! wires them to a page.

pub mod app;
pub mod core;
pub mod debug_toggle;
pub mod dom;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod self_heal;
pub mod suggestions;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod theme;
