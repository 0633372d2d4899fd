//! # Router Module
//!
//! Routers group registrations before they reach an [`App`](crate::App).
//!
//! ## Overview
//!
//! A [`Router`] records `(path, method) -> handler` entries relative to its own
//! base path and may nest other routers. Nothing is compiled at this stage;
//! mounting a router on an application flattens it:
//!
//! ```text
//! App(prefix "/api")
//!  └─ Router("/v1", tags ["v1"])
//!      ├─ GET  /items          -> /v1/items   tags [v1]
//!      └─ Router("/admin")
//!          └─ POST /users      -> /v1/admin/users   tags [v1]
//! ```
//!
//! Paths are concatenated as-is, so bases should start with `/` and not end
//! with one. Routes that leave their tags unspecified take the nearest
//! non-empty router tags; see [`TagSpec`].
//!
//! ## Composition rules
//!
//! - Registering the same `(path, method)` twice keeps the last handler.
//! - Routers have an identity. Adding a router to itself, or to one of its
//!   own descendants, fails with [`Error::SelfComposition`] or
//!   [`Error::CyclicComposition`].
//! - Adding the same router twice keeps one copy.
//!
//! [`Error::SelfComposition`]: crate::Error::SelfComposition
//! [`Error::CyclicComposition`]: crate::Error::CyclicComposition

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{RouteConfig, RouteEntry, Router, Routes, TagSpec};
