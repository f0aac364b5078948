//! Model/controller convenience layer built on the core.
//!
//! # Responsibility
//! - `Model`: an observable options snapshot updated through deep merge.
//! - `Controller`: a named action table delivering callback queues.
//!
//! No view, no rendering, no event binding: those live with the host UI.

pub mod controller;
pub mod model;
