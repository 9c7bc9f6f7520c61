//! Heuristic PDDL structure checks
//!
//! Scans model output for domain/problem/action markers and pulls out the
//! domain, problem and plan sections. Nothing here checks that a plan is
//! executable against its domain.

mod components;
mod validate;

pub use components::{extract_components, PddlComponents};
pub use validate::{validate, ValidationRecord};
