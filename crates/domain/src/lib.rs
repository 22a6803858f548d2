//! # flowkit-domain
//!
//! Pure domain model for the flowkit workflow actions.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **entity types** (runtime descriptors such as `Person` or `Group`)
//! - Define the loadable **entities** (people, aliases, groups, roles, members)
//! - Define the **workflow object model** (workflows, activities, actions, logs)
//! - Define **attribute definitions** (which object owns a value, what field type it has)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod attribute;
pub mod entity;
pub mod entity_type;
pub mod group;
pub mod person;
pub mod workflow;
