//! Schemagraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the schemagraph
//! library and CLI. It includes:
//!
//! - **Schema**: The serde model of a database schema export ([`schema`] module)
//! - **Model**: Derived graph nodes and typed edges ([`model`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)

pub mod color;
pub mod geometry;
pub mod model;
pub mod schema;
