//! Lineage Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Lineage diagram
//! engine. It includes:
//!
//! - **Identifiers**: Interned qualified type names ([`identifier::TypeId`])
//! - **Geometry**: Points, sizes and bounds ([`geometry`] module)
//! - **Semantic**: The type-hierarchy input model ([`semantic`] module)
//! - **Draw**: Shape elements and layered SVG output ([`draw`] module)

pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod semantic;
