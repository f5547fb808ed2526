//! Topograph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Topograph
//! builder and its renderers:
//!
//! - **Identifiers**: String-interned identifiers ([`identifier::Id`])
//! - **Colors**: CSS color parsing for styling ([`color::Color`])
//! - **Semantic**: The immutable diagram graph model ([`semantic`] module)

pub mod color;
pub mod identifier;
pub mod semantic;
