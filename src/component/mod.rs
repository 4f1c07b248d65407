//! Feature components
//!
//! Each submodule implements one feature with its own pipeline and helpers

pub mod contact_sheet_generator;

pub use contact_sheet_generator::ContactSheetGenerator;
