//! Common infrastructure shared across the passes

mod diagnostic;
mod error;

pub use diagnostic::{Diagnostic, Diagnostics, VoidSite};
pub use error::{SemaError, SemaResult};
