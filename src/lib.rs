mod r#impl;
pub(crate) use r#impl::data;
pub(crate) use r#impl::domain;
pub use r#impl::exports::*;

pub mod config;
pub mod errors;
pub mod util;
