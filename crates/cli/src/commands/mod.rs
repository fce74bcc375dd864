//! Command implementations.

mod publish;
mod validate;

pub use publish::run_publish;
pub use validate::run_validate;
