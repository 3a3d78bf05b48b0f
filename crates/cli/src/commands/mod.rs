//! Command implementations.

mod info;
mod validate;
mod view;

pub use info::run_info;
pub use validate::run_validate;
pub use view::run_view;
