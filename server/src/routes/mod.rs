pub mod api;
pub mod payments;
