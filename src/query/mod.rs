//! Search and trending query driving.

pub mod controller;

pub use controller::{QueryController, QueryMessages};
