//! Loads categories and products from the hosted data service.

mod binder;
mod rows;
mod source;

pub use binder::use_catalog;
