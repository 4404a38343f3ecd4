// Content-tree storage and provider input files

pub mod catalog;
pub mod csv;
pub mod json;

pub use catalog::FsCatalog;
