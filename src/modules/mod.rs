pub mod catalog;
pub mod franchise;
