pub mod jikan;

pub use jikan::JikanAdapter;
