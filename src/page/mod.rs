pub mod document;

pub use document::{Content, ElementUpdate, ElementView, Page};
