pub mod grid;
pub mod navigation;
pub mod parsing;
pub mod title;
