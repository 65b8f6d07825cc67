pub mod directive;
pub mod index_file;
pub mod title_file;
