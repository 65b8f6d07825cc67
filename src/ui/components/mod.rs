pub mod title_grid;
