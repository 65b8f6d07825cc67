pub mod select_title;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    None,
    /// Run the title at this catalog index and wait for it to exit.
    Launch(usize),
    Exit,
}
