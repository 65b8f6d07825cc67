use crate::core::input::MenuCommand;
use crate::game::grid::{GridModel, GridSettings};
use crate::game::parsing::index_file::Catalog;
use crate::screens::ScreenAction;
use crate::ui::actors::Actor;
use crate::ui::components::title_grid::{self, TitleGridParams};
use log::{debug, info};
use std::path::PathBuf;

pub struct State {
    pub root: PathBuf,
    pub settings: GridSettings,
    pub grid: GridModel,
    viewport_w: u32,
    viewport_h: u32,
}

pub fn init(catalog: Catalog, viewport_w: u32, viewport_h: u32) -> State {
    info!(
        "Title grid ready: {} titles, {} columns.",
        catalog.grid.len(),
        catalog.grid.columns()
    );
    State {
        root: catalog.root,
        settings: catalog.settings,
        grid: catalog.grid,
        viewport_w,
        viewport_h,
    }
}

/* ------------------------------- input -------------------------------- */

pub fn handle_input(state: &mut State, cmd: MenuCommand) -> ScreenAction {
    if let Some(dir) = cmd.direction() {
        if state.grid.navigate(dir) {
            debug!(
                "{dir:?}: selection -> {:?}",
                state.grid.current_index()
            );
        }
        return ScreenAction::None;
    }
    match cmd {
        MenuCommand::Activate => state
            .grid
            .current_index()
            .map_or(ScreenAction::None, ScreenAction::Launch),
        MenuCommand::Quit => ScreenAction::Exit,
        _ => ScreenAction::None,
    }
}

/* ------------------------------- drawing ------------------------------- */

pub fn get_actors(state: &State) -> Vec<Actor> {
    title_grid::build(TitleGridParams {
        grid: &state.grid,
        settings: &state.settings,
        viewport_w: state.viewport_w,
        viewport_h: state.viewport_h,
    })
}
