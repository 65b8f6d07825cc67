use crate::core::gfx::Renderer;
use crate::core::input::InputSource;
use crate::core::launch::{LaunchError, Launcher};
use crate::screens::{ScreenAction, select_title};
use log::{error, info, warn};
use std::time::Instant;

/// Owns the menu screen and its collaborators for the lifetime of the frame loop.
pub struct App<I, R, L> {
    screen: select_title::State,
    input: I,
    renderer: R,
    launcher: L,
    frame_count: u64,
}

impl<I: InputSource, R: Renderer, L: Launcher> App<I, R, L> {
    pub const fn new(screen: select_title::State, input: I, renderer: R, launcher: L) -> Self {
        Self {
            screen,
            input,
            renderer,
            launcher,
            frame_count: 0,
        }
    }

    fn present(&mut self) {
        let actors = select_title::get_actors(&self.screen);
        self.renderer.draw(&actors);
        self.frame_count += 1;
    }

    /// Runs the title at `index` and blocks until it exits.
    fn launch(&mut self, index: usize) {
        let Some(title) = self.screen.grid.titles().get(index) else {
            return;
        };
        let title_path = title.absolute_path(&self.screen.root);
        info!(
            "Selected {} ({} / {}, {})",
            title.display_title(),
            title.developer.as_deref().unwrap_or("unknown developer"),
            title.publisher.as_deref().unwrap_or("unknown publisher"),
            title.released.as_deref().unwrap_or("n.d.")
        );
        let result = match title.launch_command.as_deref() {
            Some(cmd) => self.launcher.launch(cmd, &title_path),
            None => Err(LaunchError::NoCommand(title_path)),
        };
        match result {
            Ok(outcome) if outcome.success() => {
                info!("{} finished after {:.1?}", title.display_title(), outcome.elapsed);
            }
            Ok(outcome) => warn!(
                "{} exited unsuccessfully (code {:?}, signal {:?})",
                title.display_title(),
                outcome.code,
                outcome.signal
            ),
            Err(e) => error!("{e}"),
        }
    }

    /// Frame loop: draw, then poll and apply one batch of commands per frame.
    /// Returns when the user quits or the input source closes.
    pub fn run(mut self) -> u64 {
        let started = Instant::now();
        self.present();
        loop {
            let Some(batch) = self.input.poll() else {
                info!("Input closed; leaving menu.");
                break;
            };
            let mut exit = false;
            for cmd in batch {
                match select_title::handle_input(&mut self.screen, cmd) {
                    ScreenAction::None => {}
                    ScreenAction::Launch(index) => self.launch(index),
                    ScreenAction::Exit => {
                        exit = true;
                        break;
                    }
                }
            }
            if exit {
                break;
            }
            self.present();
        }
        self.renderer.finish();
        info!(
            "Rendered {} frames in {:.1?}.",
            self.frame_count,
            started.elapsed()
        );
        self.frame_count
    }
}
