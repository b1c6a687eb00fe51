//! Mount point for the view tree.

use std::io::{BufRead, Write};

use log::{debug, info};
use todo_core::Transport;

use crate::error::AppError;
use crate::provider::ApiProvider;
use crate::view::{Event, Flow, View, USAGE};

/// Owns the output the view tree is drawn into.
///
/// `render` consumes the root, so a tree is mounted at most once. After the
/// first draw every input line is dispatched to the view as an event and the
/// tree is redrawn.
pub struct Root<W> {
    container: W,
}

impl<W: Write> Root<W> {
    pub fn create(container: W) -> Self {
        Self { container }
    }

    pub fn render<T, V, R>(
        mut self,
        provider: &mut ApiProvider<T>,
        mut view: V,
        input: R,
    ) -> Result<(), AppError>
    where
        T: Transport,
        V: View<T>,
        R: BufRead,
    {
        info!("mounting view tree");
        self.draw(provider, &mut view)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match Event::parse(&line) {
                Ok(event) => {
                    if view.handle(event, provider.api_mut()) == Flow::Exit {
                        debug!("view requested exit");
                        break;
                    }
                }
                Err(err) => {
                    writeln!(self.container, "{err}")?;
                    writeln!(self.container, "{USAGE}")?;
                    continue;
                }
            }
            self.draw(provider, &mut view)?;
        }

        self.container.flush()?;
        Ok(())
    }

    fn draw<T, V>(&mut self, provider: &mut ApiProvider<T>, view: &mut V) -> Result<(), AppError>
    where
        T: Transport,
        V: View<T>,
    {
        view.render(provider.api_mut(), &mut self.container)?;
        self.container.flush()?;
        Ok(())
    }
}
