//! Presentation module
//!
//! This module contains the view model, the terminal surface and keyboard input.

pub mod input;
pub mod terminal;
pub mod view;

pub use input::{map_key, Command, DurationInputs, Field};
pub use terminal::{TerminalGuard, TerminalSurface};
pub use view::{ControlAffordance, LastAction, TimerView};

/// A place the timer renders to
///
/// The surface also owns the duration input fields, which the controller
/// reads whenever they change.
pub trait Surface {
    /// Draw a freshly derived view
    fn present(&mut self, view: &TimerView) -> anyhow::Result<()>;

    fn inputs(&self) -> &DurationInputs;

    fn inputs_mut(&mut self) -> &mut DurationInputs;
}
