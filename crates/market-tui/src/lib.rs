//! Interactive terminal browser for the template catalog

mod app;
mod input;
mod ui;

pub use app::{App, Command, Toast, run};
pub use input::TextInput;
