pub mod audio;
pub mod commands;
pub mod logging;
pub mod presenter;
pub mod repl;
pub mod speech;

pub use presenter::TerminalView;
