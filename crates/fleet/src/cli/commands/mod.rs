//! CLI commands

mod completions;
mod divg;
mod exec;
mod list;
mod sync;

pub use completions::CompletionsCommand;
pub use divg::DivgCommand;
pub use exec::ExecCommand;
pub use list::ListCommand;
pub use sync::SyncCommand;
