// src/application/commands/mod.rs
//
// Command handlers: the boundary a UI shell calls

pub mod category_commands;
pub mod library_commands;
pub mod search_commands;
pub mod upload_commands;

pub use category_commands::*;
pub use library_commands::*;
pub use search_commands::*;
pub use upload_commands::*;
