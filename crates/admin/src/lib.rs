pub mod access;
pub mod backend;
pub mod bus;
pub mod command;
pub mod config;
pub mod console;
pub mod detail;
pub mod panel;
pub mod render;
pub mod shell;

#[cfg(test)]
mod testing;
