mod analysis;
mod cli;
mod config;
mod entry;
mod handlers;
mod state;
mod text;
mod utils;


pub use entry::run;
