#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

extern crate simplelog;

//Application Imports/Exports
pub mod config;
pub mod constants;
pub mod resources;
pub mod script;
pub mod simulation;
pub mod tasks;
