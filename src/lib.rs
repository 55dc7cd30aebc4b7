#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate lazy_static;

pub mod browser_controller;
pub mod documents;
pub mod driver;
pub mod filters;
pub mod legistar;
pub mod paginator;
pub mod poller;
pub mod runner;
pub mod table;
pub mod types;
pub mod utils;
pub mod writer;
