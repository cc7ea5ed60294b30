pub mod config;
pub mod image;
pub mod options;
pub mod probe;
pub mod run;
