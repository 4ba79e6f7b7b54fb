pub mod commands;
pub mod params;
pub mod run;
