pub mod build;
pub mod calibrate;
pub mod parse;
pub mod physics;
pub mod summarize;
pub mod weather;
