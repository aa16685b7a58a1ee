pub mod activity;
pub mod pace;
pub mod route;
pub mod weather;
