pub mod estimate;
pub mod garmin;
pub mod health;
pub mod history;
pub mod weather;
