pub mod convert;
pub mod favorites;
pub mod history;
pub mod pairs;
pub mod trend;
pub mod ui;
pub mod watch;
