mod log;

pub use log::{Entry, EventLog};
