mod bus;
mod types;

pub use bus::{CommandBus, CommandReceiver, CommandSender};
pub use types::Command;
