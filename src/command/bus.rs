use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::types::Command;

/// Command bus carrying user actions from the TUI to the audio thread
pub struct CommandBus {
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl CommandBus {
    pub fn new() -> Self {
        let (tx, rx) = bounded(256);
        Self { tx, rx }
    }

    /// Get a sender that can be cloned and shared
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Get a receiver (for the audio thread)
    pub fn receiver(&self) -> CommandReceiver {
        CommandReceiver {
            rx: self.rx.clone(),
        }
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable sender for dispatching commands
#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Send a command (non-blocking, drops if buffer full)
    pub fn send(&self, cmd: Command) -> bool {
        match self.tx.try_send(cmd) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                eprintln!("Warning: Command buffer full, dropping command");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Receiver for consuming commands
#[derive(Clone)]
pub struct CommandReceiver {
    rx: Receiver<Command>,
}

impl CommandReceiver {
    /// Try to receive a command (non-blocking)
    pub fn try_recv(&self) -> Option<Command> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_flow_sender_to_receiver() {
        let bus = CommandBus::new();
        let tx = bus.sender();
        let rx = bus.receiver();

        assert!(rx.try_recv().is_none());
        assert!(tx.send(Command::TogglePlay));
        assert!(tx.send(Command::SetBpm(140.0)));

        assert!(matches!(rx.try_recv(), Some(Command::TogglePlay)));
        assert!(matches!(rx.try_recv(), Some(Command::SetBpm(b)) if b == 140.0));
        assert!(rx.try_recv().is_none());
    }
}
