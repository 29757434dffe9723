//! In-process fan-out of values between collaborators.
//!
//! Every party connects a receiver and gets back a `SenderId`. Sending as a
//! party delivers to everyone else; broadcasting delivers to all.

use log::debug;

use crate::error::ChannelError;

/// Identifies the party sending on a channel, so it does not receive its own values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SenderId(usize);

type Receiver<'a, T> = Box<dyn FnMut(&T) + 'a>;

pub struct Channel<'a, T> {
    receivers: Vec<Receiver<'a, T>>,
}

impl<'a, T> Default for Channel<'a, T> {
    fn default() -> Self {
        return Channel { receivers: Vec::new() };
    }
}

impl<'a, T> Channel<'a, T> {
    pub fn new() -> Channel<'a, T> {
        return Channel::default();
    }

    pub fn connect(&mut self, receiver: impl FnMut(&T) + 'a) -> SenderId {
        self.receivers.push(Box::new(receiver));
        return SenderId(self.receivers.len() - 1);
    }

    /// Deliver `data` to every receiver except the sender's own.
    pub fn send(&mut self, sender: SenderId, data: &T) {
        for (i, receiver) in self.receivers.iter_mut().enumerate() {
            if i != sender.0 {
                receiver(data);
            }
        }
    }

    pub fn broadcast(&mut self, data: &T) {
        for receiver in self.receivers.iter_mut() {
            receiver(data);
        }
    }
}

/// A channel that any party can close. The other parties are told; sending
/// afterwards fails.
pub struct ClosableChannel<'a, T> {
    channel: Channel<'a, T>,
    close_receivers: Vec<Box<dyn FnMut() + 'a>>,
    closed: bool,
}

impl<'a, T> Default for ClosableChannel<'a, T> {
    fn default() -> Self {
        return ClosableChannel {
            channel: Channel::new(),
            close_receivers: Vec::new(),
            closed: false,
        };
    }
}

impl<'a, T> ClosableChannel<'a, T> {
    pub fn new() -> ClosableChannel<'a, T> {
        return ClosableChannel::default();
    }

    pub fn connect(&mut self, receiver: impl FnMut(&T) + 'a, close_receiver: impl FnMut() + 'a) -> SenderId {
        self.close_receivers.push(Box::new(close_receiver));
        return self.channel.connect(receiver);
    }

    pub fn is_closed(&self) -> bool {
        return self.closed;
    }

    pub fn send(&mut self, sender: SenderId, data: &T) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.channel.send(sender, data);
        return Ok(());
    }

    pub fn broadcast(&mut self, data: &T) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.channel.broadcast(data);
        return Ok(());
    }

    pub fn close(&mut self, sender: SenderId) {
        debug!("channel closed by {:?}", sender);
        self.closed = true;
        for (i, close_receiver) in self.close_receivers.iter_mut().enumerate() {
            if i != sender.0 {
                close_receiver();
            }
        }
    }
}
