use std::fmt;

use serde::{Deserialize, Serialize};

/// Strand colour used while rotating through the planes of an RGB target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Blue,
    Green,
    Red,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Blue, Channel::Green, Channel::Red];

    /// Target plane this strand is scored against.
    pub fn plane(self) -> usize {
        match self {
            Channel::Blue => 0,
            Channel::Green => 1,
            Channel::Red => 2,
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            Channel::Blue => [0, 0, 255],
            Channel::Green => [0, 128, 0],
            Channel::Red => [255, 0, 0],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Blue => "Blue",
            Channel::Green => "Green",
            Channel::Red => "Red",
        }
    }

    pub fn initial(self) -> char {
        match self {
            Channel::Blue => 'B',
            Channel::Green => 'G',
            Channel::Red => 'R',
        }
    }

    pub fn next(self) -> Self {
        match self {
            Channel::Blue => Channel::Green,
            Channel::Green => Channel::Red,
            Channel::Red => Channel::Blue,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Advances the active [`Channel`] every `interval` completed iterations.
#[derive(Clone, Copy, Debug)]
pub struct ChannelRotation {
    channel: Channel,
    interval: usize,
    advances: usize,
}

impl ChannelRotation {
    pub fn new(interval: usize) -> Self {
        Self {
            channel: Channel::Blue,
            interval,
            advances: 0,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Number of times the channel changed so far.
    pub fn advances(&self) -> usize {
        self.advances
    }

    /// Called once `iteration` (1-based) has been drawn.
    pub fn tick(&mut self, iteration: usize) {
        if self.interval > 0 && iteration % self.interval == 0 {
            self.channel = self.channel.next();
            self.advances += 1;
        }
    }
}
