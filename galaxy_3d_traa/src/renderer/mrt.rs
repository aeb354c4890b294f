/// Multiple render target (MRT) configuration.
///
/// Channels are a closed, strongly typed set. An `Mrt` is a set of channels
/// whose attachment indices follow declaration order: `Output` is always
/// present and always attachment 0, the other channels pack after it.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

bitflags! {
    /// Set of MRT channels
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChannelFlags: u32 {
        const OUTPUT = 1 << 0;
        const VELOCITY = 1 << 1;
        const NORMAL = 1 << 2;
        const EMISSIVE = 1 << 3;
    }
}

/// A single MRT channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Shaded color
    Output,
    /// Screen-space motion in NDC units (xy)
    Velocity,
    /// World-space normal
    Normal,
    /// Emitted radiance
    Emissive,
}

impl Channel {
    /// Every channel, in attachment order
    pub const ALL: [Channel; 4] = [
        Channel::Output,
        Channel::Velocity,
        Channel::Normal,
        Channel::Emissive,
    ];

    /// Flag of this channel
    pub fn flag(self) -> ChannelFlags {
        match self {
            Channel::Output => ChannelFlags::OUTPUT,
            Channel::Velocity => ChannelFlags::VELOCITY,
            Channel::Normal => ChannelFlags::NORMAL,
            Channel::Emissive => ChannelFlags::EMISSIVE,
        }
    }
}

/// MRT configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mrt {
    channels: ChannelFlags,
}

impl Mrt {
    /// MRT writing `channels` (`OUTPUT` is always added)
    pub fn new(channels: ChannelFlags) -> Self {
        Self { channels: channels | ChannelFlags::OUTPUT }
    }

    /// Color + velocity, the minimal layout the TRAA pass accepts
    pub fn output_velocity() -> Self {
        Self::new(ChannelFlags::VELOCITY)
    }

    /// Channel set
    pub fn flags(&self) -> ChannelFlags {
        self.channels
    }

    /// Returns true if `channel` is written
    pub fn has(&self, channel: Channel) -> bool {
        self.channels.contains(channel.flag())
    }

    /// Attachment index of `channel`, or None if it is not written
    pub fn index_of(&self, channel: Channel) -> Option<u32> {
        if !self.has(channel) {
            return None;
        }
        let lower = channel.flag().bits() - 1;
        Some((self.channels.bits() & lower).count_ones())
    }

    /// Number of color attachments needed
    pub fn channel_count(&self) -> u32 {
        self.channels.bits().count_ones()
    }

    /// Written channels, in attachment order
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL.into_iter().filter(move |c| self.has(*c))
    }

    /// Build the channel -> attachment index map
    pub fn indexes(&self) -> ChannelIndexMap {
        let map = self
            .channels()
            .filter_map(|c| self.index_of(c).map(|i| (c, i)))
            .collect();
        ChannelIndexMap { map }
    }
}

/// Channel -> color attachment index map, resolved once at setup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelIndexMap {
    map: FxHashMap<Channel, u32>,
}

impl ChannelIndexMap {
    /// Attachment index of `channel`
    pub fn get(&self, channel: Channel) -> Option<u32> {
        self.map.get(&channel).copied()
    }

    /// Number of mapped channels
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no channel is mapped
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Mapped channels other than `Output`, in attachment order
    pub fn auxiliary(&self) -> Vec<(Channel, u32)> {
        let mut aux: Vec<(Channel, u32)> = self
            .map
            .iter()
            .filter(|(c, _)| **c != Channel::Output)
            .map(|(c, i)| (*c, *i))
            .collect();
        aux.sort_by_key(|(_, i)| *i);
        aux
    }
}

#[cfg(test)]
#[path = "mrt_tests.rs"]
mod tests;
