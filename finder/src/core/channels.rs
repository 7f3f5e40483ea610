//! Curated channel lists used by the ranker

use std::collections::HashSet;

/// Channels known for clean karaoke uploads
pub const PREFERRED_CHANNELS: &[&str] = &["Sing King", "Karaoke Version", "KaraFun", "Karaoke"];

/// Channels whose uploads carry the original vocal track
pub const BLOCKED_CHANNELS: &[&str] = &["Vevo", "Topic"];

/// Verdict for a channel name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelVerdict {
    Preferred,
    Blocked,
    Neutral,
}

/// Lower-cased alphanumeric tokens of a name
pub fn tokenize(name: &str) -> HashSet<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Allow/block lists matched by token containment
#[derive(Debug, Clone)]
pub struct ChannelLists {
    allow: Vec<HashSet<String>>,
    block: Vec<HashSet<String>>,
}

impl ChannelLists {
    pub fn new(allow: &[&str], block: &[&str]) -> Self {
        Self {
            allow: Self::token_sets(allow),
            block: Self::token_sets(block),
        }
    }

    // A name without tokens would match every channel
    fn token_sets(names: &[&str]) -> Vec<HashSet<String>> {
        names
            .iter()
            .map(|name| tokenize(name))
            .filter(|tokens| !tokens.is_empty())
            .collect()
    }

    /// Allow-list is checked first; a channel matching both lists is preferred
    pub fn classify(&self, channel_name: &str) -> ChannelVerdict {
        let channel = tokenize(channel_name);
        let matches = |listed: &HashSet<String>| listed.is_subset(&channel);

        if self.allow.iter().any(matches) {
            ChannelVerdict::Preferred
        } else if self.block.iter().any(matches) {
            ChannelVerdict::Blocked
        } else {
            ChannelVerdict::Neutral
        }
    }
}

impl Default for ChannelLists {
    fn default() -> Self {
        Self::new(PREFERRED_CHANNELS, BLOCKED_CHANNELS)
    }
}
