use std::collections::VecDeque;

/// Output side of the board: a row of lamps.
pub trait Lamps {
    /// Light `channel` and darken every other lamp.
    fn activate(&mut self, channel: usize);
    /// Drive the whole row to one level.
    fn set_all(&mut self, lit: bool);
}

/// Input side of the board.
pub trait Keys {
    /// Sample the keys once, returning the active channel if any.
    fn poll_active(&mut self) -> Option<usize>;
}

/// Plain in-memory lamp row; the UI reads it back to draw the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LampRow {
    lit: Vec<bool>,
}

impl LampRow {
    pub fn new(channels: usize) -> Self {
        Self {
            lit: vec![false; channels],
        }
    }

    pub fn len(&self) -> usize {
        self.lit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lit.is_empty()
    }

    pub fn is_lit(&self, channel: usize) -> bool {
        self.lit.get(channel).copied().unwrap_or(false)
    }

    /// Channels currently lit, in board order.
    pub fn lit_channels(&self) -> Vec<usize> {
        self.lit
            .iter()
            .enumerate()
            .filter_map(|(channel, &lit)| lit.then_some(channel))
            .collect()
    }
}

impl Lamps for LampRow {
    fn activate(&mut self, channel: usize) {
        for (i, lamp) in self.lit.iter_mut().enumerate() {
            *lamp = i == channel;
        }
    }

    fn set_all(&mut self, lit: bool) {
        self.lit.fill(lit);
    }
}

/// Holds the latest key press until a poll consumes it.
///
/// Terminals report discrete presses rather than held levels, so each
/// press stays visible to exactly one sample, and a newer press replaces
/// an unsampled older one.
#[derive(Debug, Default)]
pub struct KeyLatch {
    pending: Option<usize>,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, channel: usize) {
        self.pending = Some(channel);
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl Keys for KeyLatch {
    fn poll_active(&mut self) -> Option<usize> {
        self.pending.take()
    }
}

/// Scripted key feed for tests: every poll pops the next entry, and an
/// exhausted script reads as quiet.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    feed: VecDeque<Option<usize>>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, channel: usize) {
        self.feed.push_back(Some(channel));
    }

    pub fn quiet(&mut self, polls: usize) {
        for _ in 0..polls {
            self.feed.push_back(None);
        }
    }
}

impl Keys for ScriptedKeys {
    fn poll_active(&mut self) -> Option<usize> {
        self.feed.pop_front().flatten()
    }
}
