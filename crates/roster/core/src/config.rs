/// Distribution rules shared by the allocation engine and its callers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterConfig {
    /// Maximum number of entities one owner may hold.
    pub capacity: usize,
    /// A draw is rare with probability `1 / rarity_odds`.
    pub rarity_odds: u32,
    /// Failed draws (oracle misses, transport failures, duplicates) tolerated
    /// by a single allocation before it gives up.
    pub max_draw_failures: u32,
}

impl RosterConfig {
    pub const DEFAULT_CAPACITY: usize = 5;
    pub const DEFAULT_RARITY_ODDS: u32 = 8192;
    pub const DEFAULT_MAX_DRAW_FAILURES: u32 = 64;

    pub const fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            rarity_odds: Self::DEFAULT_RARITY_ODDS,
            max_draw_failures: Self::DEFAULT_MAX_DRAW_FAILURES,
        }
    }

    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub const fn with_rarity_odds(mut self, rarity_odds: u32) -> Self {
        self.rarity_odds = rarity_odds;
        self
    }

    #[must_use]
    pub const fn with_max_draw_failures(mut self, max_draw_failures: u32) -> Self {
        self.max_draw_failures = max_draw_failures;
        self
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self::new()
    }
}
