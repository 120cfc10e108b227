/// Entries kept on the board.
pub const MAX_RANKING_ENTRIES: usize = 5;

/// Characters of the player identifier that are kept.
pub const MAX_PLAYER_ID_CHARS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankingEntry {
    pub player: String,
    pub reaction_ms: u64,
}

/// In-memory top-5 board, ascending by reaction time. Nothing is persisted;
/// the board starts empty on every run.
#[derive(Debug, Default)]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result. The identifier is trimmed, cut to its first four
    /// characters and uppercased; an identifier that is empty after trimming
    /// is rejected and the board is left untouched.
    ///
    /// Identifier content is otherwise unrestricted. Identical entries are
    /// not deduplicated; ties keep insertion order.
    pub fn submit(&mut self, player: &str, reaction_ms: u64) -> bool {
        let trimmed = player.trim();
        if trimmed.is_empty() {
            return false;
        }

        let player: String = trimmed
            .chars()
            .take(MAX_PLAYER_ID_CHARS)
            .collect::<String>()
            .to_uppercase();

        self.entries.push(RankingEntry { player, reaction_ms });
        // Vec::sort_by_key is stable, so equal times keep insertion order
        self.entries.sort_by_key(|entry| entry.reaction_ms);
        self.entries.truncate(MAX_RANKING_ENTRIES);
        true
    }

    /// Ordered read-only view for display.
    pub fn snapshot(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
