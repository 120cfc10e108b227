use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Symbols the player may be asked to press.
pub const TARGET_SYMBOLS: [char; 36] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Bounds of the randomized pre-delay, lower inclusive, upper exclusive.
pub const DELAY_MIN_MS: u64 = 1000;
pub const DELAY_MAX_MS: u64 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Armed,
    Delaying,
    Active,
    Finished,
}

/// A single reaction-time session.
///
/// All transitions take `now_ms` from the caller (milliseconds on whatever
/// clock the caller keeps). The binary derives it from a process-start
/// `Instant`; tests pass literals, including non-monotonic sequences.
#[derive(Debug)]
pub struct Game {
    phase: Phase,
    target: Option<char>,
    started_at_ms: Option<u64>,
    delay_deadline_ms: Option<u64>,
    pending_delay_ms: Option<u64>,
    last_reaction_ms: Option<u64>,
    rng: StdRng,
}

impl Game {
    /// A seed makes delays and target symbols reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            phase: Phase::Idle,
            target: None,
            started_at_ms: None,
            delay_deadline_ms: None,
            pending_delay_ms: None,
            last_reaction_ms: None,
            rng,
        }
    }

    /// Arm a new session: clear any prior result and schedule the pre-delay.
    ///
    /// Valid from every phase. Overwriting the deadline here is what cancels
    /// a still-pending delay from a previous session, so a later `tick` can
    /// never complete the old one.
    pub fn start(&mut self, now_ms: u64) {
        self.phase = Phase::Armed;
        self.target = None;
        self.started_at_ms = None;
        self.last_reaction_ms = None;
        self.schedule_delay(now_ms);
    }

    // Armed -> Delaying: draw the pre-delay and schedule its deadline
    fn schedule_delay(&mut self, now_ms: u64) {
        let delay = self.rng.gen_range(DELAY_MIN_MS..DELAY_MAX_MS);
        self.pending_delay_ms = Some(delay);
        self.delay_deadline_ms = Some(now_ms.saturating_add(delay));
        self.phase = Phase::Delaying;
    }

    /// Advance the delay. Only the `Delaying` -> `Active` edge happens here;
    /// ticking in any other phase is a no-op.
    pub fn tick(&mut self, now_ms: u64) {
        if self.phase != Phase::Delaying {
            return;
        }

        if let Some(deadline) = self.delay_deadline_ms {
            if now_ms >= deadline {
                let idx = self.rng.gen_range(0..TARGET_SYMBOLS.len());
                self.target = Some(TARGET_SYMBOLS[idx]);
                self.started_at_ms = Some(now_ms);
                self.delay_deadline_ms = None;
                self.phase = Phase::Active;
            }
        }
    }

    /// Feed one key press. Returns the reaction time when `symbol` matches
    /// the target (case-insensitively) while the session is `Active`; any
    /// other combination is a no-op and returns `None`.
    pub fn check_input(&mut self, symbol: char, now_ms: u64) -> Option<u64> {
        if self.phase != Phase::Active {
            return None;
        }

        let target = self.target?;
        if !symbol.eq_ignore_ascii_case(&target) {
            return None;
        }

        let started_at = self.started_at_ms?;
        // saturating_sub keeps the result at 0 if the caller's clock stepped back
        let reaction = now_ms.saturating_sub(started_at);
        self.last_reaction_ms = Some(reaction);
        self.phase = Phase::Finished;
        Some(reaction)
    }

    /// Read-only elapsed time for the live display. Never changes phase.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match (self.phase, self.started_at_ms) {
            (Phase::Active, Some(started_at)) => now_ms.saturating_sub(started_at),
            (Phase::Finished, _) => self.last_reaction_ms.unwrap_or(0),
            _ => 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The symbol to press, present only once the session is `Active`.
    pub fn target(&self) -> Option<char> {
        self.target
    }

    pub fn last_reaction_ms(&self) -> Option<u64> {
        self.last_reaction_ms
    }

    /// Length of the currently scheduled (or last scheduled) pre-delay.
    pub fn pending_delay_ms(&self) -> Option<u64> {
        self.pending_delay_ms
    }

    /// Absolute deadline of the pending pre-delay, while one is scheduled.
    pub fn delay_deadline_ms(&self) -> Option<u64> {
        self.delay_deadline_ms
    }

    /// Whether a start command is currently accepted by the UI flow.
    pub fn can_start(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Finished)
    }
}
