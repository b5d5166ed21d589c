use maze_escape_core::{RNG_STREAM_ENEMIES, RNG_STREAM_POWER_UPS};
use maze_escape_system_generation::{derive_session_seed, derive_stream_seed};
use rand::Rng as _;

/// Resolves the run-wide seed, drawing one from OS entropy when absent.
pub(crate) fn resolve_global_seed(requested: Option<u64>) -> u64 {
    requested.unwrap_or_else(|| rand::thread_rng().gen())
}

/// Derives the seed for the session at `session_index` within this run.
pub(crate) fn session_seed(global_seed: u64, session_index: u32) -> u64 {
    derive_session_seed(global_seed, session_index)
}

/// Seeds for the companion systems attached to one session.
///
/// Derived from the session seed rather than the global seed, so a session
/// received as a share code reproduces the same enemies and power-ups as the
/// run it was captured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CompanionSeeds {
    /// Stream feeding enemy placement and stepping.
    pub enemies: u64,
    /// Stream feeding power-up placement.
    pub power_ups: u64,
}

impl CompanionSeeds {
    /// Derives the companion streams from a session seed.
    pub(crate) fn for_session(session_seed: u64) -> Self {
        Self {
            enemies: derive_stream_seed(session_seed, RNG_STREAM_ENEMIES),
            power_ups: derive_stream_seed(session_seed, RNG_STREAM_POWER_UPS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_seeds_pass_through_unchanged() {
        assert_eq!(resolve_global_seed(Some(42)), 42);
    }

    #[test]
    fn session_seeds_walk_with_the_session_index() {
        let first = session_seed(7, 0);
        let second = session_seed(7, 1);

        assert_ne!(first, second);
        assert_eq!(first, session_seed(7, 0));
    }

    #[test]
    fn companion_streams_never_collide() {
        let seeds = CompanionSeeds::for_session(99);

        assert_ne!(seeds.enemies, seeds.power_ups);
        assert_ne!(seeds.enemies, 99);
        assert_eq!(seeds, CompanionSeeds::for_session(99));
    }
}
