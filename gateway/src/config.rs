//! §6 Configuration, loaded once at startup.
//!
//! Every field is a `clap` flag with an environment variable fallback, the
//! same layering the corpus's own service entry points use.

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "bluffhouse-gateway", about = "Bluff card game session gateway")]
pub struct Config {
    /// Bind address.
    #[arg(long, env = "BLUFFHOUSE_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Bind port.
    #[arg(long, env = "BLUFFHOUSE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite file backing the player registry. `:memory:` for an ephemeral
    /// registry (tests only).
    #[arg(long, env = "BLUFFHOUSE_DATA_PATH", default_value = "bluffhouse.db")]
    pub data_path: String,

    /// Maximum seated players per room (§6).
    #[arg(long, env = "BLUFFHOUSE_MAX_PLAYERS", default_value_t = 8)]
    pub max_players: usize,

    /// Maximum username length (§6).
    #[arg(long, env = "BLUFFHOUSE_MAX_USERNAME_LEN", default_value_t = 20)]
    pub max_username_len: usize,

    /// Deterministic RNG seed override for a room's shuffle/turn-order
    /// stream. Testing only; leave unset in production (§9 RNG).
    #[arg(long, env = "BLUFFHOUSE_SEED")]
    pub seed: Option<u64>,

    /// Reserved per §9 Open Questions: the source anticipates a per-turn
    /// timeout knob but defines no policy for it. Parsed, never consulted.
    #[arg(long, env = "BLUFFHOUSE_TURN_TIMEOUT_SECS")]
    #[allow(dead_code)]
    pub turn_timeout_secs: Option<u64>,

    /// Idle-room reap sweep interval.
    #[arg(long, env = "BLUFFHOUSE_REAP_INTERVAL_SECS", default_value_t = 30)]
    pub reap_interval_secs: u64,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
