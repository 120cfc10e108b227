// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod game;
pub mod ranking;
pub mod runtime;
pub mod util;
