// Adapters layer: concrete implementations of the domain ports for external
// systems (Watchmode API, Telegram bot API, local filesystem).

pub mod storage;
pub mod telegram;
pub mod watchmode;
