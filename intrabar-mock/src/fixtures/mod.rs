pub mod intraday;
pub mod ticks;
