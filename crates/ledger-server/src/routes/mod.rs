pub mod credits;
pub mod packs;
pub mod refill;
pub mod rewards;
