pub mod credit;
pub mod pack;
pub mod plans;
pub mod refill;
pub mod reward;
pub mod serve;
