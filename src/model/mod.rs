mod match_detail;
mod player;

pub use match_detail::*;
pub use player::*;
