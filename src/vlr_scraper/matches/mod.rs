mod detail;
pub(crate) mod game;
pub(crate) mod players;

pub use detail::parse_match_page;
