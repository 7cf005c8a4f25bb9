pub mod date;
pub mod logging;
pub mod timezone;

pub use date::parse_date;
pub use logging::init_logging;
pub use timezone::Timezone;
