mod config;
mod playlist;
mod stats;
mod xmltv;

pub use self::config::*;
pub use self::playlist::*;
pub use self::stats::*;
pub use self::xmltv::*;
