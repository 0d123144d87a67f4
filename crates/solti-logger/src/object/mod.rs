pub mod format;
pub mod level;
pub mod policy;
pub mod timezone;

pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub use policy::RotatePolicy;
pub use timezone::{LoggerTimeZone, init_local_offset};
