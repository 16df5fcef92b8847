pub mod format;

pub use format::{format_bytes, format_delta, format_number, format_uptime};
