pub mod http;
pub mod output;
pub mod probe;
pub mod targets;
