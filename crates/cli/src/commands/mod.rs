pub mod config_cmd;
pub mod samples;
pub mod schema;
pub mod serve;
pub mod translate;
