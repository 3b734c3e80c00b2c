//! CLI command implementations

pub mod utils;

pub mod cat;
pub mod chart;
pub mod completions;
pub mod convert;
pub mod design;
pub mod init;
pub mod mat;
pub mod po;
pub mod prd;
pub mod status;
