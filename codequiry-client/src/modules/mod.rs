pub mod account;
pub mod check;
pub mod file;
pub mod status;

use serde::Serialize;

macro_rules! api_path {
    ($component:expr) => {
        $component.to_string()
    };
    ($component:expr, $part:expr) => {
        format!("{}/{}", $component, $part)
    };
}

pub (crate) use api_path;

/// Request body naming a single check
#[derive(Serialize)]
struct CheckParams {
    check_id: String,
}

impl CheckParams {
    fn new(check_id: u64) -> Self {
        Self { check_id: check_id.to_string() }
    }
}
