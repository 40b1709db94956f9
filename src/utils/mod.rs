pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{entry_url_from_path, find_html_files, resolve_entry};
