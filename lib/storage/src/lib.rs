pub mod manager;
pub mod source;

pub use manager::{CatalogManager, CatalogState};
pub use source::{read_json_file, write_json_file, CatalogSource};
