//! Linear text reconstruction from analysed pages and tables

mod page_map;
mod table;

pub use page_map::{build_page_map, PageMap};
pub use table::{escape_html, render_table};
