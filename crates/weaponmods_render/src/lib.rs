mod article;
mod json;
pub mod markup;

pub use article::{build_article, crafting_table, render_article};
pub use json::render_json;
