pub mod core_api;
pub mod form_id;
pub mod lookup;
pub mod records;
