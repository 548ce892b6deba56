pub mod identity;
pub mod import;
pub mod lead;
pub mod mapping;
pub mod row;
