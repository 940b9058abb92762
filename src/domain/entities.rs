pub mod image;
pub mod message;
pub mod option_fields;
pub mod pagination;
pub mod project;
