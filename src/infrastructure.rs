pub mod db;
pub mod media;
pub mod utils;
pub mod web;
