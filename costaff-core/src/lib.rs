// costaff-core/src/lib.rs

pub mod crypto;
pub mod db;
pub mod prompt;
pub mod repositories;
pub mod services;

pub use costaff_common::error::Error;
pub use db::Database;
