pub mod db;
pub mod error;
pub mod export;
pub mod pager;
pub mod ui;
