pub mod map;
pub mod page;
