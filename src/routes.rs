pub mod account;
pub mod admin;
pub mod health;
pub mod plans;
pub mod shared;
pub mod view;
