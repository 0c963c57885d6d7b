pub mod calculator;
pub mod config;
pub mod contact;
pub mod health;
