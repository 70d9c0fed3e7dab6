pub mod config;
pub mod health;
pub mod run;
pub mod simulate;
