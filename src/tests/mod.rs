#![warn(clippy::all, clippy::pedantic)]

pub mod systems_tests;
pub mod ui_tests;
