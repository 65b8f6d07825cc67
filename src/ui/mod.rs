pub mod actors;
pub mod components;
