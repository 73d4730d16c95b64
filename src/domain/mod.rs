pub mod ran_model;
pub mod simulator;
