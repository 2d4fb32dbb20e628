#[allow(non_snake_case)]
pub mod Mechanism;
pub mod settings;
