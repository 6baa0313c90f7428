pub mod domain;
pub mod fri;
pub mod polynomial;
