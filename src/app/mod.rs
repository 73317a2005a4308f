pub mod gallery;
pub mod social;
pub mod uploads;
pub mod validation;
