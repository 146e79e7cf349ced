//! Screening files as written by users, and their conversion to engine types

pub mod convert;
pub mod screening_data;

pub use convert::to_parameter_space;
pub use screening_data::{ParameterData, ScreeningData};
