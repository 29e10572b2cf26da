pub mod config;
pub mod doctor;
pub mod form;
pub mod payload;
pub mod prediction;
pub mod predictor;
pub mod schema;
#[cfg(test)]
pub(crate) mod test_support;
pub mod validation;
