pub mod observability;
pub mod tabular;
