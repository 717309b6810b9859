pub mod rest;

pub use rest::{configure, ApiSettings, RestApi};
