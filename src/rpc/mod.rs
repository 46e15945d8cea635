pub mod connector;

pub use connector::{connect_all, Endpoint};
