pub mod endpoint;
pub mod verb;

pub use endpoint::{Endpoint, EndpointDefinition, Headers, RouteKey};
pub use verb::Verb;
