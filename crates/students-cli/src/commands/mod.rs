pub mod query;
pub mod resolve;
pub mod routes;

pub use query::QueryCommand;
pub use resolve::ResolveCommand;
pub use routes::RoutesCommand;
