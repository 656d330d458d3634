mod bounding_box;
mod proximity;

pub use proximity::{find_nearby, parse_radius, QueryError, QueryResult};
