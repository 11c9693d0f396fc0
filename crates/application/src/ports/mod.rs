mod resolver;

pub use resolver::{BoundResolver, ResolverFactory};
