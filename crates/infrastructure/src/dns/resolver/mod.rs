mod factory;
mod upstream;

pub use factory::TcpResolverFactory;
pub use upstream::UpstreamResolver;
