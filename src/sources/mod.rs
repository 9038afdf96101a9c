pub mod graphql;
pub mod memory;
pub mod traits;

pub use graphql::WpGraphqlSource;
pub use memory::InMemorySource;
pub use traits::ListingSource;
