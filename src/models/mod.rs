pub mod ability;
pub mod cached_resource;
pub mod pokemon;
pub mod resource_list;

pub use ability::*;
pub use cached_resource::*;
pub use pokemon::*;
pub use resource_list::*;
