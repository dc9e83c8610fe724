pub mod builtin;
pub mod category;
pub mod table;

pub use category::RoleCategory;
pub use table::{LoadReport, RoleTaxonomy, RoleTaxonomyEntry, OTHER_ROLE};
