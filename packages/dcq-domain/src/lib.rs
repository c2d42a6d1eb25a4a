pub mod rules;
pub mod schema;
pub mod sqlguard;

pub use rules::{PredefinedRule, match_predefined};
pub use schema::{SchemaDescriptor, TableDescriptor, catalog};
