//! Property listing handlers.

mod create_property;
mod feature_property;
mod list_properties;
mod set_property_active;
mod update_property;

pub use create_property::CreatePropertyHandler;
pub use feature_property::{
    ClearFeatureHandler, ExtendFeatureHandler, FeatureCommand, ForceFeatureHandler,
};
pub use list_properties::{GetPropertyHandler, ListPropertiesHandler, ListPropertiesQuery};
pub use set_property_active::{SetPropertyActiveCommand, SetPropertyActiveHandler};
pub use update_property::{UpdatePropertyCommand, UpdatePropertyHandler};
