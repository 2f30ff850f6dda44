pub mod asset_key;
pub mod definition;
pub mod metadata;
pub mod partitions;

pub use asset_key::AssetKey;
pub use definition::AssetDefinitionSnapshot;
pub use metadata::MetadataValue;
pub use partitions::{Cadence, PartitionsSpec};
