//! Configuration and dependency initialization for the directory sync.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{
    CustomFieldSettings, DirectorySettings, GeocodeSettings, SearchSettings, Settings,
};
