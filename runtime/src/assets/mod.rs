//! Local asset provisioning: the extraction tool and its cookie jar.

pub mod download;
pub mod provisioner;

pub use provisioner::{AssetProvisioner, AssetStatus, ProvisionReport};
