// uapx-api: SSH transport and `mca-dump` document model for UniFi access points

pub mod error;
mod lenient;
pub mod mca;
pub mod ssh;

pub use error::Error;
pub use mca::{DeviceStatus, Interface, Radio, ScanEntry, Station, SysStats, SystemStats, Vap};
pub use ssh::{Credentials, SshClient};
