// SPDX-License-Identifier:  MIT

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IfcfgError {
    #[error("Malformed directive '{0}', expected 'ifcfg=<iface>=...'")]
    MalformedDirective(String),
    #[error("Could not create output directory {}: {source}", .path.display())]
    DirectoryCreation { path: PathBuf, source: io::Error },
    #[error("Failed to write network file '{}' (interface '{interface}'): {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        interface: String,
        source: io::Error,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    InputRead { path: PathBuf, source: io::Error },
}

impl IfcfgError {
    /// Process exit status for this error, the OS errno whenever one is available.
    pub fn exit_code(&self) -> i32 {
        match self {
            IfcfgError::MalformedDirective(_) => libc::EINVAL,
            IfcfgError::DirectoryCreation { source, .. }
            | IfcfgError::FileWrite { source, .. }
            | IfcfgError::InputRead { source, .. } => source.raw_os_error().unwrap_or(libc::EIO),
        }
    }
}
