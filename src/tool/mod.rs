//! NuGet acquisition
//!
//! Resolves which NuGet binary runs the restore, downloading a specific
//! release from dist.nuget.org when one is requested.

pub mod download;
pub mod resolve;

pub use download::{Downloader, HttpDownloader};
pub use resolve::{printable_command, ToolInvocation, ToolResolver, DOWNLOAD_FILE_NAME};
