//! # reconcile-sync
//!
//! Blocking HTTP clients for the group directory and the workspace, and the
//! run pipeline that reconciles one against the other.
//!
//! Call [`pipeline::run`] with a [`DirectorySource`] and a [`WorkspaceApi`];
//! the production implementations are [`DirectoryClient`] and
//! [`WorkspaceClient`].

pub mod directory;
pub mod endpoint;
pub mod error;
pub mod pipeline;
pub mod transport;
pub mod workspace;

pub use directory::{DirectoryClient, DirectorySource};
pub use error::{ApiError, SyncError};
pub use pipeline::{Listing, Preview, RunOptions, RunReport};
pub use workspace::{WorkspaceApi, WorkspaceClient};
