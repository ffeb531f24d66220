//! Async Rust client for the Zadara VPSA and VPSA Object Storage REST APIs.
//!
//! A [`Session`] holds the connection settings for one array. Every
//! resource operation is an async method on it that validates its
//! arguments, sends one request and returns the decoded [`ApiResponse`].
//!
//! # Features
//!
//! - Connection settings from explicit values, `ZADARA_*` environment
//!   variables or `~/.zadarapy`
//! - Per-call overrides of host, port, key, scheme and timeout
//! - One error type for every failure shape the API reports
//! - Drives, RAID groups, pools, volumes, container services and object
//!   storage virtual controllers
//!
//! # Example
//!
//! ```no_run
//! use zadara_client::{CallOptions, RaidProtection, Session};
//! use zadara_client::vpsa::raid_groups::NewRaidGroup;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Host and key come from ZADARA_HOST / ZADARA_KEY or ~/.zadarapy
//! let session = Session::builder().build()?;
//!
//! let free = session.get_free_drives(None, None, &CallOptions::default()).await?;
//! println!("{:?}", free.lookup("disks"));
//!
//! let group = NewRaidGroup::new(
//!     "rg1",
//!     RaidProtection::Raid1,
//!     "volume-00002a73,volume-00002a74",
//! );
//! session.create_raid_group(&group, &CallOptions::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`:
//!
//! ```no_run
//! # use zadara_client::{CallOptions, ClientError, Session};
//! # async fn example(session: Session) {
//! match session.get_pool("pool-00000001", &CallOptions::default()).await {
//!     Ok(pool) => println!("{:?}", pool.lookup("pool")),
//!     Err(ClientError::Status { status: 404, .. }) => println!("Pool not found"),
//!     Err(e) if e.is_runtime() => println!("The array refused: {e}"),
//!     Err(e) => println!("Error: {e}"),
//! }
//! # }
//! ```

pub mod config;
pub mod envelope;
mod error;
mod request;
mod session;
mod transport;
mod types;
pub mod validators;
pub mod vpsa;
pub mod vpsaos;

pub use error::{ClientError, Result};
pub use request::{ApiCall, CallOptions, PreparedRequest, RequestOverride, TRANSPORT_GRACE_SECS};
pub use session::{DEFAULT_TIMEOUT_SECS, Session, SessionBuilder};
pub use transport::ACCEPTED_STATUSES;
pub use types::{
    ApiResponse, Body, MountAccess, PoolMode, PoolType, Query, RaidProtection, ReturnType, YesNo,
};
