//! `t1disk` is a crate to upload files to T1 Disk through its HTTP API.
//!
//! An upload is four requests made one after the other:
//! * login with credentials to get a token,
//! * ask for an upload url for the remote path,
//! * PUT the file bytes to that url,
//! * confirm the upload so the server finalizes it.
//!
//! The token is sent in the `Mountbit-Auth` header of every request after login.
//!
//! ## Example
//!
//! Login once, then upload:
//! ```no_run
//! # async fn run() -> t1disk::Result<()> {
//! let config = t1disk::ClientConfig::new("https://disk.example.com/api");
//! let session = t1disk::Client::new(config)?
//!     .login_session("user@example.com", "password")
//!     .await?;
//!
//! session
//!     .upload_to_t1disk(
//!         "/backups/db.tar",  // the remote path
//!         "db.tar",  // the local file
//!         false,  // multipart
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! With a token obtained elsewhere, pass it to each call:
//! ```no_run
//! # async fn run(token: &str) -> t1disk::Result<()> {
//! let client = t1disk::Client::new(t1disk::ClientConfig::from_env()?)?;
//! client.upload_to_t1disk("/notes.txt", "notes.txt", token, false).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod upload;

pub use api::{LoginInfo, UploadDescriptor};
pub use client::{Client, Session};
pub use config::ClientConfig;
pub use error::{Error, Result, Step};
pub use upload::ProgressListener;
