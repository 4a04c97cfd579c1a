//! # Retitle Remote
//!
//! Blocking HTTP collaborators for `retitle-core`:
//!
//! - [`TmdbClient`] implements [`retitle_core::MetadataSource`] over the
//!   TMDB v3 API.
//! - [`WordGroupClient`] implements [`retitle_core::RuleStore`] over a
//!   word-group rule API (`/api/v1/wordGroup`, `/api/v1/wordUnit`).
//!
//! ```no_run
//! use retitle_core::{NamingConfig, RuleCompiler, publish};
//! use retitle_remote::{TmdbClient, WordGroupClient};
//!
//! let tmdb = TmdbClient::new("tmdb-read-token")?;
//! let compiler = RuleCompiler::new(NamingConfig::builder("One Piece").build()?)?;
//! let batch = compiler.compile_show_from(&tmdb, 37854)?;
//!
//! let mut store = WordGroupClient::new("http://nas:3000", "auth-token")?;
//! let report = publish(&mut store, &batch)?;
//! println!("{report}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod models;
pub mod tmdb;
pub mod wordgroup;

pub use error::{RemoteError, Result};
pub use tmdb::{DEFAULT_LANGUAGE, TmdbClient};
pub use wordgroup::{WordGroup, WordGroupClient, WordUnit, normalize_base_url, offset_expression};
