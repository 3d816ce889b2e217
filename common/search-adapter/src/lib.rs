//! Search Adapter - schema-driven bridge from tool parameters to JSON APIs
//!
//! Every search tool follows the same path:
//!
//! 1. A flat [`Descriptor`] arrives from the MCP layer.
//! 2. The engine's [`EngineSchema`] validates and maps it into
//!    [`QueryParams`] (renames, coercions, bounds, cross-field rules,
//!    credential injection). Nothing is sent if this fails.
//! 3. A [`Transport`] performs exactly one request.
//! 4. The reply is wrapped in an [`Envelope`] that renders as raw JSON,
//!    cleaned JSON, or the engine's readable markdown.
//!
//! # Example
//!
//! ```rust,ignore
//! use search_adapter::{Adapter, Credential, Descriptor, HttpSettings, HttpTransport};
//!
//! let transport = HttpTransport::new(HttpSettings::new("https://serpapi.com"))?;
//! let adapter = Adapter::new(Arc::new(transport), Credential::new(key).unwrap());
//! let envelope = adapter
//!     .invoke(&GOOGLE_SEARCH, Descriptor::new().with("query", "rust"))
//!     .await?;
//! println!("{}", envelope.output());
//! ```

pub mod adapter;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod mapper;
pub mod render;
pub mod schema;
pub mod transport;

pub use adapter::{Adapter, Engine};
pub use descriptor::{split_list, Descriptor, ListParam};
pub use envelope::{clean_json, Envelope, OutputMode, RenderFn};
pub use error::{AdapterError, AdapterResult};
pub use mapper::{map_request, Credential, QueryParams};
pub use schema::{Constraint, EngineSchema, FieldDefault, FieldKind, FieldSpec, UnknownFields};
pub use transport::{Document, HttpSettings, HttpTransport, Transport, DEFAULT_TIMEOUT_SECS};
