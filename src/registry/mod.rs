//! Machine registry subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request path
//!     → routing extracts machine id
//!     → MachineRegistry::machine(id)   (fresh lookup, never cached)
//!     → MachineDescriptor (port → server map)
//!     → routing picks the extension API server address
//! ```
//!
//! # Design Decisions
//! - The registry is an external collaborator: this subsystem only reads
//!   machine metadata, it never creates, starts, or stops machines
//! - Injected as `Arc<dyn MachineRegistry>` at construction; no singletons
//! - Two implementations: a remote machine API client and a fixed map

pub mod http;
pub mod machine;
pub mod memory;

pub use http::HttpMachineRegistry;
pub use machine::{MachineDescriptor, MachineRegistry, RegistryError, ServerDescriptor};
pub use memory::InMemoryRegistry;
