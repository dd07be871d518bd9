//! Simulation session controller for the Ivy front-end.
//!
//! A [`Session`] drives the Icarus Verilog compiler and runtime and the
//! GTKWave viewer as external processes. It owns a temporary workspace for
//! the generated settings file, the compiled object and the waveform dump,
//! tracks the simulation lifecycle in a [`SimulationState`], and streams
//! tool output into a [`Transcript`].
//!
//! Front-ends call the explicit command methods ([`Session::regenerate`],
//! [`Session::compile`], [`Session::run`], [`Session::view_wave`]) and call
//! [`Session::poll`] from their event loop at [`Session::poll_interval`] to
//! drain a running simulation without blocking.
//!
//! ```ignore
//! let mut session = Session::new(config, resolver, MemoryTranscript::new())?;
//! session.regenerate()?;
//! if session.compile()?.succeeded() {
//!     session.run()?;
//!     while !matches!(session.poll()?, PollOutcome::Finished { .. }) {
//!         std::thread::sleep(session.poll_interval());
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod command;
pub mod editor;
pub mod error;
pub mod pump;
pub mod resolver;
pub mod session;
pub mod state;
pub mod tool;
pub mod transcript;
pub mod workspace;

pub use command::{CommandBuilder, ToolCommand};
pub use editor::{Editor, ExternalEditor};
pub use error::{ResolveError, SessionError};
pub use pump::{OutputPump, PumpPoll};
pub use resolver::{resolver_for, DependencyResolver, SourceDirResolver, StaticResolver};
pub use session::{CompileOutcome, PollOutcome, Session, SessionConfig};
pub use state::{Action, SimulationState};
pub use tool::{Tool, ToolSet};
pub use transcript::{MemoryTranscript, StdoutTranscript, Transcript};
pub use workspace::SessionWorkspace;
