//! Handler for the demo session endpoint.

use std::sync::Arc;

use crate::error::CoremindError;
use crate::session::{http, InMemorySessionBackend};

use super::{CommandOutcome, ServeArgs};

/// Handle `coremind serve`.
///
/// Hosts the session resolver over an in-memory backend; a stand-in for the
/// real identity service when developing or testing the CLI.
pub async fn handle_serve(args: &ServeArgs) -> Result<CommandOutcome, CoremindError> {
    let backend = Arc::new(InMemorySessionBackend::new());
    http::serve(args.listen, backend).await?;
    Ok(CommandOutcome::Success)
}
