//! Interactive confirmation

use inquire::{Confirm, InquireError};

use crate::error::{Result, TfConfigError};

/// Ask the user to confirm a change, or skip the question in CI.
///
/// Anything but an explicit yes aborts.
pub fn ask_confirm_or_skip(skip: bool) -> Result<()> {
    if skip {
        tracing::warn!("Confirmation has been skipped via running environment configuration");
        return Ok(());
    }

    let answer = Confirm::new("Do you want to continue?")
        .with_default(false)
        .with_help_message("After this operation configuration will be changed")
        .prompt();

    match answer {
        Ok(true) => Ok(()),
        Ok(false)
        | Err(InquireError::OperationCanceled)
        | Err(InquireError::OperationInterrupted) => Err(TfConfigError::Aborted),
        Err(e) => Err(anyhow::anyhow!("Confirmation failed: {e}").into()),
    }
}
