//! Failure containment for pipeline stages and pluggable capabilities.
//!
//! A panicking stage (or a misbehaving `NameTagger` / `PhraseMatcher`)
//! yields an empty result for that stage only; the rest of the parse goes on.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

/// Runs `f`. A panic is logged and becomes `None`.
pub fn try_stage<T>(stage: &str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            warn!(
                stage,
                reason = %panic_reason(payload.as_ref()),
                "Stage failed, substituting an empty result"
            );
            None
        }
    }
}

/// Like [`try_stage`], falling back to the stage's empty value.
pub fn contained<T: Default>(stage: &str, f: impl FnOnce() -> T) -> T {
    try_stage(stage, f).unwrap_or_default()
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        reason.to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "unknown panic".to_string()
    }
}
