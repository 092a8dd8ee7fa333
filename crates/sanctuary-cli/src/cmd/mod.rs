use anyhow::Context;
use chrono::NaiveDateTime;
use sanctuary_core::event::parse_timestamp;
use std::future::Future;

pub mod config;
pub mod daily;
pub mod events;
pub mod init;
pub mod next;
pub mod reference;
pub mod theme;
pub mod verse;

/// `--at` if given, otherwise the local wall clock.
pub fn resolve_now(at: Option<&str>) -> anyhow::Result<NaiveDateTime> {
    match at {
        Some(raw) => parse_timestamp(raw).with_context(|| format!("invalid --at value '{raw}'")),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

/// Drive `fut` to completion from synchronous command code.
pub fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    match tokio::runtime::Handle::try_current() {
        // Already inside a runtime (e.g., integration test)
        Ok(handle) => Ok(tokio::task::block_in_place(|| handle.block_on(fut))),
        Err(_) => {
            tracing::debug!("using new tokio runtime");
            let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            Ok(rt.block_on(fut))
        }
    }
}
