//! Replaying adapters that replay recorded interactions.

pub mod command;

pub use command::ReplayingCommandRunner;

use serde::de::DeserializeOwned;

use crate::error::BoxError;

/// Decode a recorded `Result` using the Ok/Err JSON convention.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T>(output: &serde_json::Value) -> Result<T, BoxError>
where
    T: DeserializeOwned,
{
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("malformed cassette output {value}: {e}").into())
}
