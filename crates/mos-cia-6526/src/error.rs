use thiserror::Error;

use crate::timer::{InputMode, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CiaError {
    /// A running timer is configured to count a source this core does not
    /// emulate (the CNT pin, or timer A underflows gated by CNT).
    #[error("{label}: timer {timer:?} is running with unsupported input mode {mode:?}")]
    UnsupportedInputMode {
        label: &'static str,
        timer: TimerId,
        mode: InputMode,
    },
}
