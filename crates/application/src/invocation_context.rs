//! Per-invocation context carried through the dispatcher
//!
//! An `InvocationContext` is built once when an invocation starts and passed
//! explicitly to every service call. It carries the activation id, the
//! platform deadline and the tracing span all log lines of the invocation
//! are recorded in.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use application::InvocationContext;
//!
//! let ctx = InvocationContext::with_time_budget("act-42", Duration::from_secs(30));
//!
//! assert_eq!(ctx.activation_id(), "act-42");
//! assert!(ctx.remaining_millis().is_some());
//! assert!(ctx.diagnostics().starts_with("ActvID act-42 Remaining millis "));
//! ```

use std::time::{Duration, Instant};

use tracing::Span;
use uuid::Uuid;

/// Context for a single invocation
#[derive(Debug, Clone)]
pub struct InvocationContext {
    activation_id: String,
    deadline: Option<Instant>,
    span: Span,
}

impl InvocationContext {
    /// Create a context with an explicit activation id and optional deadline
    #[must_use]
    pub fn new(activation_id: impl Into<String>, deadline: Option<Instant>) -> Self {
        let activation_id = activation_id.into();
        let span = tracing::info_span!("invocation", activation_id = %activation_id);
        Self {
            activation_id,
            deadline,
            span,
        }
    }

    /// Create a context whose deadline is `budget` from now
    #[must_use]
    pub fn with_time_budget(activation_id: impl Into<String>, budget: Duration) -> Self {
        Self::new(activation_id, Instant::now().checked_add(budget))
    }

    /// Create a context with a fresh activation id and no deadline
    ///
    /// Used by the HTTP server, where the platform provides no activation.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().simple().to_string(), None)
    }

    /// Platform activation identifier
    #[must_use]
    pub fn activation_id(&self) -> &str {
        &self.activation_id
    }

    /// Milliseconds left before the platform deadline, if one is known
    #[must_use]
    pub fn remaining_millis(&self) -> Option<u64> {
        self.deadline.map(|deadline| {
            let remaining = deadline.saturating_duration_since(Instant::now());
            u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX)
        })
    }

    /// `ActvID {id} Remaining millis {ms}` for logs and failure replies
    #[must_use]
    pub fn diagnostics(&self) -> String {
        match self.remaining_millis() {
            Some(ms) => format!("ActvID {} Remaining millis {ms}", self.activation_id),
            None => format!("ActvID {} Remaining millis n/a", self.activation_id),
        }
    }

    /// Span every log line of this invocation belongs to
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }
}
