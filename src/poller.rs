//! Waits for a measurement to leave `in-progress`.
//!
//! The measurement is re-fetched every [`POLL_INTERVAL`] with the last ETag
//! as `If-None-Match`. A `304` keeps the previously known body. The whole
//! wait is bounded by [`POLL_BUDGET`], independently of the per-request
//! timeout of each fetch.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace, warn};

use crate::config::ErrorPolicy;
use crate::error::GlobalpingError;
use crate::guards::assert_measurement_finished;
use crate::normalize::normalize;
use crate::outcome::{Outcome, RawResponse};
use crate::types::{MeasurementResponse, MeasurementStatus};

/// Pause between two fetches of the same measurement.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Longest time a measurement may stay `in-progress` before giving up.
pub const POLL_BUDGET: Duration = Duration::from_secs(60);

/// Fetches the current representation of a measurement.
pub(crate) trait MeasurementSource {
    async fn fetch_measurement(
        &self,
        id: &str,
        etag: Option<HeaderValue>,
    ) -> Result<RawResponse<MeasurementResponse>, GlobalpingError>;
}

/// Poller state, moved into every iteration.
struct PollState {
    last: RawResponse<MeasurementResponse>,
    started: Instant,
}

impl PollState {
    fn in_progress(&self) -> bool {
        self.last
            .data
            .as_ref()
            .is_some_and(|m| m.status == MeasurementStatus::InProgress)
    }

    fn validator(&self) -> Option<HeaderValue> {
        self.last.response.etag().cloned()
    }

    /// Replaces the known body unless `next` is a `304`.
    fn advance(self, next: RawResponse<MeasurementResponse>) -> Self {
        if next.response.status == StatusCode::NOT_MODIFIED {
            self
        } else {
            Self { last: next, ..self }
        }
    }
}

fn saturating_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Polls `id` until it reaches a terminal status, then normalizes the last
/// known response and checks that the measurement finished.
///
/// Fetches are strictly sequential. A response without a measurement body
/// (an API error) ends the wait and is normalized like any other call.
pub(crate) async fn await_completion<S: MeasurementSource>(
    source: &S,
    id: &str,
    policy: ErrorPolicy,
) -> Result<Outcome<MeasurementResponse>, GlobalpingError> {
    let started = Instant::now();
    let mut state = PollState {
        last: source.fetch_measurement(id, None).await?,
        started,
    };
    let mut fetches: u32 = 1;

    while state.in_progress() {
        if state.started.elapsed() > POLL_BUDGET {
            warn!(id, fetches, "measurement still in progress after {:?}", POLL_BUDGET);
            return Err(GlobalpingError::PollingTimeout { id: id.to_string() });
        }

        sleep(POLL_INTERVAL).await;
        let next = source.fetch_measurement(id, state.validator()).await?;
        fetches += 1;

        if next.response.status == StatusCode::NOT_MODIFIED {
            trace!(id, fetches, "measurement not modified");
        }
        state = state.advance(next);
    }

    debug!(
        id,
        fetches,
        elapsed_ms = saturating_millis(state.started.elapsed()),
        "measurement left in-progress"
    );

    let outcome = normalize(state.last, policy)?;
    if let Outcome::Success(reply) = &outcome {
        assert_measurement_finished(&reply.data)?;
    }
    Ok(outcome)
}
