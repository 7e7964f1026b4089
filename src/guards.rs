//! Predicate / assertion pairs that narrow call outcomes and measurements.
//!
//! All of them only borrow their argument and do no I/O.

use crate::error::GlobalpingError;
use crate::outcome::Outcome;
use crate::types::typed::{MeasurementKind, TypedMeasurement};
use crate::types::{FinishedMeasurement, MeasurementResponse, MeasurementStatus, MeasurementType};

/// `true` when the response behind `outcome` has status `status`.
pub fn is_http_status<T, E>(status: u16, outcome: &Outcome<T, E>) -> bool {
    outcome.status().as_u16() == status
}

/// Fails with [`GlobalpingError::UnexpectedHttpStatus`] unless
/// [`is_http_status`] holds.
pub fn assert_http_status<T, E>(status: u16, outcome: &Outcome<T, E>) -> Result<(), GlobalpingError> {
    if is_http_status(status, outcome) {
        Ok(())
    } else {
        Err(GlobalpingError::UnexpectedHttpStatus {
            expected: status,
            actual: outcome.status().as_u16(),
        })
    }
}

pub fn is_measurement_type(kind: MeasurementType, measurement: &MeasurementResponse) -> bool {
    measurement.kind == kind
}

/// Narrows `measurement` to the options and result shapes of `K`.
///
/// ```no_run
/// # fn demo(m: &globalping::MeasurementResponse) -> Result<(), globalping::GlobalpingError> {
/// use globalping::typed::Ping;
///
/// let ping = globalping::assert_measurement_type::<Ping>(m)?;
/// for result in ping.finished_results() {
///     println!("avg rtt: {:?}", result.stats.avg);
/// }
/// # Ok(())
/// # }
/// ```
pub fn assert_measurement_type<K: MeasurementKind>(
    measurement: &MeasurementResponse,
) -> Result<TypedMeasurement<K>, GlobalpingError> {
    TypedMeasurement::from_response(measurement)
}

pub fn is_measurement_finished(measurement: &MeasurementResponse) -> bool {
    measurement.status == MeasurementStatus::Finished
}

/// Narrows `measurement` to a [`FinishedMeasurement`], or fails with
/// [`GlobalpingError::UnexpectedMeasurementStatus`] unless it has finished.
///
/// Per-probe results can still be `failed` or `offline` inside a finished
/// measurement; combine with [`assert_measurement_type`] to read them typed.
pub fn assert_measurement_finished(
    measurement: &MeasurementResponse,
) -> Result<FinishedMeasurement<'_>, GlobalpingError> {
    if is_measurement_finished(measurement) {
        Ok(FinishedMeasurement::new(measurement))
    } else {
        Err(GlobalpingError::UnexpectedMeasurementStatus {
            expected: MeasurementStatus::Finished,
            actual: measurement.status,
        })
    }
}
