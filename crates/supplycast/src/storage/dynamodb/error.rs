//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `supplycast_core::storage`. The
//! SDK's own rendering of the error is kept as the message.

use std::error::Error as StdError;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use supplycast_core::storage::StoreError;

/// Error codes DynamoDB uses when the caller should back off and retry.
const TRANSIENT_CODES: &[&str] = &[
    "ThrottlingException",
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
    "InternalServerError",
    "ServiceUnavailable",
    "TransactionConflictException",
];

/// Whether a service error code means the store is temporarily unavailable.
pub fn is_transient_code(code: Option<&str>) -> bool {
    code.is_some_and(|code| TRANSIENT_CODES.contains(&code))
}

/// Classify an SDK error.
///
/// Transport failures (dispatch, timeout, bad response) and transient service
/// errors are `Unavailable`. Requests the SDK could not build and every other
/// service error are `Rejected`.
fn map_sdk_error<E, R>(err: SdkError<E, R>, transient: fn(&E) -> bool) -> StoreError
where
    E: StdError + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ServiceError(context) if transient(context.err()) => {
            StoreError::Unavailable(message)
        }
        SdkError::ServiceError(_) | SdkError::ConstructionFailure(_) => {
            StoreError::Rejected(message)
        }
        _ => StoreError::Unavailable(message),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    map_sdk_error(err, |e: &PutItemError| match e {
        PutItemError::ProvisionedThroughputExceededException(_)
        | PutItemError::RequestLimitExceeded(_)
        | PutItemError::InternalServerError(_)
        | PutItemError::TransactionConflictException(_) => true,
        e => is_transient_code(e.code()),
    })
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> StoreError {
    map_sdk_error(err, |e: &DeleteItemError| match e {
        DeleteItemError::ProvisionedThroughputExceededException(_)
        | DeleteItemError::RequestLimitExceeded(_)
        | DeleteItemError::InternalServerError(_)
        | DeleteItemError::TransactionConflictException(_) => true,
        e => is_transient_code(e.code()),
    })
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> StoreError {
    map_sdk_error(err, |e: &QueryError| match e {
        QueryError::ProvisionedThroughputExceededException(_)
        | QueryError::RequestLimitExceeded(_)
        | QueryError::InternalServerError(_) => true,
        e => is_transient_code(e.code()),
    })
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> StoreError {
    map_sdk_error(err, |e: &ScanError| match e {
        ScanError::ProvisionedThroughputExceededException(_)
        | ScanError::RequestLimitExceeded(_)
        | ScanError::InternalServerError(_) => true,
        e => is_transient_code(e.code()),
    })
}

/// Map an error from a table administration call (describe, create).
pub fn map_table_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: StdError + ProvideErrorMetadata + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    map_sdk_error(err, |e: &E| is_transient_code(e.code()))
}
