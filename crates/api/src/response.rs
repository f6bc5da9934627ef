//! Success-response envelope.

use serde::Serialize;

/// Every successful JSON body is `{ "data": ... }`, mirroring the
/// `{ "error", "code" }` shape on failures.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
