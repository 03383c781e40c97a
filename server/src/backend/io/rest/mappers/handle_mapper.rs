use shared::RecordHandleResponse;

use crate::backend::storage::DocumentHandle;

pub struct HandleMapper;

impl HandleMapper {
    /// Convert a store handle to the response returned after a write
    pub fn to_dto(handle: DocumentHandle) -> RecordHandleResponse {
        RecordHandleResponse {
            id: handle.id,
            path: handle.path,
        }
    }
}
