use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::BoxError;
use crate::framer::WireMessage;

/// A JSON-serialized structured payload.
///
/// Wraps any serde-capable type so it can cross the wire as one frame
/// body. Protocol layers with their own encoding implement
/// [`WireMessage`] directly instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> WireMessage for Json<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_wire(&self) -> std::result::Result<Bytes, BoxError> {
        Ok(Bytes::from(serde_json::to_vec(&self.0)?))
    }

    fn from_wire(bytes: &[u8]) -> std::result::Result<Self, BoxError> {
        Ok(Json(serde_json::from_slice(bytes)?))
    }
}
