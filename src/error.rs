use thiserror::Error;

use crate::state::data::ImageId;

/// Contract violations raised by the gating engine.
///
/// These are programming errors on the caller's side (asking for an image
/// outside of the context it was rendered in), never transient conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("image guard context not established")]
    ContextNotEstablished,

    #[error("image {0} is not part of this image guard context")]
    ImageNotInContext(ImageId),
}
