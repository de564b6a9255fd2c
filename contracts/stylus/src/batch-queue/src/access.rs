//! Capability checks.

use alloy_primitives::Address;

use crate::{
    errors::{QueueError, Unauthorized},
    host::QueueStore,
};

/// `caller` must hold the owner role.
pub fn ensure_owner<S: QueueStore>(store: &S, caller: Address) -> Result<(), QueueError> {
    let owner = store.owner();
    if owner.is_zero() || caller != owner {
        return Err(QueueError::Unauthorized(Unauthorized { caller }));
    }
    Ok(())
}
