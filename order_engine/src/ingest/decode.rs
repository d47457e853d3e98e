use crate::{db_types::Order, order_api::errors::DecodeError};

/// Parses a queue payload into an [`Order`].
///
/// Any field other than `order_uid` may be missing and takes its zero value. A payload without a non-blank
/// `order_uid` is rejected, since it could never be stored or looked up.
pub fn decode_order(payload: &[u8]) -> Result<Order, DecodeError> {
    let order: Order = serde_json::from_slice(payload)?;
    if order.order_uid.is_blank() {
        return Err(DecodeError::MissingOrderUid);
    }
    Ok(order)
}
