use bincode::Options as _;
use fractic_server_error::ServerError;

use crate::{
    entities::{Moment, TransactionMetadata},
    errors::{InvalidTransactionMetadata, MetadataEncodingFailed, ReservedRemovalReference},
};

/// Stored in place of a moment when the transaction removes nothing.
const NO_REMOVAL: i64 = -1;

/// Wire shape of the metadata blob attached to each ledger transaction.
#[derive(Debug, serde_derive::Serialize, serde_derive::Deserialize)]
pub(crate) struct TransactionMetadataModel {
    memo: String,
    removes: i64,
}

fn options() -> impl bincode::Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

impl From<TransactionMetadataModel> for TransactionMetadata {
    fn from(model: TransactionMetadataModel) -> Self {
        TransactionMetadata {
            memo: model.memo,
            removes: match model.removes {
                NO_REMOVAL => None,
                r => Some(Moment(r)),
            },
        }
    }
}

impl TryFrom<&TransactionMetadata> for TransactionMetadataModel {
    type Error = ServerError;

    fn try_from(m: &TransactionMetadata) -> Result<Self, Self::Error> {
        let removes = match m.removes {
            None => NO_REMOVAL,
            Some(Moment(NO_REMOVAL)) => return Err(ReservedRemovalReference::new(NO_REMOVAL)),
            Some(moment) => moment.0,
        };
        Ok(Self {
            memo: m.memo.clone(),
            removes,
        })
    }
}

/// Decodes the metadata blob of the transaction at `moment`. Truncated or
/// otherwise malformed payloads are rejected rather than defaulted.
pub fn decode_metadata(moment: Moment, bytes: &[u8]) -> Result<TransactionMetadata, ServerError> {
    let model: TransactionMetadataModel = options()
        .deserialize(bytes)
        .map_err(|e| InvalidTransactionMetadata::with_debug(moment.0, "malformed payload", &e))?;
    Ok(model.into())
}

pub fn encode_metadata(metadata: &TransactionMetadata) -> Result<Vec<u8>, ServerError> {
    let model = TransactionMetadataModel::try_from(metadata)?;
    options()
        .serialize(&model)
        .map_err(|e| MetadataEncodingFailed::with_debug(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_removal_encodes_as_sentinel() {
        let bytes = encode_metadata(&TransactionMetadata::new("rent")).unwrap();
        let model: TransactionMetadataModel = options().deserialize(&bytes).unwrap();
        assert_eq!(model.removes, -1);

        let decoded = decode_metadata(Moment(1), &bytes).unwrap();
        assert_eq!(decoded.memo, "rent");
        assert_eq!(decoded.removes, None);
    }

    #[test]
    fn removal_reference_survives_decoding() {
        let bytes = encode_metadata(&TransactionMetadata::removing("adj", Moment(42))).unwrap();
        let decoded = decode_metadata(Moment(2), &bytes).unwrap();
        assert_eq!(decoded.removes, Some(Moment(42)));
    }

    #[test]
    fn zero_is_a_real_reference_not_absence() {
        let bytes = encode_metadata(&TransactionMetadata::removing("adj", Moment(0))).unwrap();
        assert_eq!(decode_metadata(Moment(3), &bytes).unwrap().removes, Some(Moment(0)));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let bytes = encode_metadata(&TransactionMetadata::new("office supplies")).unwrap();
        assert!(decode_metadata(Moment(4), &bytes[..bytes.len() - 3]).is_err());
        assert!(decode_metadata(Moment(4), &[]).is_err());
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let mut bytes = encode_metadata(&TransactionMetadata::new("rent")).unwrap();
        bytes.push(0xff);
        assert!(decode_metadata(Moment(5), &bytes).is_err());
    }

    #[test]
    fn pre_epoch_reference_is_passed_through() {
        let bytes = options()
            .serialize(&TransactionMetadataModel {
                memo: "x".into(),
                removes: -7,
            })
            .unwrap();
        let decoded = decode_metadata(Moment(6), &bytes).unwrap();
        assert_eq!(decoded.removes, Some(Moment(-7)));
        assert_eq!(decoded.removes.unwrap().to_string(), "-7");
    }

    #[test]
    fn sentinel_cannot_be_encoded_as_a_reference() {
        let metadata = TransactionMetadata::removing("x", Moment(NO_REMOVAL));
        assert!(encode_metadata(&metadata).is_err());
    }
}
