//! Conversions between domain records and store documents, plus the single
//! place where driven-port failures become domain errors.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use super::Error;
use super::ports::{Document, DocumentStoreError, PasswordHashError, SessionStoreError};

pub(crate) fn to_document<T: Serialize>(value: &T) -> Result<Document, Error> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::internal(format!(
            "expected a JSON object for a document, got {other}"
        ))),
        Err(err) => Err(Error::internal(format!("failed to encode document: {err}"))),
    }
}

pub(crate) fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, Error> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| Error::internal(format!("failed to decode document: {err}")))
}

pub(crate) fn map_document_store_error(err: DocumentStoreError) -> Error {
    error!(error = %err, "document store failure");
    match err {
        DocumentStoreError::Connection { message } => Error::service_unavailable(message),
        DocumentStoreError::Query { message } => Error::internal(message),
        DocumentStoreError::MissingId { collection } => {
            Error::internal(format!("document in {collection} has no id"))
        }
    }
}

pub(crate) fn map_password_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hasher failure");
    Error::internal(err.to_string())
}

pub(crate) fn map_session_store_error(err: SessionStoreError) -> Error {
    error!(error = %err, "session store failure");
    match err {
        SessionStoreError::Unavailable { message } => Error::service_unavailable(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        id: String,
        owner_id: String,
    }

    #[test]
    fn documents_use_camel_case_fields() {
        let sample = Sample {
            id: "a".into(),
            owner_id: "b".into(),
        };
        let document = to_document(&sample).expect("encode");
        assert!(document.contains_key("ownerId"));
        let back: Sample = from_document(document).expect("decode");
        assert_eq!(back, sample);
    }

    #[test]
    fn non_objects_are_rejected() {
        let err = to_document(&42_u8).expect_err("number is not a document");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case(DocumentStoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(DocumentStoreError::query("syntax"), ErrorCode::InternalError)]
    #[case(DocumentStoreError::missing_id("items"), ErrorCode::InternalError)]
    fn store_errors_map_to_codes(#[case] err: DocumentStoreError, #[case] expected: ErrorCode) {
        assert_eq!(map_document_store_error(err).code(), expected);
    }

    #[test]
    fn session_store_outage_is_unavailable() {
        let err = map_session_store_error(SessionStoreError::unavailable("lock poisoned"));
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
