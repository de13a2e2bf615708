use bytes::Bytes;

/// Request extension carrying the opaque identifier of the authenticated
/// session, if any.
///
/// Upstream session middleware inserts this into the request's extensions.
/// The middleware folds the identifier into the content digest so that
/// responses rendered for different sessions never share an ETag value,
/// while responses for the same session (or for no session at all) do.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey(Bytes);

impl SessionKey {
    pub fn new(id: impl Into<Bytes>) -> Self {
        Self(id.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for SessionKey {
    fn from(value: Bytes) -> Self {
        Self(value)
    }
}

impl From<Vec<u8>> for SessionKey {
    fn from(value: Vec<u8>) -> Self {
        Self(Bytes::from(value))
    }
}

impl From<String> for SessionKey {
    fn from(value: String) -> Self {
        Self(Bytes::from(value))
    }
}

impl From<&'static str> for SessionKey {
    fn from(value: &'static str) -> Self {
        Self(Bytes::from_static(value.as_bytes()))
    }
}
