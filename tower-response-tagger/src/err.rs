use std::{
    error::Error,
    fmt::{Debug, Display},
};

// Error type must implement std::Error else axum will throw
// `the trait bound HandleError<...> is not satisfied`

#[derive(Debug)]
pub enum ResponseTaggerError<InnerError, BodyError> {
    /// The wrapped service failed.
    Inner(InnerError),
    /// The response body could not be read while buffering.
    ReadBody(BodyError),
}

impl<InnerError: Display, BodyError: Display> Display
    for ResponseTaggerError<InnerError, BodyError>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inner(e) => e.fmt(f),
            Self::ReadBody(e) => e.fmt(f),
        }
    }
}

impl<InnerError: Debug + Display, BodyError: Debug + Display> Error
    for ResponseTaggerError<InnerError, BodyError>
{
}
