pub mod error;

pub use error::{
    BlogError, ErrorCategory, ErrorClassifier, ParseError, ParseErrorKind, ProviderError,
    PublishAttemptError, PublishFailureKind, Result,
};
