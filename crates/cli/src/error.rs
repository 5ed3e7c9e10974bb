//! CLI error type.

use thiserror::Error;

use testmart_storefront::AppError;

use crate::output::OutputError;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A store rejected the operation.
    #[error(transparent)]
    App(#[from] AppError),

    /// The result could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// A form or output file could not be read or written.
    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A form file is not valid YAML or JSON.
    #[error("invalid form file: {0}")]
    Form(#[from] serde_yaml::Error),
}

impl CliError {
    /// One-line message for the terminal, using the storefront's toast text
    /// where there is one.
    pub fn message(&self) -> String {
        match self {
            Self::App(err) => err.notification().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testmart_storefront::services::cart::CartError;

    use super::*;

    #[test]
    fn test_message_uses_notification_text() {
        let err = CliError::from(AppError::from(CartError::InvalidCoupon("BOGUS".into())));
        assert_eq!(
            err.message(),
            "Invalid Coupon: The coupon code you entered is not valid."
        );
    }
}
