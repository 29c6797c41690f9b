//! Error taxonomy shared by binding resolution and routing

use thiserror::Error;

/// Which family of capability providers a resolution was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Command,
    Data,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Command => write!(f, "command"),
            ProviderKind::Data => write!(f, "data"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// No registered provider claimed a positive affinity for the target
    #[error("Couldn't find a {kind} binder for {target}")]
    NoProviderFound {
        kind: ProviderKind,
        target: &'static str,
    },

    /// The chosen provider advertised affinity but could not complete the binding
    #[error("{provider} claimed {target} but couldn't bind it")]
    ProviderRefused {
        provider: &'static str,
        target: &'static str,
    },

    /// A call site passed something the operation can't accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Every view resolution strategy came up empty
    #[error("Couldn't find a view for {view_model}")]
    ViewNotFound { view_model: String },
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
