//! Transport protocol identifiers.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Transport protocol a hosted MCP server speaks to its callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Standard input/output; no network listener is started.
    #[serde(rename = "stdio")]
    Stdio,
    /// Server-Sent Events over HTTP.
    #[default]
    #[serde(rename = "sse")]
    Sse,
    /// Streamable HTTP.
    #[serde(rename = "streamable-http")]
    StreamableHttp,
}

impl Protocol {
    /// Returns the canonical wire string for this protocol.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
            Self::StreamableHttp => "streamable-http",
        }
    }

    /// Returns `true` when the protocol requires a network listener.
    #[must_use]
    pub const fn is_networked(self) -> bool {
        !matches!(self, Self::Stdio)
    }

    /// Returns the front-protocol label expected by catalog consoles.
    #[must_use]
    pub const fn front_protocol(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse | Self::StreamableHttp => "http",
        }
    }

    /// Returns the transport-protocol label expected by catalog consoles.
    #[must_use]
    pub const fn transport_protocol(self) -> &'static str {
        self.front_protocol()
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(Self::Stdio),
            "sse" => Ok(Self::Sse),
            "streamable-http" => Ok(Self::StreamableHttp),
            other => Err(Error::UnknownProtocol {
                value: other.to_owned(),
            }),
        }
    }
}
