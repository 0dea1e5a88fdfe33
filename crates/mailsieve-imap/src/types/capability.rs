//! Server capabilities and completion status.

/// Status of a completion (tagged) or status (untagged) response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command completed successfully.
    Ok,
    /// Command failed for operational reasons.
    No,
    /// Command was malformed or not valid in this state.
    Bad,
    /// Greeting for a pre-authenticated connection.
    PreAuth,
    /// Server is closing the connection.
    Bye,
}

impl Status {
    /// Parses a status keyword, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OK" => Some(Self::Ok),
            "NO" => Some(Self::No),
            "BAD" => Some(Self::Bad),
            "PREAUTH" => Some(Self::PreAuth),
            "BYE" => Some(Self::Bye),
            _ => None,
        }
    }

    /// Returns true for OK and PREAUTH.
    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok | Self::PreAuth)
    }
}

/// Server capability advertised in a greeting or CAPABILITY response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `IMAP4rev1` (RFC 3501).
    Imap4Rev1,
    /// `IMAP4rev2` (RFC 9051).
    Imap4Rev2,
    /// LITERAL+ non-synchronizing literals (RFC 7888).
    LiteralPlus,
    /// LOGIN is disabled on this connection.
    LoginDisabled,
    /// STARTTLS is offered.
    StartTls,
    /// SASL mechanism.
    Auth(String),
    /// Anything else, kept verbatim.
    Other(String),
}

impl Capability {
    /// Parses a capability atom.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            "IMAP4REV1" => Self::Imap4Rev1,
            "IMAP4REV2" => Self::Imap4Rev2,
            "LITERAL+" => Self::LiteralPlus,
            "LOGINDISABLED" => Self::LoginDisabled,
            "STARTTLS" => Self::StartTls,
            _ => upper
                .strip_prefix("AUTH=")
                .map_or_else(|| Self::Other(s.to_string()), |m| Self::Auth(m.to_string())),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imap4Rev1 => f.write_str("IMAP4rev1"),
            Self::Imap4Rev2 => f.write_str("IMAP4rev2"),
            Self::LiteralPlus => f.write_str("LITERAL+"),
            Self::LoginDisabled => f.write_str("LOGINDISABLED"),
            Self::StartTls => f.write_str("STARTTLS"),
            Self::Auth(mech) => write!(f, "AUTH={mech}"),
            Self::Other(s) => f.write_str(s),
        }
    }
}
