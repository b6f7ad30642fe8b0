// ── Command API ──
//
// Inbound chat text is classified into a closed `Command` enum before
// anything touches the registry. The router maps each variant to a
// handler and returns an `Outcome`.

pub mod outcome;

pub use outcome::Outcome;

/// Prefix of a MAC registration message (`#aa:bb:cc:dd:ee:ff`).
pub const MAC_PREFIX: char = '#';

/// Prefix of an IP registration message (`@192.168.1.10`).
pub const IP_PREFIX: char = '@';

/// Every instruction a user can send.
///
/// Registration variants carry the raw token after the prefix. It is
/// validated by the handler, not here.
#[derive(Debug, Clone, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    RegisterMac(String),
    RegisterIp(String),
    PowerOn,
    Status,
    Help,
    Ignored,
}

impl Command {
    /// Classify one inbound message.
    ///
    /// Exact commands are matched on the trimmed, lower-cased text first,
    /// then the `#` / `@` prefixes. Anything else is [`Command::Ignored`].
    pub fn classify(text: &str) -> Self {
        let trimmed = text.trim();

        match trimmed.to_lowercase().as_str() {
            "poweron" => return Self::PowerOn,
            "status" => return Self::Status,
            "help" | "?" => return Self::Help,
            _ => {}
        }

        if let Some(token) = trimmed.strip_prefix(MAC_PREFIX) {
            Self::RegisterMac(token.trim().to_owned())
        } else if let Some(token) = trimmed.strip_prefix(IP_PREFIX) {
            Self::RegisterIp(token.trim().to_owned())
        } else {
            Self::Ignored
        }
    }

    /// Stable snake_case name, used as a log field.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
