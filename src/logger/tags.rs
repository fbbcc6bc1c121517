/// Log tags identify the subsystem a message comes from

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Http,
    Rpc,
    Tokens,
    Prices,
    Cache,
    Export,
}

impl LogTag {
    pub const ALL: [LogTag; 8] = [
        LogTag::System,
        LogTag::Config,
        LogTag::Http,
        LogTag::Rpc,
        LogTag::Tokens,
        LogTag::Prices,
        LogTag::Cache,
        LogTag::Export,
    ];

    /// Key used by `--debug <key>`
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Http => "http",
            LogTag::Rpc => "rpc",
            LogTag::Tokens => "tokens",
            LogTag::Prices => "prices",
            LogTag::Cache => "cache",
            LogTag::Export => "export",
        }
    }

    /// Uppercase name used in console and file output
    pub fn to_plain_string(&self) -> String {
        self.to_debug_key().to_uppercase()
    }

    pub fn from_debug_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.iter().copied().find(|tag| tag.to_debug_key() == key)
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
