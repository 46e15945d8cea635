use ethers::types::Address;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// `0x` followed by exactly 40 hex digits, case-insensitive.
fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap())
}

#[derive(Clone, Debug)]
pub struct AddressParser {
    pattern: &'static Regex,
}

impl AddressParser {
    pub fn new() -> Self {
        Self {
            pattern: address_pattern(),
        }
    }

    pub fn is_valid(&self, candidate: &str) -> bool {
        self.pattern.is_match(candidate)
    }

    /// Validates the candidate against the fixed pattern and parses it into
    /// an address. Returns `None` for anything that does not match; no RPC
    /// endpoint is ever queried for a rejected candidate.
    pub fn parse(&self, candidate: &str) -> Option<Address> {
        if !self.is_valid(candidate) {
            debug!("Rejected wallet address candidate: {candidate:?}");
            return None;
        }
        candidate.parse::<Address>().ok()
    }
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new()
    }
}
