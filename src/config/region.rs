//! API regions.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Data-centre region hosting the mail API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Us,
    Eu,
    Au,
}

/// Region ↔ name ↔ base URL, indexed by discriminant.
static REGION_TABLE: [(Region, &str, &str); 3] = [
    (Region::Us, "us", "https://api.us.transactional-mail.net"),
    (Region::Eu, "eu", "https://api.eu.transactional-mail.net"),
    (Region::Au, "au", "https://api.au.transactional-mail.net"),
];

impl Region {
    /// All known regions.
    pub fn all() -> impl Iterator<Item = Region> {
        REGION_TABLE.iter().map(|(region, _, _)| *region)
    }

    fn entry(&self) -> &'static (Region, &'static str, &'static str) {
        &REGION_TABLE[*self as usize]
    }

    /// Short region name.
    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    /// Base URL of the API in this region.
    pub fn base_url(&self) -> &'static str {
        self.entry().2
    }

    /// Inverse of [`Region::base_url`]. A trailing slash is tolerated.
    pub fn from_base_url(url: &str) -> Option<Region> {
        let url = url.trim_end_matches('/');
        REGION_TABLE
            .iter()
            .find(|(_, _, base)| base.eq_ignore_ascii_case(url))
            .map(|(region, _, _)| *region)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        REGION_TABLE
            .iter()
            .find(|(_, n, _)| n.eq_ignore_ascii_case(name))
            .map(|(region, _, _)| *region)
            .ok_or_else(|| ConfigurationError::UnknownRegion {
                value: s.to_string(),
            })
    }
}
