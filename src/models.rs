//! Remote payload shapes and local response types
//!
//! The Risingstones API is a third-party contract that changes without notice.
//! Only the fields this crate actually consumes are typed; everything else is
//! carried along in `extra` so snapshots keep the full payload. Consumed
//! fields accept both a missing key and an explicit `null` as their default.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Success sentinel used by the remote API and by our own envelope
pub const SUCCESS_CODE: i64 = 10000;

/// Read `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Persisted credentials: `{ "user_agent": ..., "cookie": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Credentials {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_agent: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cookie: String,
}

impl Credentials {
    /// Apply a partial update: empty incoming fields leave the current value alone.
    ///
    /// Returns `true` if anything changed.
    pub fn merge(&mut self, update: &Credentials) -> bool {
        let mut changed = false;
        if !update.user_agent.is_empty() && update.user_agent != self.user_agent {
            self.user_agent = update.user_agent.clone();
            changed = true;
        }
        if !update.cookie.is_empty() && update.cookie != self.cookie {
            self.cookie = update.cookie.clone();
            changed = true;
        }
        changed
    }

    pub fn has_cookie(&self) -> bool {
        !self.cookie.is_empty()
    }
}

/// Response of the user-info endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoResp {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: UserInfoData,
}

/// The character block of a user-info response
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserInfoData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub area_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "characterDetail")]
    pub character_detail: Vec<CharacterDetail>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `characterDetail`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CharacterDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub character_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub play_time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the monthly sign-in reward list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardListResp {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<RewardItem>,
}

/// One monthly sign-in reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_name: String,
    /// 0 = claimable, 1 = already claimed, anything else = not yet eligible
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_get: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Claim state derived from `is_get`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardState {
    Claimable,
    Claimed,
    Ineligible,
}

impl RewardItem {
    pub fn state(&self) -> RewardState {
        match self.is_get {
            0 => RewardState::Claimable,
            1 => RewardState::Claimed,
            _ => RewardState::Ineligible,
        }
    }
}

/// Body of the reward-claim POST
#[derive(Debug, Clone, Serialize)]
pub struct ClaimRequest {
    pub id: i64,
    pub month: String,
}

/// Outcome buckets of the sign-in + claim-all flow, as item names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClaimSummary {
    pub unavailable: Vec<String>,
    pub available: Vec<String>,
    pub claimed: Vec<String>,
    pub success: Vec<String>,
    pub fail: Vec<String>,
}

/// Envelope of the search endpoint; `data` is decoded in a second pass
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Value,
}

/// One row of a user search page
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub area_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Search hit returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub uuid: String,
    pub user_name: String,
    pub group_name: String,
    pub area_name: String,
}

impl From<UserProfile> for UserInfo {
    fn from(profile: UserProfile) -> Self {
        Self {
            uuid: profile.uuid,
            user_name: profile.character_name,
            group_name: profile.group_name,
            area_name: profile.area_name,
        }
    }
}

/// Parsed character summary served by `/ff_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FfInfo {
    pub character_name: String,
    /// Total play time in minutes
    pub play_time: i64,
}

/// Service status served by `/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusData {
    pub has_data: bool,
    pub has_cookie: bool,
    pub last_fetch_at: String,
    pub next_fetch_at: String,
    pub fetch_interval: String,
}

/// Game data-center regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Chocobo,
    Moogle,
    FatCat,
    Shiba,
}

impl Region {
    /// Resolve a short alias or full name
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "n" | "鸟" | "陆行鸟" => Some(Self::Chocobo),
            "m" | "猫" | "猫小胖" => Some(Self::FatCat),
            "g" | "狗" | "豆豆柴" => Some(Self::Shiba),
            "z" | "猪" | "莫古力" => Some(Self::Moogle),
            _ => None,
        }
    }

    /// Canonical name as the remote API reports it in `area_name`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chocobo => "陆行鸟",
            Self::FatCat => "猫小胖",
            Self::Shiba => "豆豆柴",
            Self::Moogle => "莫古力",
        }
    }

    pub fn all() -> [Self; 4] {
        [Self::Chocobo, Self::Moogle, Self::FatCat, Self::Shiba]
    }
}

/// Canonical region name for an alias, or an empty string when unknown
pub fn area_name(alias: &str) -> &'static str {
    Region::from_alias(alias).map_or("", |r| r.as_str())
}
