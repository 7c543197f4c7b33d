//! Domain operations against the Risingstones site
//!
//! [`RisingStonesService`] wraps the API client with the flows the scheduler
//! and HTTP layer need: profile refresh with snapshot caching, daily sign-in,
//! the monthly reward list, reward claiming, and user search.

pub mod search;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::client::{Endpoint, RawResponse, RisingStonesClient};
use crate::error::{Error, Result};
use crate::models::{
    ClaimRequest, ClaimSummary, FfInfo, RewardItem, RewardListResp, RewardState, StatusData,
    UserInfoResp, SUCCESS_CODE,
};
use crate::store::ConfigStore;
use crate::utils::{
    current_month, format_interval, format_timestamp, parse_play_time_to_minutes, prettify_json,
    truncate_text,
};

const LOG_PREVIEW_CHARS: usize = 500;

/// Orchestrates multi-step flows on top of [`RisingStonesClient`]
pub struct RisingStonesService {
    client: RisingStonesClient,
    store: Arc<ConfigStore>,
}

impl RisingStonesService {
    pub fn new(client: RisingStonesClient) -> Self {
        let store = Arc::clone(client.store());
        Self { client, store }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Fetch the session's own character and replace the cached snapshot
    ///
    /// The snapshot is only replaced once the payload decoded cleanly and the
    /// remote reported success.
    pub async fn fetch_profile(&self) -> Result<UserInfoResp> {
        info!("Fetching profile");

        let response = self
            .client
            .get(Endpoint::UserInfo, &[])
            .await
            .and_then(RawResponse::error_for_status)
            .map_err(|e| Error::fetch("fetching user info", e))?;

        let profile: UserInfoResp = decode_checked("user info", &response.body)
            .map_err(|e| Error::fetch("fetching user info", e))?;

        let pretty = prettify_json(&response.body);
        info!(
            character = %profile.data.character_name,
            preview = %truncate_text(&String::from_utf8_lossy(&pretty), LOG_PREVIEW_CHARS),
            "Profile fetched"
        );

        self.store.store_snapshot(pretty).await?;
        info!(path = %self.store.snapshot_path().display(), "Snapshot saved");

        Ok(profile)
    }

    /// Daily sign-in; the remote answer is returned verbatim
    pub async fn sign_in(&self) -> Result<Vec<u8>> {
        info!("Signing in");

        let response = self
            .client
            .post(Endpoint::SignIn, &[], None)
            .await
            .and_then(RawResponse::error_for_status)?;

        info!(response = %truncate_text(&response.text(), LOG_PREVIEW_CHARS), "Sign-in answered");
        Ok(response.body)
    }

    /// Rewards of the current month, in remote order
    pub async fn list_monthly_rewards(&self) -> Result<Vec<RewardItem>> {
        let month = current_month();
        info!(month = %month, "Listing sign-in rewards");

        let response = self
            .client
            .get(Endpoint::RewardList, &[("month", month)])
            .await
            .and_then(RawResponse::error_for_status)
            .map_err(|e| Error::fetch("listing sign-in rewards", e))?;

        let list: RewardListResp = decode_checked("reward list", &response.body)
            .map_err(|e| Error::fetch("listing sign-in rewards", e))?;

        Ok(list.data)
    }

    /// Claim one reward of the current month; the remote answer is returned verbatim
    pub async fn claim_reward(&self, id: i64) -> Result<Vec<u8>> {
        info!(id, "Claiming sign-in reward");

        let body = serde_json::to_value(ClaimRequest {
            id,
            month: current_month(),
        })
        .map_err(|e| Error::Validation(format!("claim request could not be encoded: {e}")))?;

        let response = self
            .client
            .post(Endpoint::ClaimReward, &[], Some(&body))
            .await
            .and_then(RawResponse::error_for_status)?;

        info!(id, response = %truncate_text(&response.text(), LOG_PREVIEW_CHARS), "Claim answered");
        Ok(response.body)
    }

    /// Sign in, then claim every claimable reward of the month
    ///
    /// Sign-in or list failures abort before any claim. Claims run in list
    /// order and stop at the first failure; the partial summary travels in
    /// `Error::ClaimAborted`.
    pub async fn sign_in_and_claim_all(&self) -> Result<ClaimSummary> {
        info!("Starting sign-in and reward claim");

        if let Err(e) = self.sign_in().await {
            error!(error = %e, "Sign-in failed, skipping rewards");
            return Err(e);
        }

        let rewards = match self.list_monthly_rewards().await {
            Ok(rewards) => rewards,
            Err(e) => {
                error!(error = %e, "Reward list unavailable, skipping claims");
                return Err(e);
            }
        };

        let (mut summary, claimable) = partition_rewards(&rewards);

        for reward in claimable {
            match self.claim_reward(reward.id).await {
                Ok(_) => {
                    info!(item = %reward.item_name, "Reward claimed");
                    summary.success.push(reward.item_name.clone());
                }
                Err(e) => {
                    error!(item = %reward.item_name, error = %e, "Reward claim failed, stopping");
                    summary.fail.push(reward.item_name.clone());
                    return Err(Error::ClaimAborted {
                        summary,
                        source: Box::new(e),
                    });
                }
            }
        }

        info!(
            claimed = summary.success.len(),
            already = summary.claimed.len(),
            pending = summary.unavailable.len(),
            "Reward processing finished"
        );
        Ok(summary)
    }

    /// Character binding info of the session account
    pub async fn fetch_bind_info(&self) -> Result<Value> {
        let response = self
            .client
            .get(Endpoint::BindInfo, &[("platform", "2".to_string())])
            .await
            .and_then(RawResponse::error_for_status)
            .map_err(|e| Error::fetch("fetching bind info", e))?;

        serde_json::from_slice(&response.body)
            .map_err(|e| Error::fetch("fetching bind info", Error::decode("bind info", e)))
    }

    /// Character name and play time from the cached snapshot
    pub async fn ff_info(&self) -> Result<FfInfo> {
        let bytes = self.store.snapshot_bytes().await?;
        let profile: UserInfoResp =
            serde_json::from_slice(&bytes).map_err(|e| Error::decode("profile snapshot", e))?;

        let play_time = profile
            .data
            .character_detail
            .first()
            .map_or(0, |detail| parse_play_time_to_minutes(&detail.play_time));

        Ok(FfInfo {
            character_name: profile.data.character_name,
            play_time,
        })
    }

    /// Cache and credential status
    pub async fn status(&self, fetch_interval: Duration) -> StatusData {
        let last = self.store.last_fetch_at().await;
        let next = last.and_then(|at| {
            chrono::Duration::from_std(fetch_interval)
                .ok()
                .map(|interval| at + interval)
        });

        StatusData {
            has_data: self.store.has_data().await,
            has_cookie: self.store.has_cookie().await,
            last_fetch_at: format_timestamp(last),
            next_fetch_at: format_timestamp(next),
            fetch_interval: format_interval(fetch_interval),
        }
    }
}

/// Split rewards into summary buckets and the claimable queue, keeping order
pub fn partition_rewards(rewards: &[RewardItem]) -> (ClaimSummary, Vec<&RewardItem>) {
    let mut summary = ClaimSummary::default();
    let mut claimable = Vec::new();

    for reward in rewards {
        match reward.state() {
            RewardState::Claimable => {
                summary.available.push(reward.item_name.clone());
                claimable.push(reward);
            }
            RewardState::Claimed => summary.claimed.push(reward.item_name.clone()),
            RewardState::Ineligible => summary.unavailable.push(reward.item_name.clone()),
        }
    }

    (summary, claimable)
}

/// Decode a `{code, msg, data}` payload, rejecting non-success codes
pub(crate) fn decode_checked<T: DeserializeOwned>(what: &'static str, body: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(body).map_err(|e| Error::decode(what, e))?;

    let code = value.get("code").and_then(Value::as_i64).unwrap_or_default();
    if code != SUCCESS_CODE {
        let msg = value
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        warn!(what, code, msg = %msg, "Remote API reported failure");
        return Err(Error::Remote { code, msg });
    }

    serde_json::from_value(value).map_err(|e| Error::decode(what, e))
}
