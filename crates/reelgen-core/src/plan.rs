//! Subscription plans and the quota policy.
//!
//! This module defines the plan tiers, the read-only user profile consumed
//! from the external billing system, and the pure functions that derive
//! numeric limits from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MediaKind, UserId};

// ============================================================================
// Constants
// ============================================================================

/// Free tier: maximum words per prompt.
pub const FREE_MAX_PROMPT_WORDS: u32 = 50;

/// Free tier: generations per day (across each media kind).
pub const FREE_MAX_GENERATIONS_PER_DAY: u32 = 1;

/// Free tier: maximum video length in seconds.
pub const FREE_MAX_VIDEO_SECONDS: u32 = 10;

/// Free tier: maximum audio length in seconds.
pub const FREE_MAX_AUDIO_SECONDS: u32 = 30;

/// Pro tier: maximum words per prompt.
pub const PRO_MAX_PROMPT_WORDS: u32 = 200;

/// Pro tier: generations per day.
pub const PRO_MAX_GENERATIONS_PER_DAY: u32 = 5;

/// Pro tier: maximum video length in seconds.
pub const PRO_MAX_VIDEO_SECONDS: u32 = 30;

/// Pro tier: maximum audio length in seconds.
pub const PRO_MAX_AUDIO_SECONDS: u32 = 120;

/// Pro-plus tier: maximum words per prompt.
pub const PRO_PLUS_MAX_PROMPT_WORDS: u32 = 500;

/// Pro-plus tier: maximum video length in seconds.
pub const PRO_PLUS_MAX_VIDEO_SECONDS: u32 = 60;

/// Pro-plus tier: maximum audio length in seconds.
pub const PRO_PLUS_MAX_AUDIO_SECONDS: u32 = 300;

/// Available subscription plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Plan {
    /// Free tier: 1 generation/day, short media.
    Free,

    /// Pro plan: 5 generations/day, longer media.
    Pro,

    /// Pro-plus plan: unlimited generations/day.
    ProPlus,
}

impl Plan {
    /// Get the plan name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::ProPlus => "pro-plus",
        }
    }

    /// Daily generation allowance for this plan.
    ///
    /// `None` means unlimited.
    #[must_use]
    pub const fn generations_per_day(&self) -> Option<u32> {
        match self {
            Self::Free => Some(FREE_MAX_GENERATIONS_PER_DAY),
            Self::Pro => Some(PRO_MAX_GENERATIONS_PER_DAY),
            Self::ProPlus => None,
        }
    }
}

/// A user's subscription profile, written by the external billing system.
///
/// This service only ever reads profiles; the plan tier and its expiry are
/// owned by billing. A missing profile is treated as a free-tier profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user ID (from the identity provider).
    pub user_id: UserId,

    /// The subscribed plan tier.
    pub plan: Plan,

    /// When the paid plan lapses. `None` means never (free plans and
    /// open-ended subscriptions).
    pub plan_expires_at: Option<DateTime<Utc>>,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a free-tier profile for a user.
    #[must_use]
    pub fn free(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            plan: Plan::Free,
            plan_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Numeric limits derived from a plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum words allowed in a prompt.
    pub max_prompt_words: u32,

    /// Generations allowed per UTC day, per media kind. `None` = unlimited.
    pub max_generations_per_day: Option<u32>,

    /// Maximum video length in seconds.
    pub max_video_seconds: u32,

    /// Maximum audio length in seconds.
    pub max_audio_seconds: u32,
}

impl Limits {
    /// Maximum media length in seconds for the given kind.
    #[must_use]
    pub const fn max_media_seconds(&self, kind: MediaKind) -> u32 {
        match kind {
            MediaKind::Video => self.max_video_seconds,
            MediaKind::Audio => self.max_audio_seconds,
        }
    }
}

/// Compute the plan a user is effectively on at `now`.
///
/// A non-free plan whose `plan_expires_at` is in the past is treated as
/// `Free`. `now` is an explicit parameter so the policy stays deterministic
/// and testable without touching the wall clock.
#[must_use]
pub fn effective_plan(profile: &UserProfile, now: DateTime<Utc>) -> Plan {
    match profile.plan {
        Plan::Free => Plan::Free,
        plan => match profile.plan_expires_at {
            Some(expires_at) if expires_at < now => Plan::Free,
            _ => plan,
        },
    }
}

/// Derive the numeric limits for a user at `now`.
///
/// Pure function: no side effects, no I/O.
#[must_use]
pub fn limits_for(profile: &UserProfile, now: DateTime<Utc>) -> Limits {
    match effective_plan(profile, now) {
        Plan::Free => Limits {
            max_prompt_words: FREE_MAX_PROMPT_WORDS,
            max_generations_per_day: Some(FREE_MAX_GENERATIONS_PER_DAY),
            max_video_seconds: FREE_MAX_VIDEO_SECONDS,
            max_audio_seconds: FREE_MAX_AUDIO_SECONDS,
        },
        Plan::Pro => Limits {
            max_prompt_words: PRO_MAX_PROMPT_WORDS,
            max_generations_per_day: Some(PRO_MAX_GENERATIONS_PER_DAY),
            max_video_seconds: PRO_MAX_VIDEO_SECONDS,
            max_audio_seconds: PRO_MAX_AUDIO_SECONDS,
        },
        Plan::ProPlus => Limits {
            max_prompt_words: PRO_PLUS_MAX_PROMPT_WORDS,
            max_generations_per_day: None,
            max_video_seconds: PRO_PLUS_MAX_VIDEO_SECONDS,
            max_audio_seconds: PRO_PLUS_MAX_AUDIO_SECONDS,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn profile_with(plan: Plan, expires_at: Option<DateTime<Utc>>) -> UserProfile {
        let mut profile = UserProfile::free(UserId::generate());
        profile.plan = plan;
        profile.plan_expires_at = expires_at;
        profile
    }

    #[test]
    fn free_plan_stays_free() {
        let now = Utc::now();
        let profile = profile_with(Plan::Free, None);
        assert_eq!(effective_plan(&profile, now), Plan::Free);
    }

    #[test]
    fn active_pro_plan_keeps_pro_limits() {
        let now = Utc::now();
        let profile = profile_with(Plan::Pro, Some(now + Duration::days(30)));
        assert_eq!(effective_plan(&profile, now), Plan::Pro);
        assert_eq!(limits_for(&profile, now).max_prompt_words, PRO_MAX_PROMPT_WORDS);
    }

    #[test]
    fn expired_pro_plan_downgrades_to_free() {
        let now = Utc::now();
        let profile = profile_with(Plan::Pro, Some(now - Duration::days(1)));
        assert_eq!(effective_plan(&profile, now), Plan::Free);

        let limits = limits_for(&profile, now);
        assert_eq!(limits.max_prompt_words, FREE_MAX_PROMPT_WORDS);
        assert_eq!(limits.max_generations_per_day, Some(1));
    }

    #[test]
    fn pro_plan_without_expiry_stays_pro() {
        let now = Utc::now();
        let profile = profile_with(Plan::Pro, None);
        assert_eq!(effective_plan(&profile, now), Plan::Pro);
    }

    #[test]
    fn pro_plus_is_unlimited_per_day() {
        let now = Utc::now();
        let profile = profile_with(Plan::ProPlus, Some(now + Duration::days(1)));
        assert_eq!(limits_for(&profile, now).max_generations_per_day, None);
    }

    #[test]
    fn media_limits_differ_per_kind() {
        let now = Utc::now();
        let profile = profile_with(Plan::Free, None);
        let limits = limits_for(&profile, now);
        assert_eq!(limits.max_media_seconds(MediaKind::Video), FREE_MAX_VIDEO_SECONDS);
        assert_eq!(limits.max_media_seconds(MediaKind::Audio), FREE_MAX_AUDIO_SECONDS);
    }

    #[test]
    fn plan_serde_kebab_case() {
        assert_eq!(serde_json::to_string(&Plan::ProPlus).unwrap(), "\"pro-plus\"");
        let parsed: Plan = serde_json::from_str("\"pro-plus\"").unwrap();
        assert_eq!(parsed, Plan::ProPlus);
    }
}
