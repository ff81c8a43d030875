// Selection of ONUs that have been online long enough to warrant a reboot.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use tracing::warn;

use crate::models::OnuStatus;

/// Format of `last_status_change` in status records.
pub const LAST_STATUS_CHANGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status value of a reachable ONU. Compared exactly.
pub const ONLINE: &str = "Online";

/// Uptime after which an ONU is due for a reboot.
pub const DEFAULT_REBOOT_AFTER_DAYS: i64 = 14;

pub fn default_reboot_age() -> TimeDelta {
    TimeDelta::days(DEFAULT_REBOOT_AFTER_DAYS)
}

/// Ids of ONUs that are `"Online"` and whose last status change is
/// strictly older than `now - max_age`.
///
/// A record with an unparseable timestamp is logged and skipped; it does not
/// abort the scan. A `max_age` reaching past the earliest representable
/// instant selects nothing.
pub fn stale_online_onus(
    statuses: &[OnuStatus],
    now: DateTime<Utc>,
    max_age: TimeDelta,
) -> Vec<String> {
    let Some(cutoff) = now.checked_sub_signed(max_age) else {
        return Vec::new();
    };

    statuses
        .iter()
        .filter(|onu| onu.status == ONLINE)
        .filter_map(|onu| {
            match NaiveDateTime::parse_from_str(&onu.last_status_change, LAST_STATUS_CHANGE_FORMAT)
            {
                Ok(changed) => (changed.and_utc() < cutoff).then(|| onu.id.clone()),
                Err(e) => {
                    warn!(
                        id = %onu.id,
                        last_status_change = %onu.last_status_change,
                        error = %e,
                        "skipping ONU with unparseable status timestamp"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::TimeZone;

    use super::*;

    fn status(id: &str, state: &str, changed: &str) -> OnuStatus {
        OnuStatus {
            id: id.into(),
            status: state.into(),
            last_status_change: changed.into(),
            ..OnuStatus::default()
        }
    }

    fn fmt(ts: DateTime<Utc>) -> String {
        ts.format(LAST_STATUS_CHANGE_FORMAT).to_string()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn selects_only_long_running_online_onus() {
        let statuses = [
            status("1", "Online", &fmt(now() - TimeDelta::days(20))),
            status("2", "Offline", &fmt(now() - TimeDelta::days(20))),
        ];

        let ids = stale_online_onus(&statuses, now(), default_reboot_age());

        assert_eq!(ids, vec!["1".to_string()]);
    }

    #[test]
    fn recent_change_is_not_selected() {
        let statuses = [status("1", "Online", &fmt(now() - TimeDelta::days(3)))];

        assert!(stale_online_onus(&statuses, now(), default_reboot_age()).is_empty());
    }

    #[test]
    fn exactly_at_cutoff_is_not_selected() {
        let statuses = [status("1", "Online", &fmt(now() - default_reboot_age()))];

        assert!(stale_online_onus(&statuses, now(), default_reboot_age()).is_empty());
    }

    #[test]
    fn status_match_is_exact() {
        let old = fmt(now() - TimeDelta::days(30));
        let statuses = [
            status("1", "online", &old),
            status("2", "Online ", &old),
            status("3", "LOS", &old),
        ];

        assert!(stale_online_onus(&statuses, now(), default_reboot_age()).is_empty());
    }

    #[test]
    fn bad_timestamp_is_skipped_not_fatal() {
        let statuses = [
            status("1", "Online", "2025/01/01 10:00"),
            status("2", "Online", ""),
            status("3", "Online", "2024-12-01 08:30:00"),
        ];

        let ids = stale_online_onus(&statuses, now(), default_reboot_age());

        assert_eq!(ids, vec!["3".to_string()]);
    }

    #[test]
    fn custom_threshold() {
        let statuses = [
            status("1", "Online", &fmt(now() - TimeDelta::days(5))),
            status("2", "Online", &fmt(now() - TimeDelta::days(1))),
        ];

        let ids = stale_online_onus(&statuses, now(), TimeDelta::days(2));

        assert_eq!(ids, vec!["1".to_string()]);
    }

    #[test]
    fn oversized_threshold_selects_nothing() {
        let statuses = [status("1", "Online", "2020-01-01 00:00:00")];
        let max_age = TimeDelta::try_days(100_000_000).unwrap();

        assert!(stale_online_onus(&statuses, now(), max_age).is_empty());
        assert!(stale_online_onus(&statuses, now(), TimeDelta::MAX).is_empty());
    }

    #[test]
    fn null_timestamp_does_not_hide_other_records() {
        let statuses: Vec<OnuStatus> = serde_json::from_value(serde_json::json!([
            { "id": "1", "status": "Online", "last_status_change": null },
            { "id": "2", "status": "Online", "last_status_change": "2024-12-01 08:30:00" }
        ]))
        .unwrap();

        let ids = stale_online_onus(&statuses, now(), default_reboot_age());

        assert_eq!(ids, vec!["2".to_string()]);
    }
}
