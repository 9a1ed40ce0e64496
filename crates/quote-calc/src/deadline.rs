//! 交期緊急度分級
//!
//! 所有需要顯示緊急程度的畫面共用同一套規則，結果只取決於交期與 `now`。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// 交期在幾天內視為警示
const WARNING_WINDOW_DAYS: i64 = 2;

/// 緊急度分級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineBucket {
    /// 已逾期
    Overdue,
    /// 今日到期
    Today,
    /// 兩天內到期
    Warning,
    /// 尚有餘裕
    Info,
    /// 未設定或無法解析
    Undefined,
}

impl fmt::Display for DeadlineBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeadlineBucket::Overdue => "overdue",
            DeadlineBucket::Today => "today",
            DeadlineBucket::Warning => "warning",
            DeadlineBucket::Info => "info",
            DeadlineBucket::Undefined => "undefined",
        };
        f.write_str(label)
    }
}

/// 分級結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub bucket: DeadlineBucket,

    /// 距交期天數（無條件進位）；未設定時為 None
    pub days_delta: Option<i64>,
}

impl Deadline {
    pub fn undefined() -> Self {
        Self {
            bucket: DeadlineBucket::Undefined,
            days_delta: None,
        }
    }

    /// 天數絕對值（逾期天數或剩餘天數）
    pub fn magnitude(&self) -> Option<i64> {
        self.days_delta.map(i64::abs)
    }

    pub fn is_overdue(&self) -> bool {
        self.bucket == DeadlineBucket::Overdue
    }
}

/// 依交期與目前時間分級
pub fn classify(delivery: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Deadline {
    let Some(delivery) = delivery else {
        return Deadline::undefined();
    };

    let days_delta = ceil_days((delivery - now).num_milliseconds());
    let bucket = match days_delta {
        d if d < 0 => DeadlineBucket::Overdue,
        0 => DeadlineBucket::Today,
        d if d <= WARNING_WINDOW_DAYS => DeadlineBucket::Warning,
        _ => DeadlineBucket::Info,
    };

    Deadline {
        bucket,
        days_delta: Some(days_delta),
    }
}

/// 解析字串交期後分級
///
/// 接受 RFC 3339 時間戳、`YYYY-MM-DDTHH:MM:SS`（視為 UTC）或 `YYYY-MM-DD`（當日 00:00 UTC）。
pub fn classify_str(delivery: Option<&str>, now: DateTime<Utc>) -> Deadline {
    classify(delivery.and_then(parse_timestamp), now)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 毫秒數換算天數並向上取整
fn ceil_days(millis: i64) -> i64 {
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case(Duration::days(-3), DeadlineBucket::Overdue, -3)]
    #[case(Duration::hours(-30), DeadlineBucket::Overdue, -1)]
    #[case(Duration::hours(-5), DeadlineBucket::Today, 0)]
    #[case(Duration::zero(), DeadlineBucket::Today, 0)]
    #[case(Duration::hours(1), DeadlineBucket::Warning, 1)]
    #[case(Duration::days(1), DeadlineBucket::Warning, 1)]
    #[case(Duration::days(2), DeadlineBucket::Warning, 2)]
    #[case(Duration::hours(49), DeadlineBucket::Info, 3)]
    #[case(Duration::days(10), DeadlineBucket::Info, 10)]
    fn test_classify_buckets(
        #[case] offset: Duration,
        #[case] bucket: DeadlineBucket,
        #[case] days: i64,
    ) {
        let result = classify(Some(now() + offset), now());
        assert_eq!(result.bucket, bucket);
        assert_eq!(result.days_delta, Some(days));
    }

    #[test]
    fn test_overdue_magnitude() {
        let result = classify(Some(now() - Duration::days(3)), now());
        assert!(result.is_overdue());
        assert_eq!(result.magnitude(), Some(3));
    }

    #[test]
    fn test_missing_delivery_is_undefined() {
        assert_eq!(classify(None, now()), Deadline::undefined());
        assert_eq!(classify_str(None, now()).bucket, DeadlineBucket::Undefined);
        assert_eq!(classify_str(Some("amanhã"), now()).bucket, DeadlineBucket::Undefined);
        assert_eq!(classify_str(Some("  "), now()).bucket, DeadlineBucket::Undefined);
    }

    #[test]
    fn test_classify_str_formats() {
        let rfc = classify_str(Some("2025-11-11T12:00:00Z"), now());
        assert_eq!(rfc.bucket, DeadlineBucket::Warning);
        assert_eq!(rfc.days_delta, Some(1));

        let offset = classify_str(Some("2025-11-15T09:00:00-03:00"), now());
        assert_eq!(offset.days_delta, Some(5));

        // 當日 00:00 已早於中午，向上取整為 0
        let date_only = classify_str(Some("2025-11-10"), now());
        assert_eq!(date_only.bucket, DeadlineBucket::Today);

        let naive = classify_str(Some("2025-11-07 12:00:00"), now());
        assert_eq!(naive.bucket, DeadlineBucket::Overdue);
        assert_eq!(naive.magnitude(), Some(3));
    }
}
