//! 過期文件追蹤

use std::collections::HashSet;
use uuid::Uuid;

/// 過期文件追蹤器
///
/// 記錄最近一次重新產生失敗、文件可能與內容不一致的報價單。
#[derive(Debug, Clone, Default)]
pub struct StaleArtifactTracker {
    stale_quotes: HashSet<Uuid>,
}

impl StaleArtifactTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記報價文件為過期
    pub fn mark_stale(&mut self, quote_id: Uuid) {
        self.stale_quotes.insert(quote_id);
    }

    /// 檢查報價文件是否過期
    pub fn is_stale(&self, quote_id: Uuid) -> bool {
        self.stale_quotes.contains(&quote_id)
    }

    /// 清除單張報價單的過期標記
    pub fn clear(&mut self, quote_id: Uuid) {
        self.stale_quotes.remove(&quote_id);
    }

    /// 清除所有過期標記
    pub fn clear_all(&mut self) {
        self.stale_quotes.clear();
    }

    /// 獲取所有過期的報價單
    pub fn stale_quotes(&self) -> Vec<Uuid> {
        self.stale_quotes.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.stale_quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stale_quotes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_clear() {
        let mut tracker = StaleArtifactTracker::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        tracker.mark_stale(a);
        tracker.mark_stale(b);
        tracker.mark_stale(a);
        assert_eq!(tracker.len(), 2);
        assert!(tracker.is_stale(a));

        tracker.clear(a);
        assert!(!tracker.is_stale(a));
        assert_eq!(tracker.stale_quotes(), vec![b]);

        tracker.clear_all();
        assert!(tracker.is_empty());
    }
}
