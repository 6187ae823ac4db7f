//! Locale-aware ordering of channel names
//!
//! Exports list channels in Chinese collation order (pinyin for Han
//! characters), matching what playlist consumers in that locale expect.

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use std::cmp::Ordering;
use tracing::warn;

pub struct ChannelNameCollator {
    collator: Option<Collator>,
}

impl ChannelNameCollator {
    /// Collator for the `zh` locale. Falls back to code point order if the
    /// collation data cannot be loaded.
    pub fn chinese() -> Self {
        match Collator::try_new(&locale!("zh").into(), CollatorOptions::new()) {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(e) => {
                warn!("Chinese collation unavailable, using code point order: {}", e);
                Self { collator: None }
            }
        }
    }

    /// Total order: collation first, raw string order to break ties so that
    /// repeated runs sort identically.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let primary = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => Ordering::Equal,
        };
        primary.then_with(|| a.cmp(b))
    }

    pub fn sort<T, F>(&self, items: &mut [T], key: F)
    where
        F: Fn(&T) -> &str,
    {
        items.sort_by(|a, b| self.compare(key(a), key(b)));
    }
}

impl Default for ChannelNameCollator {
    fn default() -> Self {
        Self::chinese()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinyin_order_for_han_names() {
        let collator = ChannelNameCollator::chinese();
        let mut names = vec!["浙江卫视", "安徽卫视", "湖南卫视", "北京卫视"];
        collator.sort(&mut names, |n| *n);
        // an-hui, bei-jing, hu-nan, zhe-jiang
        assert_eq!(names, vec!["安徽卫视", "北京卫视", "湖南卫视", "浙江卫视"]);
    }

    #[test]
    fn test_sort_is_deterministic() {
        let collator = ChannelNameCollator::chinese();
        let mut first = vec!["CCTV2", "cctv1", "CCTV1", "湖南卫视", "CCTV10"];
        let mut second = vec!["湖南卫视", "CCTV10", "CCTV1", "CCTV2", "cctv1"];
        collator.sort(&mut first, |n| *n);
        collator.sort(&mut second, |n| *n);
        assert_eq!(first, second);
    }

    #[test]
    fn test_han_sorts_before_latin() {
        let collator = ChannelNameCollator::chinese();
        assert_eq!(collator.compare("CCTV1", "安徽卫视"), Ordering::Greater);

        let mut names = vec!["CCTV1", "湖南卫视", "cctv1", "安徽卫视"];
        collator.sort(&mut names, |n| *n);
        assert_eq!(names, vec!["安徽卫视", "湖南卫视", "cctv1", "CCTV1"]);
    }
}
