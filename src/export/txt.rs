use super::sorted_channels;
use crate::services::ChannelStore;
use crate::utils::ChannelNameCollator;

/// One `name,url` line per stored stream, channels in collation order
pub fn render_txt(store: &ChannelStore, collator: &ChannelNameCollator) -> String {
    let mut content = String::new();
    for (name, sources) in sorted_channels(store, collator) {
        for record in sources {
            content.push_str(&format!("{},{}\n", name, record.url));
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelRecord;

    #[test]
    fn test_flat_text_lines() {
        let mut store = ChannelStore::default();
        store.add_channel(ChannelRecord::new("湖南卫视", "http://a/hn"));
        store.add_channel(ChannelRecord::new("安徽卫视", "http://a/ah1"));
        store.add_channel(ChannelRecord::new("安徽卫视", "http://a/ah2,x"));

        let content = render_txt(&store, &ChannelNameCollator::chinese());
        assert_eq!(
            content,
            "安徽卫视,http://a/ah1\n安徽卫视,http://a/ah2,x\n湖南卫视,http://a/hn\n"
        );
    }

    #[test]
    fn test_empty_store_renders_nothing() {
        let store = ChannelStore::default();
        assert_eq!(render_txt(&store, &ChannelNameCollator::chinese()), "");
    }
}
