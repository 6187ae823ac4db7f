pub mod collation;
pub mod decompression;
pub mod http_client;
pub mod url;

pub use collation::ChannelNameCollator;
pub use decompression::{CompressionFormat, DecompressionService};
pub use http_client::{StandardHttpClient, TextFetcher};
pub use url::UrlUtils;
