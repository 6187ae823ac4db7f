//! One end-to-end aggregation run
//!
//! validate inputs → load lookup tables → fetch all subscriptions →
//! fold into a fresh channel store → render → write outputs.

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{Config, OutputConfig, SourcesConfig};
use crate::errors::{AppError, AppResult};
use crate::export::{M3uExporter, render_txt};
use crate::ingestor::SubscriptionFetcher;
use crate::inputs::{self, validate_source_configs};
use crate::logo_assets::LogoTable;
use crate::models::{AggregationReport, Template};
use crate::services::ChannelStore;
use crate::utils::{ChannelNameCollator, StandardHttpClient, TextFetcher};

/// Rendered playlist texts for one run
struct RenderedOutputs {
    m3u: String,
    txt: String,
    template_matched_streams: Option<usize>,
}

pub struct AggregationService {
    sources: SourcesConfig,
    output: OutputConfig,
    strict_validation: bool,
    fetcher: SubscriptionFetcher,
}

impl AggregationService {
    /// Build the service with the reqwest-backed fetcher
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let timeout = config.fetch.timeout_duration()?;
        let client = StandardHttpClient::new(timeout, &config.fetch.user_agent)?;
        Self::with_fetcher(config, Arc::new(client))
    }

    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn TextFetcher>) -> AppResult<Self> {
        let timeout = config.fetch.timeout_duration()?;
        Ok(Self {
            sources: config.sources.clone(),
            output: config.output.clone(),
            strict_validation: config.validation.strict,
            fetcher: SubscriptionFetcher::new(fetcher, timeout, config.fetch.max_concurrency),
        })
    }

    pub fn sources(&self) -> &SourcesConfig {
        &self.sources
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub async fn run(&self) -> AppResult<AggregationReport> {
        let started_at = Utc::now();
        self.check_inputs()?;

        let epg_urls = inputs::load_epg(&self.sources.epg)?;
        let logos = inputs::load_logos(&self.sources.logo)?;
        let aliases = inputs::load_aliases(&self.sources.alias)?;
        let template = inputs::load_template(&self.sources.template)?;

        let mut store = ChannelStore::new(aliases);
        let mut subscription_count = 0;
        let mut failed_subscriptions = 0;

        if let Some(urls) = inputs::load_subscriptions(&self.sources.subscribe)? {
            subscription_count = urls.len();
            // fold only after every fetch has settled
            let results = self.fetcher.fetch_all(&urls).await;
            for result in results {
                if result.failed {
                    failed_subscriptions += 1;
                }
                store.extend(result.channels);
            }
        }

        info!(
            "Aggregated {} channels with {} streams from {} subscriptions ({} failed)",
            store.channel_count(),
            store.stream_count(),
            subscription_count,
            failed_subscriptions
        );

        let mut report = AggregationReport {
            started_at,
            finished_at: started_at,
            subscription_count,
            failed_subscriptions,
            channel_count: store.channel_count(),
            stream_count: store.stream_count(),
            template_matched_streams: None,
            outputs_written: false,
        };

        if store.is_empty() {
            warn!("No channels aggregated, leaving previous outputs untouched");
            report.finished_at = Utc::now();
            return Ok(report);
        }

        let rendered = render_outputs(&store, &logos, &epg_urls, template.as_ref());
        write_output(&self.output.m3u_path, &rendered.m3u).await?;
        write_output(&self.output.txt_path, &rendered.txt).await?;
        info!(
            "Wrote {} and {}",
            self.output.m3u_path.display(),
            self.output.txt_path.display()
        );

        report.template_matched_streams = rendered.template_matched_streams;
        report.outputs_written = true;
        report.finished_at = Utc::now();
        Ok(report)
    }

    fn check_inputs(&self) -> AppResult<()> {
        let summary = validate_source_configs(&self.sources);
        for warning in &summary.warnings {
            warn!("{}", warning);
        }
        if !summary.has_errors {
            return Ok(());
        }

        for e in &summary.errors {
            error!("{}", e);
        }
        if self.strict_validation {
            return Err(AppError::validation(format!(
                "{} input file error(s): {}",
                summary.errors.len(),
                summary.errors.join("; ")
            )));
        }
        warn!("Continuing despite input file errors (strict validation disabled)");
        Ok(())
    }
}

/// Render both exports. The template export is used when a template with
/// at least one category exists, otherwise the sorted default export.
fn render_outputs(
    store: &ChannelStore,
    logos: &LogoTable,
    epg_urls: &[String],
    template: Option<&Template>,
) -> RenderedOutputs {
    let collator = ChannelNameCollator::chinese();
    let exporter = M3uExporter::new(store, logos, epg_urls);

    let (m3u, template_matched_streams) = match template {
        Some(template) if !template.is_empty() => {
            let export = exporter.render_with_template(template);
            info!(
                "Template export matched {} of {} streams",
                export.matched_streams,
                store.stream_count()
            );
            (export.content, Some(export.matched_streams))
        }
        Some(_) => {
            warn!("Template has no categories, using default export order");
            (exporter.render_default(&collator), None)
        }
        None => (exporter.render_default(&collator), None),
    };

    RenderedOutputs {
        m3u,
        txt: render_txt(store, &collator),
        template_matched_streams,
    }
}

async fn write_output(path: &Path, content: &str) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}
