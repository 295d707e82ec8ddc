//! Single-pass audit over a collection catalog

use crate::classification::{classify, Classification};
use mongocap_core::error::Result;
use mongocap_storage::CollectionCatalog;
use tracing::{debug, info};

/// Cap applied when converting a realtime collection: 4 MiB
pub const DEFAULT_CAP_SIZE_BYTES: u64 = 4_194_304;

/// Options for one audit run
#[derive(Debug, Clone, Copy)]
pub struct AuditOptions {
    /// Byte-size limit passed to the convert command
    pub cap_size_bytes: u64,
    /// Classify and report without issuing any convert command
    pub dry_run: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            cap_size_bytes: DEFAULT_CAP_SIZE_BYTES,
            dry_run: false,
        }
    }
}

/// Outcome of one audit run: two name sequences in enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Collections that are capped but do not match the realtime naming
    /// convention (anomalies)
    pub capped_non_realtime: Vec<String>,
    /// Collections that were uncapped realtime before this run and were
    /// converted (a conversion log, not a current-state query)
    pub converted: Vec<String>,
}

impl AuditReport {
    /// Renders the two report blocks in the tool's console format.
    ///
    /// The second header reads "uncapped realtime" even though the list
    /// holds the collections already converted during this run; consumers
    /// parse that exact text, so it stays.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("capped non realtime\n");
        out.push_str(&self.capped_non_realtime.join("\n"));
        out.push('\n');
        out.push_str("uncapped realtime\n");
        out.push_str(&self.converted.join("\n"));
        out.push('\n');
        out
    }
}

/// Audits every collection in the catalog, converting uncapped realtime
/// collections to capped collections of `cap_size_bytes`.
///
/// `progress` is called with the collection name immediately before each
/// conversion. Fail-fast: the first stats or convert error aborts the
/// remaining enumeration, leaving earlier conversions in place.
pub async fn audit_collections(
    catalog: &dyn CollectionCatalog,
    options: AuditOptions,
    mut progress: impl FnMut(&str),
) -> Result<AuditReport> {
    let names = catalog.list_collections().await?;
    info!(collections = names.len(), "starting capped-collection audit");

    let mut capped_non_realtime = Vec::new();
    let mut converted = Vec::new();

    for name in names {
        let stats = catalog.collection_stats(&name).await?;
        let state = classify(&name, stats.capped);
        debug!(collection = %name, capped = stats.capped, ?state, "classified");

        match state {
            Classification::CappedOther => capped_non_realtime.push(name),
            Classification::UncappedRealtime => {
                progress(&name);
                if !options.dry_run {
                    catalog
                        .convert_to_capped(&name, options.cap_size_bytes)
                        .await?;
                }
                converted.push(name);
            }
            Classification::CappedRealtime | Classification::UncappedOther => {}
        }
    }

    info!(
        anomalies = capped_non_realtime.len(),
        converted = converted.len(),
        "audit complete"
    );

    Ok(AuditReport {
        capped_non_realtime,
        converted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongocap_storage::mock::MockCatalog;
    use pretty_assertions::assert_eq;

    async fn run(catalog: &MockCatalog, options: AuditOptions) -> AuditReport {
        audit_collections(catalog, options, |_| {}).await.unwrap()
    }

    #[tokio::test]
    async fn test_mixed_catalog_scenario() {
        let catalog = MockCatalog::with_collections([
            ("events_realtime", false),
            ("events_archive", true),
            ("users_realtime", true),
            ("logs", false),
        ]);

        let report = run(&catalog, AuditOptions::default()).await;

        assert_eq!(report.capped_non_realtime, vec!["events_archive"]);
        assert_eq!(report.converted, vec!["events_realtime"]);
        assert_eq!(
            catalog.issued_commands(),
            vec![("events_realtime".to_string(), 4_194_304)]
        );
    }

    #[tokio::test]
    async fn test_no_commands_for_non_realtime_or_capped() {
        let catalog = MockCatalog::with_collections([
            ("logs", false),
            ("events_archive", true),
            ("users_realtime", true),
        ]);

        run(&catalog, AuditOptions::default()).await;
        assert!(catalog.issued_commands().is_empty());
    }

    #[tokio::test]
    async fn test_converted_matches_issued_commands_in_order() {
        let catalog = MockCatalog::with_collections([
            ("b_realtime", false),
            ("plain", false),
            ("a_realtime", false),
        ]);

        let report = run(&catalog, AuditOptions::default()).await;

        // Enumeration order, not sorted order
        assert_eq!(report.converted, vec!["b_realtime", "a_realtime"]);
        let issued: Vec<String> = catalog
            .issued_commands()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(issued, report.converted);
    }

    #[tokio::test]
    async fn test_cap_size_flows_through_exactly() {
        let catalog = MockCatalog::with_collections([("feed_realtime", false)]);

        run(&catalog, AuditOptions::default()).await;
        assert_eq!(
            catalog.issued_commands(),
            vec![("feed_realtime".to_string(), 4_194_304)]
        );
    }

    #[tokio::test]
    async fn test_idempotent_second_run() {
        let catalog = MockCatalog::with_collections([
            ("events_realtime", false),
            ("metrics_realtime", false),
            ("logs", false),
        ]);

        let first = run(&catalog, AuditOptions::default()).await;
        assert_eq!(first.converted.len(), 2);

        let second = run(&catalog, AuditOptions::default()).await;
        assert!(second.converted.is_empty());
        // Everything converted in run one is now capped realtime, which
        // is the expected state, not an anomaly
        assert!(second.capped_non_realtime.is_empty());
        assert_eq!(catalog.issued_commands().len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_converting() {
        let catalog = MockCatalog::with_collections([
            ("events_realtime", false),
            ("events_archive", true),
        ]);

        let options = AuditOptions {
            dry_run: true,
            ..AuditOptions::default()
        };
        let report = run(&catalog, options).await;

        assert_eq!(report.capped_non_realtime, vec!["events_archive"]);
        assert_eq!(report.converted, vec!["events_realtime"]);
        assert!(catalog.issued_commands().is_empty());
    }

    #[tokio::test]
    async fn test_progress_emitted_before_each_conversion() {
        let catalog = MockCatalog::with_collections([
            ("events_realtime", false),
            ("logs", false),
            ("metrics_realtime", false),
        ]);

        let mut seen = Vec::new();
        audit_collections(&catalog, AuditOptions::default(), |name| {
            seen.push(name.to_string());
        })
        .await
        .unwrap();

        assert_eq!(seen, vec!["events_realtime", "metrics_realtime"]);
    }

    #[tokio::test]
    async fn test_stats_failure_aborts_remaining_enumeration() {
        let catalog = MockCatalog::with_collections([
            ("a_realtime", false),
            ("broken", false),
            ("z_realtime", false),
        ]);
        catalog.poison_stats("broken");

        let result = audit_collections(&catalog, AuditOptions::default(), |_| {}).await;

        assert!(result.is_err());
        // a_realtime was converted before the failure; z_realtime never
        // reached. No partial-completion bookkeeping.
        assert_eq!(
            catalog.issued_commands(),
            vec![("a_realtime".to_string(), 4_194_304)]
        );
    }

    #[test]
    fn test_render_report() {
        let report = AuditReport {
            capped_non_realtime: vec!["events_archive".to_string(), "audit".to_string()],
            converted: vec!["events_realtime".to_string()],
        };

        assert_eq!(
            report.render(),
            "capped non realtime\nevents_archive\naudit\nuncapped realtime\nevents_realtime\n"
        );
    }

    #[test]
    fn test_render_empty_report_keeps_blank_lines() {
        let report = AuditReport::default();
        assert_eq!(report.render(), "capped non realtime\n\nuncapped realtime\n\n");
    }
}
