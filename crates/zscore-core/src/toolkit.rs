//! # Toolkit Bundle
//!
//! The exported entry point for hosts that want everything in one value:
//! classification, percentile, page decoration and the three chart presets.
//!
//! The toolkit is constructed and initialised explicitly by the host. There
//! is no global registration and nothing runs at load time; call
//! [`ZScoreToolkit::init`] once the page is ready.

use crate::chart::{ChartOptions, ChartPreset};
use crate::classify::{color, label};
use crate::decorate::{DecorationReport, PageDocument, apply_colors};
use crate::percentile::percentile;

/// Pre-built chart presets plus the pure scoring functions.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreToolkit {
    chart_defaults: ChartOptions,
    time_test_defaults: ChartOptions,
    performance_test_defaults: ChartOptions,
}

impl Default for ZScoreToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl ZScoreToolkit {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chart_defaults: ChartPreset::ZScore.options(),
            time_test_defaults: ChartPreset::TimeTest.options(),
            performance_test_defaults: ChartPreset::PerformanceTest.options(),
        }
    }

    /// Page-ready hook: decorate `document` once.
    pub fn init<D: PageDocument>(&self, document: &mut D) -> DecorationReport {
        let report = self.apply_colors(document);
        tracing::info!(
            decorated = report.decorated,
            skipped = report.skipped,
            "Z-score toolkit initialised"
        );
        report
    }

    #[must_use]
    pub fn get_color(&self, score: f64) -> &'static str {
        color(score)
    }

    #[must_use]
    pub fn get_label(&self, score: f64) -> &'static str {
        label(score)
    }

    #[must_use]
    pub fn get_percentile(&self, score: f64) -> f64 {
        percentile(score)
    }

    pub fn apply_colors<D: PageDocument>(&self, document: &mut D) -> DecorationReport {
        apply_colors(document)
    }

    #[must_use]
    pub fn chart_defaults(&self) -> &ChartOptions {
        &self.chart_defaults
    }

    #[must_use]
    pub fn time_test_defaults(&self) -> &ChartOptions {
        &self.time_test_defaults
    }

    #[must_use]
    pub fn performance_test_defaults(&self) -> &ChartOptions {
        &self.performance_test_defaults
    }

    /// Options for a preset, by value of the enum.
    #[must_use]
    pub fn preset(&self, preset: ChartPreset) -> &ChartOptions {
        match preset {
            ChartPreset::ZScore => &self.chart_defaults,
            ChartPreset::TimeTest => &self.time_test_defaults,
            ChartPreset::PerformanceTest => &self.performance_test_defaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Page, PageNode};

    #[test]
    fn scoring_functions_delegate() {
        let toolkit = ZScoreToolkit::new();
        assert_eq!(toolkit.get_color(-2.5), "#6f42c1");
        assert_eq!(toolkit.get_label(-1.5), "Alto");
        assert!((toolkit.get_percentile(2.5) - 99.38).abs() < 1e-9);
    }

    #[test]
    fn presets_are_prebuilt() {
        let toolkit = ZScoreToolkit::default();
        assert_eq!(toolkit.chart_defaults().scales.y.min, Some(-3.0));
        assert_eq!(
            toolkit.preset(ChartPreset::TimeTest),
            toolkit.time_test_defaults()
        );
        assert_eq!(
            toolkit.performance_test_defaults().scales.y.title.text,
            "Z-Score"
        );
    }

    #[test]
    fn init_decorates_page() {
        let toolkit = ZScoreToolkit::new();
        let mut page = Page::new(vec![
            PageNode::new("span").with_class("z-score-value").with_text("-1.0"),
            PageNode::new("span").with_class("z-score-value").with_text("N/A"),
        ]);

        let report = toolkit.init(&mut page);

        assert_eq!(report.decorated, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            page.nodes[0].style.get("color").map(String::as_str),
            Some("#fd7e14")
        );
        assert!(page.nodes[1].style.is_empty());
    }
}
