//! # Chart Configuration
//!
//! Static option objects for the three Z-score chart presets, shaped the way
//! a Chart.js-style renderer reads them (`scales.y`, `plugins.tooltip`).
//!
//! Renderers call back into the options for anything dynamic: tick labels,
//! per-tick grid styling and tooltip text. Those callbacks are plain methods
//! here, and the serialised form carries their pre-evaluated results for the
//! bounded axis so a renderer that only reads JSON still gets them.

use crate::classify::label;
use crate::format::to_fixed;
use crate::percentile::percentile;
use crate::primitives::{
    AXIS_MAX, AXIS_MIN, AXIS_STEP, CRITICAL_GRIDLINES, GRID_COLOR_CRITICAL, GRID_COLOR_DEFAULT,
    GRID_COLOR_ZERO, GRID_WIDTH_CRITICAL, GRID_WIDTH_DEFAULT, GRID_WIDTH_ZERO,
    ZERO_LINE_TOLERANCE,
};
use crate::types::ZScoreError;
use serde::{Deserialize, Serialize};

// =============================================================================
// PRESETS
// =============================================================================

/// The chart configurations shipped with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPreset {
    /// Bounded [-3, 3] axis with emphasised thresholds and a classification tooltip.
    ZScore,
    /// Normalised time tests; more negative is better.
    TimeTest,
    /// Performance tests; more positive is better.
    PerformanceTest,
}

impl ChartPreset {
    pub const ALL: [ChartPreset; 3] = [
        ChartPreset::ZScore,
        ChartPreset::TimeTest,
        ChartPreset::PerformanceTest,
    ];

    /// Parse a preset name. Accepts the short CLI names as well as snake_case.
    pub fn from_name(name: &str) -> Result<Self, ZScoreError> {
        match name {
            "zscore" | "z_score" => Ok(ChartPreset::ZScore),
            "time" | "time_test" => Ok(ChartPreset::TimeTest),
            "performance" | "performance_test" => Ok(ChartPreset::PerformanceTest),
            other => Err(ZScoreError::UnknownPreset(other.to_string())),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ChartPreset::ZScore => "zscore",
            ChartPreset::TimeTest => "time",
            ChartPreset::PerformanceTest => "performance",
        }
    }

    /// Build the option object for this preset.
    #[must_use]
    pub fn options(self) -> ChartOptions {
        match self {
            ChartPreset::ZScore => z_score_defaults(),
            ChartPreset::TimeTest => time_test_defaults(),
            ChartPreset::PerformanceTest => performance_test_defaults(),
        }
    }
}

// =============================================================================
// OPTION SHAPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub scales: Scales,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub y: YAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    pub begin_at_zero: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    pub ticks: Ticks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    pub title: AxisTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    /// Decimal places of the tick label.
    pub precision: usize,
}

/// Pre-evaluated grid styling, one entry per tick of the bounded axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub lines: Vec<GridLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLine {
    pub value: f64,
    pub color: String,
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugins {
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub format: TooltipFormat,
}

/// Which tooltip text a preset produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipFormat {
    /// Default label plus classification and percentile lines.
    Classification,
    /// Value with a "lower is better" hint.
    LowerIsBetter,
    /// Value with a "higher is better" hint.
    HigherIsBetter,
}

/// Colour and width of one gridline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub color: &'static str,
    pub line_width: f64,
}

// =============================================================================
// CALLBACKS
// =============================================================================

impl ChartOptions {
    /// Tick label text for an axis value.
    #[must_use]
    pub fn tick_label(&self, value: f64) -> String {
        to_fixed(value, self.scales.y.ticks.precision)
    }

    /// Grid style for a tick, `None` when the preset leaves gridlines to the renderer.
    #[must_use]
    pub fn grid_style(&self, tick: f64) -> Option<GridStyle> {
        self.scales.y.grid.as_ref().map(|_| emphasis(tick))
    }

    /// Main tooltip line, `None` when the renderer's default label is used.
    #[must_use]
    pub fn tooltip_label(&self, dataset_label: &str, value: f64) -> Option<String> {
        let hint = match self.plugins.tooltip.format {
            TooltipFormat::Classification => return None,
            TooltipFormat::LowerIsBetter => "melhor desempenho = valores mais negativos",
            TooltipFormat::HigherIsBetter => "melhor desempenho = valores mais positivos",
        };
        Some(format!("{}: {} ({})", dataset_label, to_fixed(value, 2), hint))
    }

    /// Extra tooltip lines shown after the main label.
    #[must_use]
    pub fn tooltip_after_label(&self, value: f64) -> Vec<String> {
        match self.plugins.tooltip.format {
            TooltipFormat::Classification => vec![
                format!("Classificação: {}", label(value)),
                format!("Percentil: {}%", percentile(value)),
            ],
            TooltipFormat::LowerIsBetter | TooltipFormat::HigherIsBetter => Vec::new(),
        }
    }
}

/// Emphasis rule of the bounded axis: zero line, critical thresholds, rest.
#[must_use]
pub fn emphasis(tick: f64) -> GridStyle {
    if tick.abs() < ZERO_LINE_TOLERANCE {
        GridStyle {
            color: GRID_COLOR_ZERO,
            line_width: GRID_WIDTH_ZERO,
        }
    } else if CRITICAL_GRIDLINES.contains(&tick) {
        GridStyle {
            color: GRID_COLOR_CRITICAL,
            line_width: GRID_WIDTH_CRITICAL,
        }
    } else {
        GridStyle {
            color: GRID_COLOR_DEFAULT,
            line_width: GRID_WIDTH_DEFAULT,
        }
    }
}

/// Tick values of the bounded axis, `AXIS_MIN..=AXIS_MAX` by `AXIS_STEP`.
#[must_use]
pub fn axis_ticks() -> Vec<f64> {
    let count = ((AXIS_MAX - AXIS_MIN) / AXIS_STEP).round() as usize;
    (0..=count)
        .map(|i| AXIS_MIN + AXIS_STEP * i as f64)
        .collect()
}

// =============================================================================
// PRESET BUILDERS
// =============================================================================

/// Bounded Z-score chart.
#[must_use]
pub fn z_score_defaults() -> ChartOptions {
    let lines = axis_ticks()
        .into_iter()
        .map(|value| {
            let style = emphasis(value);
            GridLine {
                value,
                color: style.color.to_string(),
                line_width: style.line_width,
            }
        })
        .collect();

    ChartOptions {
        scales: Scales {
            y: YAxis {
                begin_at_zero: false,
                min: Some(AXIS_MIN),
                max: Some(AXIS_MAX),
                reverse: None,
                ticks: Ticks {
                    step_size: Some(AXIS_STEP),
                    precision: 1,
                },
                grid: Some(Grid { lines }),
                title: AxisTitle {
                    display: true,
                    text: "Z-Score".to_string(),
                },
            },
        },
        plugins: Plugins {
            tooltip: Tooltip {
                format: TooltipFormat::Classification,
            },
        },
    }
}

/// Time tests (TMT, Stroop) after deficit normalisation.
#[must_use]
pub fn time_test_defaults() -> ChartOptions {
    unbounded("Z-Score Normalizado", Some(false), TooltipFormat::LowerIsBetter)
}

/// Performance tests (Digit Span, MEEM, Clock Drawing).
#[must_use]
pub fn performance_test_defaults() -> ChartOptions {
    unbounded("Z-Score", None, TooltipFormat::HigherIsBetter)
}

fn unbounded(title: &str, reverse: Option<bool>, format: TooltipFormat) -> ChartOptions {
    ChartOptions {
        scales: Scales {
            y: YAxis {
                begin_at_zero: false,
                min: None,
                max: None,
                reverse,
                ticks: Ticks {
                    step_size: None,
                    precision: 1,
                },
                grid: None,
                title: AxisTitle {
                    display: true,
                    text: title.to_string(),
                },
            },
        },
        plugins: Plugins {
            tooltip: Tooltip { format },
        },
    }
}

// =============================================================================
// RENDERER COLLABORATOR
// =============================================================================

/// One data series handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// A chart renderer that accepts option objects built here.
pub trait ChartRenderer {
    type Output;

    fn render(
        &mut self,
        options: &ChartOptions,
        datasets: &[Dataset],
    ) -> Result<Self::Output, ZScoreError>;
}

/// Renders a self-contained JSON chart configuration.
///
/// Every point carries its pre-evaluated tooltip lines, so a consumer without
/// callback support shows the same text the callbacks would.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonChartRenderer;

impl ChartRenderer for JsonChartRenderer {
    type Output = serde_json::Value;

    fn render(
        &mut self,
        options: &ChartOptions,
        datasets: &[Dataset],
    ) -> Result<Self::Output, ZScoreError> {
        let options_json = serde_json::to_value(options)
            .map_err(|e| ZScoreError::SerializationError(e.to_string()))?;

        let datasets_json: Vec<serde_json::Value> = datasets
            .iter()
            .map(|dataset| {
                let tooltips: Vec<Vec<String>> = dataset
                    .data
                    .iter()
                    .map(|&value| {
                        let mut lines = Vec::new();
                        lines.extend(options.tooltip_label(&dataset.label, value));
                        lines.extend(options.tooltip_after_label(value));
                        lines
                    })
                    .collect();
                serde_json::json!({
                    "label": dataset.label,
                    "data": dataset.data,
                    "tooltips": tooltips,
                })
            })
            .collect();

        Ok(serde_json::json!({
            "type": "line",
            "data": { "datasets": datasets_json },
            "options": options_json,
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_score_axis_bounds() {
        let options = z_score_defaults();
        assert_eq!(options.scales.y.min, Some(-3.0));
        assert_eq!(options.scales.y.max, Some(3.0));
        assert_eq!(options.scales.y.ticks.step_size, Some(0.5));
        assert!(!options.scales.y.begin_at_zero);
        assert_eq!(options.scales.y.title.text, "Z-Score");
    }

    #[test]
    fn axis_has_thirteen_ticks() {
        let ticks = axis_ticks();
        assert_eq!(ticks.len(), 13);
        assert_eq!(ticks.first().copied(), Some(-3.0));
        assert_eq!(ticks.last().copied(), Some(3.0));
    }

    #[test]
    fn zero_line_is_emphasised() {
        let style = emphasis(0.0);
        assert_eq!(style.color, "#000000");
        assert!((style.line_width - 2.0).abs() < f64::EPSILON);
        assert_eq!(emphasis(0.05).color, "#000000");
    }

    #[test]
    fn critical_lines_are_emphasised() {
        for tick in [-2.5, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5, 2.5] {
            let style = emphasis(tick);
            assert_eq!(style.color, "#ff6b6b", "tick {tick}");
            assert!((style.line_width - 1.5).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn other_lines_are_faint() {
        for tick in [-3.0, -2.0, 2.0, 3.0] {
            let style = emphasis(tick);
            assert_eq!(style.color, "rgba(0,0,0,0.1)");
            assert!((style.line_width - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn serialized_grid_matches_callback() {
        let options = z_score_defaults();
        let grid = options.scales.y.grid.as_ref().expect("bounded axis has grid");
        for line in &grid.lines {
            let style = options.grid_style(line.value).expect("style");
            assert_eq!(line.color, style.color);
        }
    }

    #[test]
    fn tick_labels_use_one_decimal() {
        let options = performance_test_defaults();
        assert_eq!(options.tick_label(-1.0), "-1.0");
        assert_eq!(options.tick_label(2.0), "2.0");
    }

    #[test]
    fn tick_labels_round_ties_up() {
        assert_eq!(time_test_defaults().tick_label(0.25), "0.3");
        assert_eq!(z_score_defaults().tick_label(-0.25), "-0.3");
        assert_eq!(z_score_defaults().tick_label(-0.0), "0.0");
    }

    #[test]
    fn tooltip_label_rounds_ties_up() {
        assert_eq!(
            time_test_defaults().tooltip_label("Stroop", -1.125).as_deref(),
            Some("Stroop: -1.13 (melhor desempenho = valores mais negativos)")
        );
        assert_eq!(
            performance_test_defaults()
                .tooltip_label("MEEM", 0.625)
                .as_deref(),
            Some("MEEM: 0.63 (melhor desempenho = valores mais positivos)")
        );
    }

    #[test]
    fn classification_tooltip() {
        let options = z_score_defaults();
        assert_eq!(options.tooltip_label("MEEM", -2.6), None);
        assert_eq!(
            options.tooltip_after_label(-2.5),
            vec![
                "Classificação: Crítico".to_string(),
                "Percentil: 0.62%".to_string()
            ]
        );
        assert_eq!(
            options.tooltip_after_label(0.0),
            vec!["Classificação: Mínimo".to_string(), "Percentil: 50%".to_string()]
        );
    }

    #[test]
    fn time_and_performance_tooltips() {
        let time = time_test_defaults();
        assert_eq!(time.scales.y.reverse, Some(false));
        assert_eq!(time.scales.y.title.text, "Z-Score Normalizado");
        assert_eq!(
            time.tooltip_label("TMT-A", -1.234).as_deref(),
            Some("TMT-A: -1.23 (melhor desempenho = valores mais negativos)")
        );
        assert!(time.tooltip_after_label(-1.0).is_empty());
        assert!(time.grid_style(0.0).is_none());

        let perf = performance_test_defaults();
        assert_eq!(perf.scales.y.reverse, None);
        assert_eq!(
            perf.tooltip_label("Digit Span", 0.5).as_deref(),
            Some("Digit Span: 0.50 (melhor desempenho = valores mais positivos)")
        );
    }

    #[test]
    fn preset_names() {
        for preset in ChartPreset::ALL {
            assert_eq!(ChartPreset::from_name(preset.name()).expect("name"), preset);
        }
        assert!(matches!(
            ChartPreset::from_name("radar"),
            Err(ZScoreError::UnknownPreset(_))
        ));
    }

    #[test]
    fn serialized_shape_is_camel_case() {
        let json = serde_json::to_value(z_score_defaults()).expect("serialize");
        assert_eq!(json["scales"]["y"]["beginAtZero"], false);
        assert_eq!(json["scales"]["y"]["ticks"]["stepSize"], 0.5);
        assert_eq!(json["plugins"]["tooltip"]["format"], "classification");

        let json = serde_json::to_value(time_test_defaults()).expect("serialize");
        assert!(json["scales"]["y"].get("min").is_none());
        assert!(json["scales"]["y"].get("grid").is_none());
    }

    #[test]
    fn json_renderer_embeds_tooltips() {
        let mut renderer = JsonChartRenderer;
        let datasets = vec![Dataset {
            label: "Stroop".to_string(),
            data: vec![-1.5, 0.25],
        }];
        let chart = renderer
            .render(&time_test_defaults(), &datasets)
            .expect("render");

        assert_eq!(chart["type"], "line");
        let tooltips = &chart["data"]["datasets"][0]["tooltips"];
        assert_eq!(
            tooltips[0][0],
            "Stroop: -1.50 (melhor desempenho = valores mais negativos)"
        );
        assert_eq!(chart["options"]["scales"]["y"]["title"]["text"], "Z-Score Normalizado");
    }
}
