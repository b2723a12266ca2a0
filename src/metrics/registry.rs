//! Metric registry
//!
//! Compiles every template once and interprets the stage cascade for a
//! document. Matchers never fail: a stage either yields a value or the next
//! stage runs.

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use super::table::METRIC_TEMPLATES;
use super::template::{Link, MetricKind, MetricTemplate, Scan, Scope, SignRule, Stage};
use crate::core::{decode_spoken, normalize_amount, parse_plain, round3, Sentences};
use crate::error::{CallsheetError, CallsheetResult};

const LOSS_MARKER: &str = r"(?i)\b(?:loss|negative|deficit)\b";
const PERCENT_LITERAL: &str = r"(?P<num>[\d,\.]+)\s*%";

enum CompiledStage {
    Pattern { regex: Regex, scan: Scan },
    PercentWindow { keyword: String, chars: usize },
    Spoken { regex: Regex },
    DollarLiteral { gate: &'static str, regex: Regex },
    Inherit(usize),
}

struct CompiledMetric {
    template: &'static MetricTemplate,
    stages: Vec<CompiledStage>,
}

/// A stage match before sign rules are applied
struct Hit {
    value: f64,
    /// Byte offset of the match within the scanned region
    start: usize,
    head_is_loss: bool,
}

/// Metrics found in one document, in registry order. Absent metrics are
/// never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricRecord {
    values: Vec<(&'static str, f64)>,
}

impl MetricRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a matcher result; `None` is dropped
    pub fn insert(&mut self, name: &'static str, value: Option<f64>) {
        if let Some(value) = value {
            self.values.retain(|(existing, _)| *existing != name);
            self.values.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }
}

impl Serialize for MetricRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Compiled matchers for the whole metric vocabulary
pub struct MetricRegistry {
    metrics: Vec<CompiledMetric>,
    loss_marker: Regex,
    percent_literal: Regex,
}

impl MetricRegistry {
    /// Compile the built-in vocabulary
    pub fn new() -> CallsheetResult<Self> {
        Self::from_templates(METRIC_TEMPLATES)
    }

    /// Compile a template table.
    ///
    /// Fails when a pattern does not compile or an `Inherit` stage names an
    /// unknown metric or one that itself inherits.
    pub fn from_templates(templates: &'static [MetricTemplate]) -> CallsheetResult<Self> {
        let mut metrics = Vec::with_capacity(templates.len());

        for template in templates {
            let mut stages = Vec::with_capacity(template.stages.len());
            for stage in template.stages {
                stages.push(compile_stage(template, stage, templates)?);
            }
            metrics.push(CompiledMetric { template, stages });
        }

        debug!("Compiled {} metric matchers", metrics.len());

        Ok(Self {
            metrics,
            loss_marker: Regex::new(LOSS_MARKER)?,
            percent_literal: Regex::new(PERCENT_LITERAL)?,
        })
    }

    /// Metric names in output order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.metrics.iter().map(|m| m.template.name)
    }

    /// Run one metric's cascade. Unknown names yield `None`.
    pub fn match_metric(&self, name: &str, sentences: &Sentences) -> Option<f64> {
        let index = self.metrics.iter().position(|m| m.template.name == name)?;
        self.match_index(index, sentences)
    }

    /// Run every matcher and keep the values that were found
    pub fn extract(&self, sentences: &Sentences) -> MetricRecord {
        let mut record = MetricRecord::new();
        for (index, metric) in self.metrics.iter().enumerate() {
            record.insert(metric.template.name, self.match_index(index, sentences));
        }
        record
    }

    fn match_index(&self, index: usize, sentences: &Sentences) -> Option<f64> {
        let metric = &self.metrics[index];

        for (stage_no, stage) in metric.stages.iter().enumerate() {
            let found = match stage {
                CompiledStage::Inherit(target) => self.match_index(*target, sentences),
                _ => self.run_stage(metric, stage, sentences),
            };
            if let Some(value) = found {
                debug!(
                    "📊 {} = {} (stage {})",
                    metric.template.name, value, stage_no
                );
                return Some(value);
            }
        }
        None
    }

    fn run_stage(
        &self,
        metric: &CompiledMetric,
        stage: &CompiledStage,
        sentences: &Sentences,
    ) -> Option<f64> {
        let template = metric.template;

        match template.scope {
            Scope::Document => {
                let text = sentences.text();
                let hit = self.scan(template.kind, stage, text)?;
                let governing = sentences.containing(hit.start).unwrap_or(text);
                Some(self.apply_sign(template.sign, &hit, governing))
            }
            scope => sentences
                .iter()
                .filter(|sentence| scope.admits(&sentence.to_lowercase()))
                .find_map(|sentence| {
                    self.scan(template.kind, stage, sentence)
                        .map(|hit| self.apply_sign(template.sign, &hit, sentence))
                }),
        }
    }

    fn scan(&self, kind: MetricKind, stage: &CompiledStage, region: &str) -> Option<Hit> {
        match stage {
            CompiledStage::Pattern { regex, scan } => {
                let limit = match scan {
                    Scan::First => 1,
                    Scan::EachMatch => usize::MAX,
                };
                regex.captures_iter(region).take(limit).find_map(|caps| {
                    let num = caps.name("num")?;
                    let unit = caps.name("unit").map(|m| m.as_str());
                    let value = convert(kind, num.as_str(), unit)?;
                    let head_is_loss = caps
                        .name("head")
                        .is_some_and(|head| head.as_str().eq_ignore_ascii_case("loss"));
                    Some(Hit {
                        value,
                        start: caps.get(0).map_or(num.start(), |m| m.start()),
                        head_is_loss,
                    })
                })
            }
            CompiledStage::PercentWindow { keyword, chars } => {
                let lower = region.to_lowercase();
                let start = lower.find(keyword.as_str())?;
                let window: String = lower[start..].chars().take(*chars).collect();
                let caps = self.percent_literal.captures(&window)?;
                let value = parse_plain(&caps["num"])?;
                Some(Hit {
                    value,
                    start: start.min(region.len()),
                    head_is_loss: false,
                })
            }
            CompiledStage::Spoken { regex } => {
                let caps = regex.captures(region)?;
                let number = decode_spoken(&caps["words"])? as f64;
                let value = if caps["scale"].to_lowercase().starts_with("cent") {
                    number / 100.0
                } else {
                    number
                };
                Some(Hit {
                    value: round3(value),
                    start: caps.get(0).map_or(0, |m| m.start()),
                    head_is_loss: false,
                })
            }
            CompiledStage::DollarLiteral { gate, regex } => {
                if !region.to_lowercase().contains(*gate) {
                    return None;
                }
                let caps = regex.captures(region)?;
                let value = normalize_amount(&caps["num"], None)?;
                Some(Hit {
                    value,
                    start: caps.get(0).map_or(0, |m| m.start()),
                    head_is_loss: false,
                })
            }
            CompiledStage::Inherit(_) => None,
        }
    }

    fn apply_sign(&self, rule: SignRule, hit: &Hit, governing: &str) -> f64 {
        match rule {
            SignRule::Unsigned => hit.value,
            SignRule::LossMarked => {
                if hit.head_is_loss || self.loss_marker.is_match(governing) {
                    -hit.value.abs()
                } else {
                    hit.value
                }
            }
            SignRule::LossMarkedAbsolute => {
                if self.loss_marker.is_match(governing) {
                    -hit.value.abs()
                } else {
                    hit.value.abs()
                }
            }
        }
    }
}

/// Turn a captured literal into a value of the metric's kind
fn convert(kind: MetricKind, literal: &str, unit: Option<&str>) -> Option<f64> {
    match kind {
        MetricKind::Millions => normalize_amount(literal, unit),
        MetricKind::Percent => parse_plain(literal),
        MetricKind::PerShare => parse_plain(literal).map(round3),
    }
}

fn compile_stage(
    template: &MetricTemplate,
    stage: &Stage,
    templates: &[MetricTemplate],
) -> CallsheetResult<CompiledStage> {
    let compiled = match stage {
        Stage::After(shape) => CompiledStage::Pattern {
            regex: Regex::new(&shape.render_after())?,
            scan: shape.scan,
        },
        Stage::Before(shape) => CompiledStage::Pattern {
            regex: Regex::new(&shape.render_before())?,
            scan: shape.scan,
        },
        Stage::PercentWindow { keyword, chars } => CompiledStage::PercentWindow {
            keyword: keyword.to_lowercase(),
            chars: *chars,
        },
        Stage::Spoken { keyword, link } => {
            let pattern = format!(
                r"(?i){keyword}\s+(?:{})?\s*(?P<words>[a-z\s]+?)\s*(?P<scale>cents?|dollars?)\b",
                Link::alternation(link)
            );
            CompiledStage::Spoken {
                regex: Regex::new(&pattern)?,
            }
        }
        Stage::DollarLiteral { gate, min_digits } => CompiledStage::DollarLiteral {
            gate: *gate,
            regex: Regex::new(&format!(r"\$(?P<num>[\d,]{{{min_digits},}})(?:\.\d+)?"))?,
        },
        Stage::Inherit(target) => {
            let index = templates
                .iter()
                .position(|t| t.name == *target)
                .ok_or_else(|| {
                    CallsheetError::Config(format!(
                        "Metric '{}' inherits unknown metric '{}'",
                        template.name, target
                    ))
                })?;
            if templates[index]
                .stages
                .iter()
                .any(|s| matches!(s, Stage::Inherit(_)))
            {
                return Err(CallsheetError::Config(format!(
                    "Metric '{}' inherits '{}', which inherits in turn",
                    template.name, target
                )));
            }
            CompiledStage::Inherit(index)
        }
    };
    Ok(compiled)
}
