//! Metric vocabulary
//!
//! One row per metric, in output order. Stages run top to bottom and stop at
//! the first one that yields a value.

use super::template::{
    Amount, Dollar, Gap, Link, MetricKind, MetricTemplate, Scan, Scope, Shape, SignRule, Stage,
    Unit, SHAPE,
};

const LINK_REPORTED: &[&str] = &[
    "was",
    "were",
    "of",
    "at",
    "totaled",
    "amounted to",
    "came in at",
    "reported at",
    "reached",
];

const LINK_REPORTED_CAME_TO: &[&str] = &[
    "was",
    "were",
    "of",
    "at",
    "totaled",
    "amounted to",
    "came in at",
    "reported at",
    "came to",
    "reached",
];

const LINK_STANDING: &[&str] = &[
    "was",
    "were",
    "of",
    "at",
    "totaled",
    "amounted to",
    "reported at",
    "came in at",
    "reached",
    "stood at",
];

const LINK_INTEREST: &[&str] = &[
    "was",
    "were",
    "is",
    "of",
    "at",
    "to",
    "for",
    "totaled",
    "amounted to",
    "came in at",
    "reported at",
    "reached",
];

const LINK_ADJUSTED_NET_INCOME: &[&str] = &[
    "was",
    "were",
    "is",
    "of",
    "at",
    "totaled",
    "amounted to",
    "came in at",
    "reported at",
    "reached",
    "came to",
];

const LINK_LIQUIDITY_BEFORE: &[&str] = &["in", "of", "at", "was", "for", "representing"];
const LINK_AVAILABLE_BEFORE: &[&str] = &["in", "of", "was"];
const LINK_ORDERS: &[&str] = &["of", "were", "was", "totaled", "amounted to"];
const LINK_CASH_FLOW: &[&str] = &["generated", "was", "were", "of", "totaled", "amounted to"];
const LINK_EPS: &[&str] = &["was", "were", "of", "at", "totaled", "amounted to"];
const LINK_SPOKEN_EPS: &[&str] = &["of", "was", "were", "at", "totaled"];
const LINK_BUYBACKS: &[&str] = &[
    "of",
    "in",
    "towards",
    "for",
    "used for",
    "was",
    "were",
    "deployed towards",
];
const LINK_GAAP_OPERATING_BEFORE: &[&str] = &["of", "in", "for", "quarterly", "this quarter"];

const BUYBACK_KEYWORD: &str = r"(?:share\s+buybacks|share\s+repurchases|dividends)";

/// Keyword, any words, optional filler and qualifier, then the number
macro_rules! generic {
    ($keyword:expr) => {
        Stage::After(Shape {
            keyword: $keyword,
            gap: Gap::AnyWords,
            link: Link::Optional(LINK_REPORTED),
            qualifier: true,
            amount: Amount::Plain,
            ..SHAPE
        })
    };
}

const fn document(
    name: &'static str,
    kind: MetricKind,
    stages: &'static [Stage],
) -> MetricTemplate {
    MetricTemplate {
        name,
        kind,
        scope: Scope::Document,
        sign: SignRule::Unsigned,
        stages,
    }
}

pub static METRIC_TEMPLATES: &[MetricTemplate] = &[
    document(
        "revenue",
        MetricKind::Millions,
        &[
            Stage::After(Shape {
                keyword: r"\brevenue\b",
                link: Link::Optional(LINK_REPORTED),
                qualifier: true,
                unit: Unit::Required,
                ..SHAPE
            }),
            Stage::After(Shape {
                keyword: r"\brevenue\b",
                gap: Gap::Words(5),
                link: Link::Optional(LINK_REPORTED),
                qualifier: true,
                scan: Scan::EachMatch,
                ..SHAPE
            }),
            Stage::DollarLiteral {
                gate: "revenue",
                min_digits: 7,
            },
        ],
    ),
    document(
        "consolidated_net_sales",
        MetricKind::Millions,
        &[generic!(r"consolidated\s+net\s+sales")],
    ),
    document(
        "consolidated_operating_income",
        MetricKind::Millions,
        &[generic!(r"consolidated\s+operating\s+income")],
    ),
    MetricTemplate {
        name: "orders",
        kind: MetricKind::Millions,
        scope: Scope::Sentences {
            require_all: &[],
            require_any: &["orders"],
            exclude: &[],
        },
        sign: SignRule::Unsigned,
        stages: &[Stage::After(Shape {
            keyword: r"orders",
            link: Link::Optional(LINK_ORDERS),
            amount: Amount::Plain,
            unit: Unit::Absent,
            ..SHAPE
        })],
    },
    document(
        "total_orders",
        MetricKind::Millions,
        &[generic!(r"total\s+orders")],
    ),
    document(
        "marketplace_gov",
        MetricKind::Millions,
        &[generic!(r"marketplace\s+gov")],
    ),
    document(
        "adjusted_ebitda",
        MetricKind::Millions,
        &[
            Stage::After(Shape {
                keyword: r"adjusted\s+ebitda",
                gap: Gap::Words(3),
                link: Link::Optional(LINK_REPORTED_CAME_TO),
                qualifier: true,
                ..SHAPE
            }),
            Stage::Before(Shape {
                keyword: r"adjusted\s+ebitda",
                ..SHAPE
            }),
        ],
    ),
    document(
        "lumber_segment_adjusted_ebitda",
        MetricKind::Millions,
        &[Stage::After(Shape {
            keyword: r"lumber\s+segment.*?adjusted\s+ebitda",
            link: Link::Optional(&["of", "was"]),
            ..SHAPE
        })],
    ),
    document(
        "available_liquidity",
        MetricKind::Millions,
        &[
            Stage::After(Shape {
                keyword: r"available\s+liquidity",
                link: Link::Optional(LINK_REPORTED),
                qualifier: true,
                amount: Amount::Plain,
                unit: Unit::Required,
                ..SHAPE
            }),
            generic!(r"available\s+liquidity"),
            Stage::Before(Shape {
                keyword: r"available\s+liquidity",
                link: Link::Required(LINK_AVAILABLE_BEFORE),
                amount: Amount::Plain,
                ..SHAPE
            }),
        ],
    ),
    document(
        "liquidity",
        MetricKind::Millions,
        &[
            Stage::After(Shape {
                keyword: r"\btotal\s+liquidity",
                gap: Gap::Words(3),
                link: Link::Optional(LINK_STANDING),
                amount: Amount::Plain,
                unit: Unit::Required,
                ..SHAPE
            }),
            Stage::Before(Shape {
                keyword: r"liquidity",
                link: Link::Optional(LINK_LIQUIDITY_BEFORE),
                amount: Amount::Plain,
                unit: Unit::Required,
                ..SHAPE
            }),
            Stage::After(Shape {
                keyword: r"\bliquidity",
                gap: Gap::Words(3),
                link: Link::Optional(LINK_STANDING),
                amount: Amount::Plain,
                unit: Unit::Required,
                ..SHAPE
            }),
        ],
    ),
    document(
        "net_cash_balance",
        MetricKind::Millions,
        &[Stage::After(Shape {
            keyword: r"net\s+cash\s+balance",
            link: Link::Optional(&["at", "of", "was"]),
            amount: Amount::Plain,
            ..SHAPE
        })],
    ),
    document(
        "credit_facility",
        MetricKind::Millions,
        &[Stage::Before(Shape {
            keyword: r"credit\s+facility",
            amount: Amount::Plain,
            ..SHAPE
        })],
    ),
    MetricTemplate {
        name: "cash_flow",
        kind: MetricKind::Millions,
        scope: Scope::Sentences {
            require_all: &[],
            require_any: &["cash flow", "cash from operations"],
            exclude: &["free cash flow"],
        },
        sign: SignRule::Unsigned,
        stages: &[Stage::After(Shape {
            keyword: r"\b",
            link: Link::Required(LINK_CASH_FLOW),
            amount: Amount::Plain,
            unit: Unit::Absent,
            ..SHAPE
        })],
    },
    document(
        "net_revenue_margin",
        MetricKind::Percent,
        &[Stage::After(Shape {
            keyword: r"net\s+revenue\s+margin",
            gap: Gap::AnyChars,
            amount: Amount::Plain,
            unit: Unit::Percent,
            ..SHAPE
        })],
    ),
    document(
        "net_income_margin",
        MetricKind::Percent,
        &[Stage::PercentWindow {
            keyword: "net income margin",
            chars: 200,
        }],
    ),
    document(
        "gaap_net_income",
        MetricKind::Millions,
        &[generic!(r"gaap\s+net\s+income")],
    ),
    MetricTemplate {
        name: "net_income",
        kind: MetricKind::Millions,
        scope: Scope::Sentences {
            require_all: &[],
            require_any: &[],
            exclude: &["adjusted net income"],
        },
        sign: SignRule::LossMarked,
        stages: &[Stage::After(Shape {
            keyword: r"\bnet\s+(?P<head>income|earnings|profit|loss)\b",
            gap: Gap::Words(6),
            link: Link::Optional(LINK_REPORTED_CAME_TO),
            qualifier: true,
            ..SHAPE
        })],
    },
    document(
        "gaap_diluted_eps",
        MetricKind::PerShare,
        &[Stage::After(Shape {
            keyword: r"gaap\s+diluted\s+eps",
            gap: Gap::AnyChars,
            amount: Amount::PerShare,
            unit: Unit::Absent,
            ..SHAPE
        })],
    ),
    MetricTemplate {
        name: "adjusted_eps",
        kind: MetricKind::PerShare,
        scope: Scope::Sentences {
            require_all: &["adjusted", "eps"],
            require_any: &[],
            exclude: &[],
        },
        sign: SignRule::LossMarked,
        stages: &[Stage::After(Shape {
            keyword: r"\b",
            link: Link::Required(LINK_EPS),
            amount: Amount::SignedDecimal,
            unit: Unit::Absent,
            ..SHAPE
        })],
    },
    MetricTemplate {
        name: "actual_eps",
        kind: MetricKind::PerShare,
        scope: Scope::Document,
        sign: SignRule::LossMarkedAbsolute,
        stages: &[
            Stage::After(Shape {
                keyword: r"actual\s+eps[:\s]*",
                amount: Amount::Signed,
                unit: Unit::Absent,
                ..SHAPE
            }),
            Stage::Spoken {
                keyword: r"actual\s+eps",
                link: LINK_SPOKEN_EPS,
            },
        ],
    },
    document(
        "share_buybacks_and_dividends",
        MetricKind::Millions,
        &[
            Stage::Before(Shape {
                keyword: BUYBACK_KEYWORD,
                gap: Gap::TrailingWords(6),
                link: Link::Optional(LINK_BUYBACKS),
                qualifier: true,
                ..SHAPE
            }),
            Stage::After(Shape {
                keyword: BUYBACK_KEYWORD,
                gap: Gap::TrailingWords(6),
                link: Link::Optional(LINK_BUYBACKS),
                ..SHAPE
            }),
        ],
    ),
    document(
        "combined_rate_ar6",
        MetricKind::Percent,
        &[Stage::After(Shape {
            keyword: r"preliminary\s+combined\s+rate\s+for\s+ar6",
            link: Link::Optional(&["is", "of", "was"]),
            amount: Amount::Plain,
            unit: Unit::Percent,
            ..SHAPE
        })],
    ),
    document(
        "total_net_sales",
        MetricKind::Millions,
        &[
            Stage::After(Shape {
                keyword: r"total\s+net\s+sales",
                gap: Gap::Words(5),
                link: Link::Optional(LINK_REPORTED),
                qualifier: true,
                dollar: Dollar::Required,
                ..SHAPE
            }),
            Stage::After(Shape {
                keyword: r"total\s+net\s+sales",
                gap: Gap::Words(5),
                link: Link::Optional(LINK_REPORTED),
                qualifier: true,
                amount: Amount::Plain,
                unit: Unit::Required,
                ..SHAPE
            }),
        ],
    ),
    document(
        "free_cash_flow",
        MetricKind::Millions,
        &[Stage::After(Shape {
            keyword: r"free\s+cash\s+flow",
            link: Link::Optional(&["of", "was", "were"]),
            amount: Amount::Separated,
            ..SHAPE
        })],
    ),
    document(
        "interest_expense",
        MetricKind::Millions,
        &[
            Stage::After(Shape {
                keyword: r"interest\s+expense",
                gap: Gap::Words(5),
                link: Link::Optional(LINK_INTEREST),
                qualifier: true,
                amount: Amount::Plain,
                ..SHAPE
            }),
            Stage::Before(Shape {
                keyword: r"interest\s+expense",
                gap: Gap::Words(5),
                amount: Amount::Plain,
                ..SHAPE
            }),
        ],
    ),
    document(
        "adjusted_net_income",
        MetricKind::Millions,
        &[
            Stage::Before(Shape {
                keyword: r"adjusted\s+net\s+income\b",
                gap: Gap::Words(3),
                amount: Amount::Grouped,
                ..SHAPE
            }),
            Stage::After(Shape {
                keyword: r"\badjusted\s+net\s+income",
                gap: Gap::Words(3),
                link: Link::Optional(LINK_ADJUSTED_NET_INCOME),
                qualifier: true,
                amount: Amount::Grouped,
                unit: Unit::Required,
                ..SHAPE
            }),
        ],
    ),
    document(
        "gaap_operating_income",
        MetricKind::Millions,
        &[
            Stage::Before(Shape {
                keyword: r"gaap\s+operating\s+income",
                link: Link::Optional(LINK_GAAP_OPERATING_BEFORE),
                amount: Amount::Plain,
                ..SHAPE
            }),
            Stage::After(Shape {
                keyword: r"gaap\s+operating\s+income",
                link: Link::Optional(LINK_REPORTED),
                amount: Amount::Plain,
                ..SHAPE
            }),
        ],
    ),
    document(
        "total_available_liquidity",
        MetricKind::Millions,
        &[
            Stage::Before(Shape {
                keyword: r"total\s+available\s+liquidity",
                link: Link::Required(&["of"]),
                amount: Amount::Plain,
                ..SHAPE
            }),
            Stage::After(Shape {
                keyword: r"total\s+available\s+liquidity",
                link: Link::Optional(LINK_STANDING),
                amount: Amount::Plain,
                ..SHAPE
            }),
            Stage::Inherit("available_liquidity"),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique() {
        let names: HashSet<_> = METRIC_TEMPLATES.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), METRIC_TEMPLATES.len());
        assert_eq!(METRIC_TEMPLATES.len(), 28);
    }

    #[test]
    fn test_every_metric_has_a_stage() {
        assert!(METRIC_TEMPLATES.iter().all(|t| !t.stages.is_empty()));
    }

    #[test]
    fn test_signed_metrics() {
        let signed: Vec<_> = METRIC_TEMPLATES
            .iter()
            .filter(|t| t.sign != SignRule::Unsigned)
            .map(|t| t.name)
            .collect();
        assert_eq!(signed, vec!["net_income", "adjusted_eps", "actual_eps"]);
    }
}
