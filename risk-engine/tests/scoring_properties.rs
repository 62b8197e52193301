//! Property-based tests for scoring invariants
//!
//! - PII always drives NIST >= 40 and OWASP >= 30
//! - Total stays within 0-100 for any valid weight table
//! - Scoring is deterministic
//! - Arbitrary JSON never makes scoring fail

use proptest::prelude::*;
use risk_engine::{
    Framework, FrameworkScore, FrameworkScores, IntakeDetails, RiskScoringEngine, ScoringWeights,
    WeightConfig,
};
use serde_json::{json, Value};

fn data_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("PII".to_string()),
        Just("PHI".to_string()),
        Just("Financial".to_string()),
        Just("Intellectual Property".to_string()),
        Just("Public".to_string()),
        "[A-Za-z ]{0,12}",
    ]
}

fn text_strategy(known: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    let known = prop::sample::select(known).prop_map(str::to_string);
    proptest::option::of(prop_oneof![known, "[A-Za-z0-9 ()/-]{0,20}"])
}

/// Details built from realistic intake answers, each key optional
fn details_strategy() -> impl Strategy<Value = IntakeDetails> {
    (
        proptest::option::of(prop::collection::vec(data_type_strategy(), 0..5)),
        text_strategy(&["Cloud", "On-Premise", "Hybrid"]),
        text_strategy(&["GPT-4", "Claude 3", "Custom model", "Llama"]),
        text_strategy(&["OpenAI", "Anthropic", "Google", "Google (Vertex AI)", "Self-Hosted"]),
        text_strategy(&["Chatbot", "Chatbot / Virtual Assistant", "Automation", "Process Automation"]),
        text_strategy(&["Small", "Large", "Very Large"]),
        text_strategy(&["revenue impact"]),
        text_strategy(&["Public", "Partners", "Internal"]),
    )
        .prop_map(
            |(data_types, deployment, model, provider, use_case, volume, impact, audience)| {
                let mut details = IntakeDetails::new();
                if let Some(data_types) = data_types {
                    details.insert("data_types", json!(data_types));
                }
                let text_fields = [
                    ("deployment_type", deployment),
                    ("model_used", model),
                    ("model_provider", provider),
                    ("use_case", use_case),
                    ("data_volume", volume),
                    ("business_impact", impact),
                    ("expected_user_base", audience),
                ];
                for (key, value) in text_fields {
                    if let Some(value) = value {
                        details.insert(key, value);
                    }
                }
                details
            },
        )
}

/// Arbitrary JSON values, to exercise mistyped answers
fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[A-Za-z0-9 -]{0,10}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Five non-negative weights summing to exactly 1.00 (in hundredths)
fn weights_strategy() -> impl Strategy<Value = WeightConfig> {
    prop::collection::vec(0u32..=100, 4).prop_map(|mut cuts| {
        cuts.sort_unstable();
        let bounds = [0, cuts[0], cuts[1], cuts[2], cuts[3], 100];
        let share = |i: usize| (bounds[i + 1] - bounds[i]) as f64 / 100.0;
        WeightConfig {
            nist: share(0),
            soc2: share(1),
            sox: share(2),
            owasp: share(3),
            maestro: share(4),
        }
    })
}

fn scores_strategy() -> impl Strategy<Value = FrameworkScores> {
    prop::array::uniform5(0u8..=100).prop_map(|s| FrameworkScores {
        nist: FrameworkScore::new(s[0]),
        soc2: FrameworkScore::new(s[1]),
        sox: FrameworkScore::new(s[2]),
        owasp: FrameworkScore::new(s[3]),
        maestro: FrameworkScore::new(s[4]),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: PII lifts NIST to at least 40 and OWASP to at least 30
    #[test]
    fn prop_pii_floor(mut details in details_strategy(), extra in prop::collection::vec(data_type_strategy(), 0..3)) {
        let mut data_types = vec!["PII".to_string()];
        data_types.extend(extra);
        details.insert("data_types", json!(data_types));

        let assessment = RiskScoringEngine::default().score(&details);
        prop_assert!(assessment.scores.nist.value() >= 40);
        prop_assert!(assessment.scores.owasp.value() >= 30);
    }

    /// Property: every score is bounded by 100
    #[test]
    fn prop_scores_bounded(details in details_strategy(), config in weights_strategy()) {
        let engine = RiskScoringEngine::new(&config).unwrap();
        let assessment = engine.score(&details);

        for framework in Framework::ALL {
            prop_assert!(assessment.scores.get(framework).value() <= 100);
        }
        prop_assert!(assessment.total.value() <= 100);
    }

    /// Property: weighted total of clamped sub-scores stays within bounds
    #[test]
    fn prop_total_bounded(scores in scores_strategy(), config in weights_strategy()) {
        let weights = ScoringWeights::new(&config).unwrap();
        let total = weights.weighted_total(&scores);

        let max = Framework::ALL.iter().map(|f| scores.get(*f)).max().unwrap();
        let min = Framework::ALL.iter().map(|f| scores.get(*f)).min().unwrap();
        // A weighted average sits between its extremes; truncation keeps it there
        prop_assert!(total <= max);
        prop_assert!(total >= min);
    }

    /// Property: identical details give identical assessments
    #[test]
    fn prop_deterministic(details in details_strategy()) {
        let engine = RiskScoringEngine::default();
        let first = engine.score(&details);
        let second = engine.score(&details.clone());
        prop_assert_eq!(first, second);
    }

    /// Property: arbitrary JSON never panics and stays bounded
    #[test]
    fn prop_arbitrary_json_is_total(value in json_strategy()) {
        let details = IntakeDetails::from_value(value);
        let assessment = RiskScoringEngine::default().score(&details);
        prop_assert!(assessment.total.value() <= 100);
    }
}

#[test]
fn test_documented_scenarios() {
    let engine = RiskScoringEngine::default();

    let nist = engine.score(&IntakeDetails::from_value(json!({
        "data_types": ["PII"],
        "deployment_type": "Cloud",
        "model_used": "GPT-4",
    })));
    assert_eq!(nist.scores.nist.value(), 70);

    let sox = engine.score(&IntakeDetails::from_value(json!({
        "data_types": ["Financial"],
        "deployment_type": "Cloud",
        "business_impact": "revenue impact",
    })));
    assert_eq!(sox.scores.sox.value(), 85);

    let owasp = engine.score(&IntakeDetails::from_value(json!({
        "use_case": "Chatbot",
        "model_provider": "OpenAI",
        "data_types": ["PHI"],
    })));
    assert_eq!(owasp.scores.owasp.value(), 75);
}

#[test]
fn test_mistyped_answers_score_zero() {
    let details = IntakeDetails::from_value(json!({
        "data_types": {"PII": true},
        "deployment_type": ["Cloud"],
        "model_used": 4,
        "model_provider": null,
        "use_case": false,
        "data_volume": 1_000_000,
        "business_impact": [],
        "expected_user_base": {"scope": "Public"},
    }));

    let assessment = RiskScoringEngine::default().score(&details);
    assert_eq!(assessment.total.value(), 0);
    assert!(assessment.factors.is_empty());
}
