//! Scripted generators for failure and usage scenarios.

use di_core::llm::base::LlmError;
use di_core::llm::mock::MockGenerator;
use di_protocol::run_models::StageKind;

/// Well-formed responses in pipeline order.
#[allow(dead_code)]
pub fn contract_responses() -> Vec<Result<String, LlmError>> {
    vec![
        Ok(r#"{"document_type": "Contract"}"#.to_string()),
        Ok(r#"{"sections": {"Term": "Twelve months", "Fees": "4,000 EUR per month"}}"#.to_string()),
        Ok(r#"{"summary": "Acme Corp engages Globex Ltd for twelve months."}"#.to_string()),
        Ok(r#"{"insights": ["Risk: No termination clause", "Action: Confirm invoice dates"]}"#.to_string()),
    ]
}

/// The contract script with one stage's call failing at the transport level.
#[allow(dead_code)]
pub fn failing_at(stage: StageKind) -> MockGenerator {
    let mut script = contract_responses();
    let index = StageKind::ALL
        .iter()
        .position(|s| *s == stage)
        .expect("every stage is in ALL");
    script[index] = Err(LlmError::Transport("connection reset by peer".to_string()));
    MockGenerator::new(script)
}

/// The contract script with the given response for one stage.
#[allow(dead_code)]
pub fn responding_at(stage: StageKind, response: &str) -> MockGenerator {
    let mut script = contract_responses();
    let index = StageKind::ALL
        .iter()
        .position(|s| *s == stage)
        .expect("every stage is in ALL");
    script[index] = Ok(response.to_string());
    MockGenerator::new(script)
}
