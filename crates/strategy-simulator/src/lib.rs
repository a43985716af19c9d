//! Strategy Simulator
//!
//! Deterministic projection of an investment under a named market scenario.
//! All monetary figures share the unit of `initial_investment`.

mod commentary;

use education_core::{ensure_positive, ensure_range, ensure_unit_interval, round_to, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioType {
    #[default]
    Normal,
    MarketCrash,
    HighVolatility,
}

impl ScenarioType {
    /// Case-insensitive; unknown labels are rejected.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(ScenarioType::Normal),
            "MARKET_CRASH" => Ok(ScenarioType::MarketCrash),
            "HIGH_VOLATILITY" => Ok(ScenarioType::HighVolatility),
            _ => Err(ValidationError::UnknownScenario {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::Normal => "NORMAL",
            ScenarioType::MarketCrash => "MARKET_CRASH",
            ScenarioType::HighVolatility => "HIGH_VOLATILITY",
        }
    }
}

impl std::fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projection coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Fraction of principal lost to a systemic shock in MARKET_CRASH
    pub crash_shock: f64,
    pub high_volatility_penalty: f64,
    /// MARKET_CRASH drag = high_volatility_penalty × this factor
    pub crash_penalty_factor: f64,
    pub normal_penalty: f64,

    /// Worst case: principal × risk × this
    pub risk_drawdown: f64,
    /// Worst case: principal × volatility × this
    pub volatility_drawdown: f64,

    /// Share of the gain/loss removed per unit of risk
    pub risk_dampener: f64,

    pub low_risk: f64,
    pub medium_risk: f64,

    pub min_change_percent: f64,
    pub max_change_percent: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            crash_shock: 0.35,
            high_volatility_penalty: 0.18,
            crash_penalty_factor: 0.75,
            normal_penalty: 0.05,
            risk_drawdown: 0.40,
            volatility_drawdown: 0.25,
            risk_dampener: 0.60,
            low_risk: 0.30,
            medium_risk: 0.60,
            min_change_percent: -100.0,
            max_change_percent: 1000.0,
        }
    }
}

impl StrategyConfig {
    pub fn variance_penalty(&self, scenario: ScenarioType) -> f64 {
        match scenario {
            ScenarioType::HighVolatility => self.high_volatility_penalty,
            ScenarioType::MarketCrash => self.high_volatility_penalty * self.crash_penalty_factor,
            ScenarioType::Normal => self.normal_penalty,
        }
    }

    fn shock(&self, investment: f64, scenario: ScenarioType) -> f64 {
        match scenario {
            ScenarioType::MarketCrash => investment * self.crash_shock,
            _ => 0.0,
        }
    }
}

/// Validated simulation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInput {
    pub investment_amount: f64,
    pub predicted_change_percent: f64,
    pub risk_score: f64,
    pub volatility_score: f64,
    pub scenario: ScenarioType,
}

impl SimulationInput {
    pub fn new(
        config: &StrategyConfig,
        investment_amount: f64,
        predicted_change_percent: f64,
        risk_score: f64,
        volatility_score: f64,
        scenario: ScenarioType,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            investment_amount: ensure_positive("investment_amount", investment_amount)?,
            predicted_change_percent: ensure_range(
                "predicted_change_percent",
                predicted_change_percent,
                config.min_change_percent,
                config.max_change_percent,
            )?,
            risk_score: ensure_unit_interval("risk_score", risk_score)?,
            volatility_score: ensure_unit_interval("volatility_score", volatility_score)?,
            scenario,
        })
    }
}

/// Projection outcome. Monetary fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySimulationResult {
    pub initial_investment: f64,
    pub projected_value: f64,
    pub projected_profit_loss: f64,
    pub risk_adjusted_value: f64,
    pub worst_case_projection: f64,
    /// Variance drag in currency units
    pub volatility_impact: f64,
    pub scenario_applied: ScenarioType,
    pub risk_commentary: String,
    pub educational_insight: String,
}

#[derive(Debug, Clone, Default)]
pub struct StrategySimulator {
    config: StrategyConfig,
}

impl StrategySimulator {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn simulate(
        &self,
        investment_amount: f64,
        predicted_change_percent: f64,
        risk_score: f64,
        volatility_score: f64,
        scenario: ScenarioType,
    ) -> Result<StrategySimulationResult, ValidationError> {
        let input = SimulationInput::new(
            &self.config,
            investment_amount,
            predicted_change_percent,
            risk_score,
            volatility_score,
            scenario,
        )?;
        Ok(self.simulate_input(&input))
    }

    pub fn simulate_input(&self, input: &SimulationInput) -> StrategySimulationResult {
        let c = &self.config;
        let investment = input.investment_amount;

        tracing::info!(
            "simulate_strategy: investment={:.2} change={:.2}% risk={:.2} vol={:.2} scenario={}",
            investment,
            input.predicted_change_percent,
            input.risk_score,
            input.volatility_score,
            input.scenario
        );

        let base = investment * (1.0 + input.predicted_change_percent / 100.0);
        let drag = investment * input.volatility_score * c.variance_penalty(input.scenario);
        let shock = c.shock(investment, input.scenario);

        let projected_value = (base - drag - shock).max(0.0);
        let profit_loss = projected_value - investment;
        // Pull the projection back toward the principal
        let risk_adjusted =
            (projected_value - profit_loss * input.risk_score * c.risk_dampener).max(0.0);
        let worst_case = (investment
            - investment * input.risk_score * c.risk_drawdown
            - investment * input.volatility_score * c.volatility_drawdown
            - shock)
            .max(0.0);

        StrategySimulationResult {
            initial_investment: round_to(investment, 2),
            projected_value: round_to(projected_value, 2),
            projected_profit_loss: round_to(profit_loss, 2),
            risk_adjusted_value: round_to(risk_adjusted, 2),
            worst_case_projection: round_to(worst_case, 2),
            volatility_impact: round_to(drag, 2),
            scenario_applied: input.scenario,
            risk_commentary: commentary::risk_commentary(c, input),
            educational_insight: commentary::educational_insight(c, input, profit_loss),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_scenario_end_to_end() {
        let sim = StrategySimulator::default();
        let out = sim
            .simulate(10_000.0, 12.5, 0.35, 0.40, ScenarioType::Normal)
            .unwrap();
        assert_relative_eq!(out.volatility_impact, 200.0);
        assert_relative_eq!(out.projected_value, 11_050.0);
        assert_relative_eq!(out.projected_profit_loss, 1_050.0);
        assert_relative_eq!(out.risk_adjusted_value, 10_829.5);
        // 10000 - 10000×0.35×0.40 - 10000×0.40×0.25
        assert_relative_eq!(out.worst_case_projection, 7_600.0);
        assert_eq!(out.scenario_applied, ScenarioType::Normal);
    }

    #[test]
    fn test_crash_applies_shock_and_reduced_drag() {
        let sim = StrategySimulator::default();
        let out = sim
            .simulate(10_000.0, 12.5, 0.35, 0.40, ScenarioType::MarketCrash)
            .unwrap();
        // drag = 10000 × 0.40 × 0.135
        assert_relative_eq!(out.volatility_impact, 540.0);
        assert_relative_eq!(out.projected_value, 11_250.0 - 540.0 - 3_500.0);
        assert_relative_eq!(out.worst_case_projection, 4_100.0);
        assert!(out.risk_commentary.contains("35%"));
    }

    #[test]
    fn test_scenario_monotonicity() {
        let sim = StrategySimulator::default();
        for (risk, vol) in [(0.1, 0.1), (0.35, 0.4), (0.9, 0.8)] {
            let normal = sim.simulate(5_000.0, 8.0, risk, vol, ScenarioType::Normal).unwrap();
            let crash = sim
                .simulate(5_000.0, 8.0, risk, vol, ScenarioType::MarketCrash)
                .unwrap();
            assert!(crash.worst_case_projection <= normal.worst_case_projection);
            assert!(normal.worst_case_projection <= normal.projected_value);
        }
    }

    #[test]
    fn test_values_floor_at_zero() {
        let sim = StrategySimulator::default();
        let out = sim
            .simulate(1_000.0, -100.0, 1.0, 1.0, ScenarioType::MarketCrash)
            .unwrap();
        assert_eq!(out.projected_value, 0.0);
        assert_eq!(out.worst_case_projection, 0.0);
        // A total loss is pulled back toward the principal: 0 + 1000 × 1.0 × 0.60
        assert_relative_eq!(out.risk_adjusted_value, 600.0);
        assert!(out.educational_insight.contains("drawdown planning"));
    }

    #[test]
    fn test_validation() {
        let sim = StrategySimulator::default();
        assert!(sim.simulate(0.0, 5.0, 0.5, 0.5, ScenarioType::Normal).is_err());
        assert!(sim.simulate(100.0, -100.5, 0.5, 0.5, ScenarioType::Normal).is_err());
        assert!(sim.simulate(100.0, 1000.5, 0.5, 0.5, ScenarioType::Normal).is_err());
        assert!(sim.simulate(100.0, 5.0, 1.5, 0.5, ScenarioType::Normal).is_err());
        let err = sim
            .simulate(100.0, 5.0, 0.5, -0.1, ScenarioType::Normal)
            .unwrap_err();
        assert!(err.to_string().contains("volatility_score"));
    }

    #[test]
    fn test_scenario_parse() {
        assert_eq!(ScenarioType::parse("market_crash").unwrap(), ScenarioType::MarketCrash);
        assert_eq!(ScenarioType::parse(" High_Volatility ").unwrap(), ScenarioType::HighVolatility);
        assert!(ScenarioType::parse("BEAR").is_err());
        assert_eq!(
            serde_json::to_string(&ScenarioType::HighVolatility).unwrap(),
            "\"HIGH_VOLATILITY\""
        );
    }

    #[test]
    fn test_normal_commentary_bands() {
        let sim = StrategySimulator::default();
        let high = sim.simulate(1_000.0, 5.0, 0.7, 0.2, ScenarioType::Normal).unwrap();
        assert!(high.risk_commentary.contains("elevated exposure"));
        assert!(high.educational_insight.contains("elevated risk exposure"));

        let moderate = sim.simulate(1_000.0, 5.0, 0.3, 0.2, ScenarioType::Normal).unwrap();
        assert!(moderate.risk_commentary.contains("moderate exposure"));
        assert!(moderate.educational_insight.contains("controlled risk"));

        let low = sim.simulate(1_000.0, 5.0, 0.1, 0.2, ScenarioType::Normal).unwrap();
        assert!(low.risk_commentary.contains("is low"));

        let loss = sim.simulate(1_000.0, -10.0, 0.1, 0.2, ScenarioType::Normal).unwrap();
        assert!(loss.educational_insight.contains("net loss"));
    }
}
