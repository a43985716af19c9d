use crate::{ScenarioType, SimulationInput, StrategyConfig};

const CRASH_INSIGHT: &str = "Market crash scenarios illustrate the importance of drawdown planning. \
Even a fundamentally correct directional thesis can result in significant capital loss \
when a systemic shock occurs. Portfolio stress-testing against tail-risk events is \
a core principle of institutional risk management.";

const HIGH_VOLATILITY_INSIGHT: &str = "This simulation demonstrates variance drag: the mathematical reality that high volatility \
reduces compounded returns even when the average return is positive. \
A 20% gain followed by a 20% loss does not return to breakeven; it results in a 4% net loss. \
Volatility is not just uncertainty; it is a direct cost to compounded wealth.";

const LOSS_INSIGHT: &str = "The simulation projects a net loss under current parameters. \
This outcome highlights the importance of not entering positions when the expected value \
is negative after accounting for risk and volatility. \
Capital preservation in negative-expectation scenarios is the rational strategy.";

pub(crate) fn risk_commentary(config: &StrategyConfig, input: &SimulationInput) -> String {
    let risk = input.risk_score;
    let vol = input.volatility_score;

    match input.scenario {
        ScenarioType::MarketCrash => format!(
            "Scenario: MARKET CRASH. A systemic shock of {:.0}% has been applied on top of the base risk \
             (score={:.2}) and volatility (score={:.2}) penalties. \
             Capital preservation takes priority over return maximization.",
            config.crash_shock * 100.0,
            risk,
            vol
        ),
        ScenarioType::HighVolatility => format!(
            "Scenario: HIGH VOLATILITY. Variance drag of {:.0}% applied due to elevated volatility \
             (score={:.2}). High-volatility environments erode compounded returns even when \
             directional calls are correct.",
            config.high_volatility_penalty * 100.0,
            vol
        ),
        ScenarioType::Normal if risk >= config.medium_risk => format!(
            "Risk score {:.2} indicates elevated exposure. \
             The risk-adjusted projection reflects a significant discount to the base scenario. \
             Consider reducing position concentration or increasing hedging.",
            risk
        ),
        ScenarioType::Normal if risk >= config.low_risk => format!(
            "Risk score {:.2} reflects moderate exposure. \
             Standard risk controls apply. Monitor for regime changes.",
            risk
        ),
        ScenarioType::Normal => format!(
            "Risk score {:.2} is low. Capital is not excessively exposed. \
             Full position sizing is within normal risk budget parameters.",
            risk
        ),
    }
}

pub(crate) fn educational_insight(
    config: &StrategyConfig,
    input: &SimulationInput,
    profit_loss: f64,
) -> String {
    match input.scenario {
        ScenarioType::MarketCrash => CRASH_INSIGHT.to_string(),
        ScenarioType::HighVolatility => HIGH_VOLATILITY_INSIGHT.to_string(),
        ScenarioType::Normal if profit_loss < 0.0 => LOSS_INSIGHT.to_string(),
        ScenarioType::Normal if input.risk_score < config.medium_risk => {
            "This simulation projects a profit under normal conditions with controlled risk. \
             Low risk and positive expected return is the target profile for disciplined investing. \
             However, projected values are not guaranteed; they represent probability-weighted \
             expectations, not certainties."
                .to_string()
        }
        ScenarioType::Normal => "The projected profit comes with elevated risk exposure. \
             High-risk, high-return profiles are susceptible to large drawdowns in adverse conditions. \
             The risk-adjusted projection reflects what a conservative risk model would assign as the \
             realistic expected outcome after accounting for downside probability."
            .to_string(),
    }
}
