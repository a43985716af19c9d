//! Canned behavioral-finance narratives.

pub(crate) const OVERCONFIDENT_CORRECT: &str = "Overconfidence Bias: You were correct, but your stated confidence exceeded what was \
statistically warranted by the information available. Sustained overconfidence leads to \
under-hedged positions and excessive concentration risk over time.";

pub(crate) const OVERCONFIDENT_INCORRECT: &str = "Overconfidence Bias + Confirmation Error: Your confidence was too high and the prediction \
was wrong. This is the most common profile for large trading losses. \
Overconfident traders underestimate tail risk and fail to plan exit strategies for adverse scenarios.";

pub(crate) const UNDERCONFIDENT_CORRECT: &str = "Under-confidence Bias: You were correct but doubted yourself. This pattern leads to \
premature exits, reduced position sizes, and missed returns. \
Consider anchoring more firmly to systematic signals rather than emotional doubt.";

pub(crate) const UNDERCONFIDENT_INCORRECT: &str = "Under-confidence with Incorrect Call: Low confidence and an incorrect prediction. \
While the low confidence was appropriate for the uncertainty, examine whether \
insufficient research or decision paralysis contributed to the poor directional call.";

pub(crate) const CALIBRATED_CORRECT: &str = "Well-Calibrated and Correct: Your confidence aligned with outcome probability and you were right. \
This is the hallmark of disciplined probabilistic thinking. Sustain this approach by \
continuing to base confidence on quantifiable evidence rather than intuition.";

pub(crate) const CALIBRATED_INCORRECT: &str = "Well-Calibrated but Incorrect: Your confidence was appropriate, and even skilled traders \
lose well-calibrated bets. This is not an error; it is probabilistic trading done correctly. \
A correct process does not guarantee a correct outcome on every single trade.";

pub(crate) const OPTIMISM_BIAS: &str = "Optimism Bias Detected: Your predictions have consistently skewed bullish. \
Optimism bias causes traders to underweight downside scenarios, hold losers too long, \
and overestimate the probability of favorable outcomes.";

pub(crate) const PESSIMISM_BIAS: &str = "Pessimism Bias Detected: Your predictions have consistently skewed bearish. \
Excessive pessimism leads to premature profit-taking, missed long-side opportunities, \
and failure to hold winning positions through full trend cycles.";

pub(crate) const DIRECTIONAL_NEUTRALITY: &str = "Directional Neutrality: No persistent optimism or pessimism detected. \
Your predictions show balanced directional exposure, which is consistent with \
disciplined, evidence-based analysis rather than emotionally driven forecasting.";

pub(crate) const FOCUS_RECALIBRATE: &str = "Focus area: Review the confidence calibration framework. \
Match your stated confidence to the proportion of evidence supporting the prediction, \
not to your emotional conviction.";

pub(crate) const FOCUS_MAINTAIN: &str = "Focus area: Maintain your current calibration discipline. \
Continue anchoring confidence to quantifiable evidence.";
