//! The agent loop for Sahayak.
//!
//! Each conversation turn follows a **Plan → Execute → Evaluate** cycle:
//!
//! 1. **Receive** an utterance and extract its intent
//! 2. **Evaluate** it against the profile memory into a verdict
//! 3. **Plan** the next action from the current phase and the verdict
//! 4. **If a tool is needed**: dispatch it, evaluate the result, plan again
//! 5. **Otherwise**: reply with a question, a recovery prompt, or a conclusion
//!
//! Recovery prompts for the same problem are bounded, so every session
//! reaches a conclusion.

pub mod evaluator;
pub mod intent;
pub mod planner;
pub mod prompts;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use evaluator::{Evaluation, EvaluationInput, Evaluator};
pub use intent::RuleBasedExtractor;
pub use planner::{transition, Outcome, PlanAction, PlanContext, Planner, RecoveryKey, Step, Target};
pub use prompts::Prompts;
pub use session::{HistoryEntry, Session, Speaker};
